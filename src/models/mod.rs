pub mod address;
pub mod amount;
pub mod liquidity_pool;
pub mod pair_key;

pub use address::{Address, AddressParseError};
pub use amount::parse_amount;
pub use liquidity_pool::{LiquidityPool, Reserves};
pub use pair_key::{sort_tokens, PairKey};
