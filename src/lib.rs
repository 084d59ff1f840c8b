//! # quote-relayer
//!
//! Price quotes for token swaps, routed to one of several pluggable protocol
//! wrappers. Each wrapper prices a single liquidity venue with the
//! constant-product formula; the [`Relayer`] decides which wrapper answers a
//! given query.
//!
//! ## Routing priority
//!
//! | Tier | Applies when | Keyed by |
//! |------|--------------|----------|
//! | Pair | a rule exists for the unordered pair | `PairKey(token_in, token_out)` |
//! | Token | no pair rule | `token_in` |
//! | Default | neither of the above | - |
//!
//! ## Supported wrappers
//!
//! | Wrapper | Fee | Pool source |
//! |---------|-----|-------------|
//! | UniswapV2 | 0.30% (997/1000) | any [`PoolLookup`] |
//! | PancakeSwapV2 | 0.25% (9975/10000) | any [`PoolLookup`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use quote_relayer::{
//!     Address, GovernorSet, InMemoryPoolLookup, LiquidityPool, Relayer, UniswapV2, U256,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let governor = Address::from_low_u64(0xa0);
//!     let weth = Address::from_low_u64(1);
//!     let usdc = Address::from_low_u64(2);
//!
//!     let pools = Arc::new(InMemoryPoolLookup::from_pools([LiquidityPool::new(
//!         Address::from_low_u64(0x100),
//!         weth,
//!         usdc,
//!         U256::from(1000),
//!         U256::from(1000),
//!     )]));
//!
//!     let relayer = Relayer::new(Arc::new(GovernorSet::new([governor])));
//!     let uniswap = Address::from_low_u64(0xf1);
//!     relayer.register_wrapper(governor, uniswap, Arc::new(UniswapV2::new(pools)))?;
//!     relayer.set_default_wrapper(governor, uniswap)?;
//!
//!     let out = relayer.quote(weth, U256::from(100), usdc).await?;
//!     assert_eq!(out, U256::from(90));
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Quote 1 WETH into USDC using the routes in relayer.json
//! cargo run --release -- --config demos/relayer.json quote 0x0000000000000000000000000000000000000001 1000000000000000000 0x0000000000000000000000000000000000000002
//!
//! # Show the routing table and which tier answers a direction
//! cargo run --release -- --config demos/relayer.json routes
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod dex;
pub mod error;
pub mod lookup;
pub mod math;
pub mod models;
pub mod relayer;
pub mod utils;

pub use auth::{Authorizer, GovernorSet};
pub use cache::{load_from_file, save_to_file};
pub use config::RelayerConfig;
pub use dex::{PancakeSwapV2, ProtocolWrapper, UniswapV2};
pub use error::{QuoteError, Result};
pub use lookup::{IndexerApi, InMemoryPoolLookup, PoolLookup};
pub use math::{quote_constant_product, Fee};
pub use models::{Address, LiquidityPool, PairKey, Reserves};
pub use primitive_types::U256;
pub use relayer::{Relayer, RouteTier, RoutedQuote, RoutingTable};
