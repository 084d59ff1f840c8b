use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Address, Reserves};

pub mod indexer;
pub mod memory;

pub use indexer::IndexerApi;
pub use memory::InMemoryPoolLookup;

/// Read access to a liquidity venue's pools.
///
/// Implementations hold no cache: every call reflects the venue's state at the
/// time it is made, and two calls may disagree.
#[async_trait]
pub trait PoolLookup: Send + Sync {
    /// Pool address for the unordered pair, or `None` when the venue has none.
    async fn resolve_pool(&self, token_a: Address, token_b: Address) -> Result<Option<Address>>;

    /// Current reserves in the pool's canonical (sorted-token) order.
    async fn get_reserves(&self, pool: Address) -> Result<Reserves>;
}
