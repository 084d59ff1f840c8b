use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use std::collections::HashMap;
use tracing::debug;

use super::PoolLookup;
use crate::error::{QuoteError, Result};
use crate::models::{Address, LiquidityPool, PairKey, Reserves};

#[derive(Default)]
struct Pools {
    by_pair: HashMap<PairKey, LiquidityPool>,
    by_address: HashMap<Address, PairKey>,
}

/// A venue held in memory. Reserves can be moved with `set_reserves`, and
/// every read sees the latest write.
#[derive(Default)]
pub struct InMemoryPoolLookup {
    pools: RwLock<Pools>,
}

impl InMemoryPoolLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pools(pools: impl IntoIterator<Item = LiquidityPool>) -> Self {
        let lookup = Self::new();
        for pool in pools {
            lookup.add_pool(pool);
        }
        lookup
    }

    /// Inserts or replaces the pool for its token pair. An address already
    /// registered under another pair is moved, so one address never answers
    /// for two pairs.
    pub fn add_pool(&self, pool: LiquidityPool) {
        let pool = LiquidityPool::new(
            pool.address,
            pool.token0,
            pool.token1,
            pool.reserve0,
            pool.reserve1,
        );
        let key = PairKey::new(pool.token0, pool.token1);
        debug!(pool = %pool.uuid(), "pool added");
        let mut pools = self.pools.write();
        if let Some(stale) = pools.by_address.remove(&pool.address) {
            if stale != key {
                pools.by_pair.remove(&stale);
            }
        }
        if let Some(old) = pools.by_pair.insert(key, pool.clone()) {
            if old.address != pool.address {
                pools.by_address.remove(&old.address);
            }
        }
        pools.by_address.insert(pool.address, key);
    }

    pub fn remove_pool(&self, token_a: Address, token_b: Address) -> Option<LiquidityPool> {
        let mut pools = self.pools.write();
        let removed = pools.by_pair.remove(&PairKey::new(token_a, token_b))?;
        pools.by_address.remove(&removed.address);
        Some(removed)
    }

    /// Overwrites reserves of a known pool, in canonical order.
    pub fn set_reserves(&self, pool: Address, reserve0: U256, reserve1: U256) -> Result<()> {
        let mut pools = self.pools.write();
        let key = *pools
            .by_address
            .get(&pool)
            .ok_or_else(|| QuoteError::Lookup(format!("unknown pool {}", pool)))?;
        if let Some(entry) = pools.by_pair.get_mut(&key) {
            entry.reserve0 = reserve0;
            entry.reserve1 = reserve1;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pools.read().by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PoolLookup for InMemoryPoolLookup {
    async fn resolve_pool(&self, token_a: Address, token_b: Address) -> Result<Option<Address>> {
        let pools = self.pools.read();
        Ok(pools
            .by_pair
            .get(&PairKey::new(token_a, token_b))
            .map(|p| p.address))
    }

    async fn get_reserves(&self, pool: Address) -> Result<Reserves> {
        let pools = self.pools.read();
        pools
            .by_address
            .get(&pool)
            .and_then(|key| pools.by_pair.get(key))
            .map(LiquidityPool::reserves)
            .ok_or_else(|| QuoteError::Lookup(format!("unknown pool {}", pool)))
    }
}
