use async_trait::async_trait;
use primitive_types::U256;
use std::sync::Arc;

use super::{quote_via_lookup, ProtocolWrapper};
use crate::error::Result;
use crate::lookup::PoolLookup;
use crate::math::Fee;
use crate::models::Address;

const IDENTIFIER: &str = "UniswapV2";
const POOL_FEE: Fee = Fee::UNISWAP_V2;

/// Uniswap V2 style venue: one pool per unordered pair, 0.3% input fee.
pub struct UniswapV2 {
    lookup: Arc<dyn PoolLookup>,
}

impl UniswapV2 {
    pub fn new(lookup: Arc<dyn PoolLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl ProtocolWrapper for UniswapV2 {
    fn protocol_name(&self) -> &str {
        IDENTIFIER
    }

    fn fee(&self) -> Option<Fee> {
        Some(POOL_FEE)
    }

    async fn is_available(&self, token_a: Address, token_b: Address) -> Result<bool> {
        Ok(self.lookup.resolve_pool(token_a, token_b).await?.is_some())
    }

    async fn quote(&self, token_in: Address, amount_in: U256, token_out: Address) -> Result<U256> {
        quote_via_lookup(self.lookup.as_ref(), POOL_FEE, token_in, amount_in, token_out).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::lookup::InMemoryPoolLookup;
    use crate::models::LiquidityPool;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn dex_with(lookup: Arc<InMemoryPoolLookup>) -> UniswapV2 {
        UniswapV2::new(lookup)
    }

    fn balanced_pool() -> Arc<InMemoryPoolLookup> {
        Arc::new(InMemoryPoolLookup::from_pools([LiquidityPool::new(
            addr(100),
            addr(1),
            addr(2),
            U256::from(1000),
            U256::from(1000),
        )]))
    }

    #[test]
    fn test_protocol_name() {
        let dex = dex_with(balanced_pool());
        assert_eq!(dex.protocol_name(), "UniswapV2");
        assert_eq!(dex.fee().map(|f| f.bps()), Some(30));
    }

    #[tokio::test]
    async fn test_quote_worked_example() {
        let dex = dex_with(balanced_pool());
        let out = dex.quote(addr(1), U256::from(100), addr(2)).await.unwrap();
        assert_eq!(out, U256::from(90));
    }

    #[tokio::test]
    async fn test_is_available_order_independent() {
        let dex = dex_with(balanced_pool());
        assert!(dex.is_available(addr(1), addr(2)).await.unwrap());
        assert!(dex.is_available(addr(2), addr(1)).await.unwrap());
        assert!(!dex.is_available(addr(1), addr(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_tokens_rejected() {
        let dex = dex_with(balanced_pool());
        for (a, b) in [
            (Address::ZERO, addr(2)),
            (addr(1), Address::ZERO),
            (Address::ZERO, Address::ZERO),
        ] {
            assert_eq!(
                dex.quote(a, U256::from(100), b).await,
                Err(QuoteError::InvalidToken)
            );
        }
    }

    #[tokio::test]
    async fn test_pair_not_found() {
        let dex = dex_with(balanced_pool());
        assert!(matches!(
            dex.quote(addr(1), U256::from(100), addr(3)).await,
            Err(QuoteError::PairNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_amount_and_drained_pool() {
        let lookup = balanced_pool();
        let dex = dex_with(lookup.clone());
        assert_eq!(
            dex.quote(addr(1), U256::zero(), addr(2)).await,
            Err(QuoteError::InsufficientInput)
        );

        lookup
            .set_reserves(addr(100), U256::from(1000), U256::zero())
            .unwrap();
        assert_eq!(
            dex.quote(addr(1), U256::from(100), addr(2)).await,
            Err(QuoteError::InsufficientLiquidity)
        );
    }

    #[tokio::test]
    async fn test_reserves_read_fresh_each_quote() {
        let lookup = balanced_pool();
        let dex = dex_with(lookup.clone());
        let before = dex.quote(addr(1), U256::from(100), addr(2)).await.unwrap();

        lookup
            .set_reserves(addr(100), U256::from(1000), U256::from(2000))
            .unwrap();
        let after = dex.quote(addr(1), U256::from(100), addr(2)).await.unwrap();

        assert_eq!(before, U256::from(90));
        assert_eq!(after, U256::from(181));
    }

    #[tokio::test]
    async fn test_round_trip_returns_less() {
        let dex = dex_with(balanced_pool());
        let amount = U256::from(100);
        let out = dex.quote(addr(1), amount, addr(2)).await.unwrap();
        let back = dex.quote(addr(2), out, addr(1)).await.unwrap();
        assert!(back < amount);
    }
}
