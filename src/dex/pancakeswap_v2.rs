use async_trait::async_trait;
use primitive_types::U256;
use std::sync::Arc;

use super::{quote_via_lookup, ProtocolWrapper};
use crate::error::Result;
use crate::lookup::PoolLookup;
use crate::math::Fee;
use crate::models::Address;

const IDENTIFIER: &str = "PancakeSwapV2";
// Same curve as Uniswap V2 with a 0.25% fee.
const POOL_FEE: Fee = Fee::PANCAKESWAP_V2;

pub struct PancakeSwapV2 {
    lookup: Arc<dyn PoolLookup>,
}

impl PancakeSwapV2 {
    pub fn new(lookup: Arc<dyn PoolLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl ProtocolWrapper for PancakeSwapV2 {
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
