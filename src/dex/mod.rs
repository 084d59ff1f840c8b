use async_trait::async_trait;
use primitive_types::U256;
use tracing::debug;

use crate::error::{QuoteError, Result};
use crate::lookup::PoolLookup;
use crate::math::{quote_constant_product, Fee};
use crate::models::{sort_tokens, Address};

pub mod pancakeswap_v2;
pub mod uniswap_v2;

pub use pancakeswap_v2::PancakeSwapV2;
pub use uniswap_v2::UniswapV2;

/// Uniform quoting capability over one liquidity venue.
#[async_trait]
pub trait ProtocolWrapper: Send + Sync {
    fn protocol_name(&self) -> &str;

    /// Input fee charged by the venue, when it has a fixed one.
    fn fee(&self) -> Option<Fee> {
        None
    }

    /// Whether the venue has a pool for the unordered pair.
    async fn is_available(&self, token_a: Address, token_b: Address) -> Result<bool>;

    /// Expected output of swapping `amount_in` of `token_in` into `token_out`.
    async fn quote(&self, token_in: Address, amount_in: U256, token_out: Address) -> Result<U256>;
}

/// Quote against a constant-product venue reached through `lookup`.
///
/// Resolves the pool on every call and reads fresh reserves; nothing is
/// cached between quotes.
pub async fn quote_via_lookup(
    lookup: &dyn PoolLookup,
    fee: Fee,
    token_in: Address,
    amount_in: U256,
    token_out: Address,
) -> Result<U256> {
    if token_in.is_zero() || token_out.is_zero() {
        return Err(QuoteError::InvalidToken);
    }

    let pool = lookup
        .resolve_pool(token_in, token_out)
        .await?
        .ok_or(QuoteError::PairNotFound {
            token_a: token_in,
            token_b: token_out,
        })?;

    let reserves = lookup.get_reserves(pool).await?;
    let (token0, _) = sort_tokens(token_in, token_out);
    let (reserve_in, reserve_out) = reserves.oriented(token_in == token0);

    let amount_out = quote_constant_product(amount_in, reserve_in, reserve_out, fee)?;
    debug!(
        pool = %pool,
        %reserve_in,
        %reserve_out,
        %amount_in,
        %amount_out,
        "constant product quote"
    );
    Ok(amount_out)
}
