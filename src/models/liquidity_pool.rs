use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::{sort_tokens, Address};

/// Pool reserves in the pool's own canonical order: `reserve0` belongs to the
/// smaller token address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    #[serde(with = "super::amount")]
    pub reserve0: U256,
    #[serde(with = "super::amount")]
    pub reserve1: U256,
}

impl Reserves {
    pub fn new(reserve0: U256, reserve1: U256) -> Self {
        Self { reserve0, reserve1 }
    }

    /// Returns `(reserve_in, reserve_out)` for a swap whose input token is
    /// (or is not) the pool's token0.
    pub fn oriented(&self, token_in_is_token0: bool) -> (U256, U256) {
        if token_in_is_token0 {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPool {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    #[serde(with = "super::amount")]
    pub reserve0: U256,
    #[serde(with = "super::amount")]
    pub reserve1: U256,
}

impl LiquidityPool {
    /// Builds a pool from reserves given in the caller's token order; tokens
    /// and reserves are swapped into canonical order when needed.
    pub fn new(
        address: Address,
        token_a: Address,
        token_b: Address,
        reserve_a: U256,
        reserve_b: U256,
    ) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let (reserve0, reserve1) = if token0 == token_a {
            (reserve_a, reserve_b)
        } else {
            (reserve_b, reserve_a)
        };
        Self {
            address,
            token0,
            token1,
            reserve0,
            reserve1,
        }
    }

    pub fn reserves(&self) -> Reserves {
        Reserves::new(self.reserve0, self.reserve1)
    }

    pub fn pair(&self) -> String {
        format!("{}/{}", self.token0.short(), self.token1.short())
    }

    pub fn uuid(&self) -> String {
        format!("{}.{}", self.pair(), self.address.short())
    }
}
