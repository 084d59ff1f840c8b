use thiserror::Error;

use crate::models::Address;

pub type Result<T> = std::result::Result<T, QuoteError>;

/// Every failure a quote or a routing update can report.
///
/// None of these are retried internally; a caller sees exactly the error the
/// failing layer raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("invalid token: zero address")]
    InvalidToken,

    #[error("invalid wrapper: {0}")]
    InvalidWrapper(Address),

    #[error("no pool for pair {token_a}/{token_b}")]
    PairNotFound { token_a: Address, token_b: Address },

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("insufficient input amount")]
    InsufficientInput,

    #[error("no wrapper configured for route")]
    NoWrapperFound,

    #[error("caller {caller} is not a governor")]
    Unauthorized { caller: Address },

    #[error("invalid fee {numerator}/{denominator}")]
    InvalidFee { numerator: u32, denominator: u32 },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("pool lookup failed: {0}")]
    Lookup(String),
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::Lookup(e.to_string())
    }
}
