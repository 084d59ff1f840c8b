//! Constant-product swap math.
//!
//! Formula: output = (reserve_out * input * fee_num) / (reserve_in * fee_denom + input * fee_num)
//!
//! Everything is evaluated in 512 bits so `U256` reserves and amounts can be
//! multiplied without wrapping. Division truncates; there is no rounding
//! adjustment on top of that.

use primitive_types::{U256, U512};
use serde::Serialize;

use crate::error::{QuoteError, Result};

/// Share of the input that reaches the curve, as `numerator / denominator`.
///
/// Only built through [`Fee::new`] or the constants, so `0 < denominator`
/// and `numerator <= denominator` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fee {
    numerator: u32,
    denominator: u32,
}

impl Fee {
    /// 0.3% taken from the input.
    pub const UNISWAP_V2: Fee = Fee {
        numerator: 997,
        denominator: 1000,
    };

    /// 0.25% taken from the input.
    pub const PANCAKESWAP_V2: Fee = Fee {
        numerator: 9975,
        denominator: 10000,
    };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if denominator == 0 || numerator > denominator {
            return Err(QuoteError::InvalidFee {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Fee in basis points, rounded down (30 for 997/1000).
    pub fn bps(&self) -> u32 {
        ((self.denominator - self.numerator) as u64 * 10_000 / self.denominator as u64) as u32
    }
}

/// Output amount for swapping `amount_in` against a constant-product pool.
///
/// Fails with `InsufficientInput` for a zero input, then with
/// `InsufficientLiquidity` when either reserve is empty.
pub fn quote_constant_product(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: Fee,
) -> Result<U256> {
    if amount_in.is_zero() {
        return Err(QuoteError::InsufficientInput);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }

    let amount_in_with_fee = U512::from(amount_in)
        .checked_mul(U512::from(fee.numerator))
        .ok_or(QuoteError::Overflow)?;
    let numerator = U512::from(reserve_out)
        .checked_mul(amount_in_with_fee)
        .ok_or(QuoteError::Overflow)?;
    let denominator = U512::from(reserve_in)
        .checked_mul(U512::from(fee.denominator))
        .and_then(|d| d.checked_add(amount_in_with_fee))
        .ok_or(QuoteError::Overflow)?;

    if denominator.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }

    // Always below reserve_out, so it fits back into 256 bits.
    U256::try_from(numerator / denominator).map_err(|_| QuoteError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    #[test]
    fn test_worked_example() {
        // 100 * 997 = 99_700; 1000 * 99_700 = 99_700_000; 1000 * 1000 + 99_700 = 1_099_700
        let out = quote_constant_product(u(100), u(1000), u(1000), Fee::UNISWAP_V2).unwrap();
        assert_eq!(out, u(90));
    }

    #[test]
    fn test_asymmetric_reserves() {
        // 100 in against 1000:2000 at 0.3% -> 181.32..., truncated
        let out = quote_constant_product(u(100), u(1000), u(2000), Fee::UNISWAP_V2).unwrap();
        assert_eq!(out, u(181));
    }

    #[test]
    fn test_zero_input_checked_before_reserves() {
        assert_eq!(
            quote_constant_product(U256::zero(), U256::zero(), u(1), Fee::UNISWAP_V2),
            Err(QuoteError::InsufficientInput)
        );
    }

    #[test]
    fn test_empty_reserves() {
        assert_eq!(
            quote_constant_product(u(1), U256::zero(), u(1000), Fee::UNISWAP_V2),
            Err(QuoteError::InsufficientLiquidity)
        );
        assert_eq!(
            quote_constant_product(u(1), u(1000), U256::zero(), Fee::UNISWAP_V2),
            Err(QuoteError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_tiny_input_truncates_to_zero() {
        let out = quote_constant_product(u(1), u(1_000_000), u(1000), Fee::UNISWAP_V2).unwrap();
        assert_eq!(out, U256::zero());
    }

    #[test]
    fn test_wide_values_do_not_overflow() {
        let big = U256::one() << 250;
        let out = quote_constant_product(big, big, big, Fee::UNISWAP_V2).unwrap();
        assert!(out < big);
        // Roughly half the pool for an input equal to the reserve.
        assert!(out > big / 3);
    }

    #[test]
    fn test_products_beyond_512_bits_report_overflow() {
        assert_eq!(
            quote_constant_product(U256::MAX, U256::MAX, U256::MAX, Fee::UNISWAP_V2),
            Err(QuoteError::Overflow)
        );
    }

    #[test]
    fn test_zero_fee_curve() {
        let free = Fee::new(1, 1).unwrap();
        let out = quote_constant_product(u(1000), u(1000), u(1000), free).unwrap();
        assert_eq!(out, u(500));
    }

    #[test]
    fn test_fee_validation() {
        assert!(matches!(Fee::new(1, 0), Err(QuoteError::InvalidFee { .. })));
        assert!(matches!(Fee::new(1001, 1000), Err(QuoteError::InvalidFee { .. })));
        assert_eq!(Fee::new(997, 1000).unwrap(), Fee::UNISWAP_V2);
    }

    #[test]
    fn test_fee_bps() {
        assert_eq!(Fee::UNISWAP_V2.bps(), 30);
        assert_eq!(Fee::PANCAKESWAP_V2.bps(), 25);
        assert_eq!(Fee::new(1000, 1000).unwrap().bps(), 0);
        assert_eq!(Fee::new(0, 1000).unwrap().bps(), 10_000);
    }

    #[test]
    fn test_fee_accessors_report_validated_parts() {
        let fee = Fee::new(9970, 10_000).unwrap();
        assert_eq!((fee.numerator(), fee.denominator()), (9970, 10_000));
        assert_eq!(fee.bps(), 30);
    }

    #[test]
    fn test_round_trip_loses_value() {
        let amount = u(1_000_000);
        let (r_a, r_b) = (u(50_000_000), u(80_000_000));

        let out_b = quote_constant_product(amount, r_a, r_b, Fee::UNISWAP_V2).unwrap();
        // Reserves after the first hop executes.
        let back = quote_constant_product(out_b, r_b - out_b, r_a + amount, Fee::UNISWAP_V2)
            .unwrap();
        assert!(back < amount);
        // Two 0.3% fees on a deep pool: a bit under 99.4% comes back.
        assert!(back * 1000 >= amount * 993);
    }

    proptest! {
        #[test]
        fn prop_output_below_reserve_out(
            amount_in in 1u128..,
            reserve_in in 1u128..,
            reserve_out in 1u128..,
        ) {
            let out = quote_constant_product(
                U256::from(amount_in),
                U256::from(reserve_in),
                U256::from(reserve_out),
                Fee::UNISWAP_V2,
            ).unwrap();
            prop_assert!(out < U256::from(reserve_out));
        }

        #[test]
        fn prop_output_non_decreasing_in_input(
            a in 1u64..,
            b in 1u64..,
            reserve_in in 1u64..,
            reserve_out in 1u64..,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let out_lo = quote_constant_product(u(lo), u(reserve_in), u(reserve_out), Fee::UNISWAP_V2).unwrap();
            let out_hi = quote_constant_product(u(hi), u(reserve_in), u(reserve_out), Fee::UNISWAP_V2).unwrap();
            prop_assert!(out_lo <= out_hi);
        }

        #[test]
        fn prop_round_trip_never_gains(
            amount in 1u64..1_000_000_000,
            reserve_a in 1_000u64..,
            reserve_b in 1_000u64..,
        ) {
            let out = quote_constant_product(u(amount), u(reserve_a), u(reserve_b), Fee::UNISWAP_V2).unwrap();
            prop_assume!(!out.is_zero());
            let back = quote_constant_product(out, u(reserve_b) - out, u(reserve_a) + u(amount), Fee::UNISWAP_V2).unwrap();
            prop_assert!(back < u(amount));
        }
    }
}
