//! Exact decimal helpers. All monetary math is `BigDecimal`; raw on-chain
//! amounts span the full unsigned 256-bit range, so no float or fixed-width
//! decimal type is involved anywhere.

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, Sign};

/// Lossless conversion of a raw on-chain amount into a decimal integer.
pub fn u256_to_decimal(value: U256) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>());
    BigDecimal::from(digits)
}

/// Scale a raw integer quantity down by `10^decimals`.
///
/// Implemented as a scale shift (multiplication by `10^-decimals`), which is
/// exact for any input, unlike a general decimal division.
pub fn with_decimals(raw: &BigDecimal, decimals: u32) -> BigDecimal {
    raw * BigDecimal::new(BigInt::from(1), i64::from(decimals))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn u256_conversion_is_lossless_beyond_u64() {
        let max = U256::MAX;
        let expected = BigDecimal::from_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        )
        .unwrap();
        assert_eq!(u256_to_decimal(max), expected);
    }

    #[test]
    fn with_decimals_scales_exactly() {
        let raw = BigDecimal::from(1_500_000);
        assert_eq!(with_decimals(&raw, 6), BigDecimal::from_str("1.5").unwrap());
    }

    #[test]
    fn with_decimals_zero_is_identity() {
        let raw = BigDecimal::from(42);
        assert_eq!(with_decimals(&raw, 0), BigDecimal::from(42));
    }
}
