//! ABI surface of the three contract reads this system performs. Decoding is
//! defensive throughout: a malformed return payload is the same as a failed
//! call, never a crash.

use alloy::primitives::{Address, I256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, Sign};

sol! {
    /// Minimal ERC-20 / ERC-721 read surface. `balanceOf` doubles as the
    /// owned-asset count for ERC-721 contracts.
    interface IErc20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }

    /// ChainLink-style aggregator read surface.
    interface IAggregator {
        function latestAnswer() external view returns (int256);
        function decimals() external view returns (uint8);
    }
}

pub fn encode_balance_of(owner: Address) -> Vec<u8> {
    IErc20::balanceOfCall { owner }.abi_encode()
}

pub fn encode_feed_decimals() -> Vec<u8> {
    IAggregator::decimalsCall {}.abi_encode()
}

pub fn encode_latest_answer() -> Vec<u8> {
    IAggregator::latestAnswerCall {}.abi_encode()
}

pub fn decode_balance_of(data: &[u8]) -> Option<U256> {
    IErc20::balanceOfCall::abi_decode_returns(data).ok()
}

pub fn decode_feed_decimals(data: &[u8]) -> Option<u8> {
    IAggregator::decimalsCall::abi_decode_returns(data).ok()
}

pub fn decode_latest_answer(data: &[u8]) -> Option<I256> {
    IAggregator::latestAnswerCall::abi_decode_returns(data).ok()
}

/// Lossless conversion of a signed oracle answer into a decimal integer.
pub fn i256_to_decimal(value: I256) -> BigDecimal {
    let magnitude = BigInt::from_bytes_be(Sign::Plus, &value.unsigned_abs().to_be_bytes::<32>());
    let signed = if value.is_negative() {
        -magnitude
    } else {
        magnitude
    };
    BigDecimal::from(signed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_of_selector_and_layout() {
        assert_eq!(IErc20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);

        let owner: Address = "0x00000000000000000000000000000000000000aa"
            .parse()
            .unwrap();
        let calldata = encode_balance_of(owner);
        // 4-byte selector + one 32-byte padded address argument.
        assert_eq!(calldata.len(), 36);
        assert_eq!(calldata[35], 0xaa);
    }

    #[test]
    fn aggregator_selectors() {
        assert_eq!(
            IAggregator::latestAnswerCall::SELECTOR,
            [0x50, 0xd2, 0x5b, 0xcd]
        );
        assert_eq!(IAggregator::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn decodes_balance_word() {
        let mut word = [0u8; 32];
        word[31] = 0x2a;
        assert_eq!(decode_balance_of(&word), Some(U256::from(42)));
    }

    #[test]
    fn garbage_decodes_to_none_not_panic() {
        assert_eq!(decode_balance_of(&[]), None);
        assert_eq!(decode_balance_of(&[0x01, 0x02]), None);
        assert_eq!(decode_feed_decimals(b"not abi"), None);
        assert_eq!(decode_latest_answer(&[0xff; 3]), None);
    }

    #[test]
    fn negative_answers_convert_signed() {
        let minus_five = I256::try_from(-5i64).unwrap();
        assert_eq!(i256_to_decimal(minus_five), BigDecimal::from(-5));
        let plus_five = I256::try_from(5i64).unwrap();
        assert_eq!(i256_to_decimal(plus_five), BigDecimal::from(5));
    }
}
