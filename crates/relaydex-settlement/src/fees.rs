//! Trading fee arithmetic.

use alloy_primitives::{Address, U256};
use relaydex_types::{RelayError, Result};

/// `received * fee_price / divisor`, floored.
///
/// # Errors
/// [`RelayError::ArithmeticOverflow`] if the product exceeds 256 bits and
/// [`RelayError::Configuration`] for a zero divisor.
pub fn compute_fee(received: U256, fee_price: U256, divisor: U256) -> Result<U256> {
    if divisor.is_zero() {
        return Err(RelayError::Configuration("fee divisor is zero".into()));
    }
    let product = received
        .checked_mul(fee_price)
        .ok_or_else(|| RelayError::ArithmeticOverflow("fee amount * fee price".into()))?;
    Ok(product / divisor)
}

/// A fee taken from one payer into the fee wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCharge {
    pub payer: Address,
    pub token: Address,
    pub amount: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taker_fee_at_default_divisor() {
        // 100e18 received at feePrice 10 with the 5M taker divisor
        let received = U256::from(100u64) * U256::from(10u64).pow(U256::from(18));
        let fee = compute_fee(received, U256::from(10), U256::from(5_000_000)).unwrap();
        assert_eq!(fee, U256::from(200_000_000_000_000u64));
    }

    #[test]
    fn fee_floors() {
        let fee = compute_fee(U256::from(9), U256::from(1), U256::from(10)).unwrap();
        assert_eq!(fee, U256::ZERO);
    }

    #[test]
    fn overflow_and_zero_divisor() {
        assert!(matches!(
            compute_fee(U256::MAX, U256::from(2), U256::from(1)),
            Err(RelayError::ArithmeticOverflow(_))
        ));
        assert!(matches!(
            compute_fee(U256::from(1), U256::from(1), U256::ZERO),
            Err(RelayError::Configuration(_))
        ));
    }
}
