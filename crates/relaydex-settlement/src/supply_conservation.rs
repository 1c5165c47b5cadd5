//! Supply conservation check.
//!
//! ```text
//! ∀ token: Σ balances == Σ inflows − Σ outflows
//! ```
//!
//! Inflows are deposits and migrations received; outflows are withdrawals
//! and migrations sent. Trades, transfers and fees only move value between
//! owners, so they never change the sum.

use std::collections::{BTreeSet, HashMap};

use alloy_primitives::{Address, U256};
use relaydex_types::{RelayError, Result};

#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    inflows: HashMap<Address, U256>,
    outflows: HashMap<Address, U256>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_inflow(&mut self, token: Address, amount: U256) {
        let slot = self.inflows.entry(token).or_insert(U256::ZERO);
        *slot = slot.saturating_add(amount);
    }

    pub fn record_outflow(&mut self, token: Address, amount: U256) {
        let slot = self.outflows.entry(token).or_insert(U256::ZERO);
        *slot = slot.saturating_add(amount);
    }

    /// Inflows minus outflows for `token`.
    #[must_use]
    pub fn expected_supply(&self, token: Address) -> U256 {
        let inflow = self.inflows.get(&token).copied().unwrap_or(U256::ZERO);
        let outflow = self.outflows.get(&token).copied().unwrap_or(U256::ZERO);
        inflow.saturating_sub(outflow)
    }

    /// # Errors
    /// [`RelayError::SupplyMismatch`] if `actual` differs from the expected
    /// supply.
    pub fn verify(&self, token: Address, actual: U256) -> Result<()> {
        let expected = self.expected_supply(token);
        if actual != expected {
            return Err(RelayError::SupplyMismatch {
                token,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Every token that has seen an inflow or outflow, sorted.
    #[must_use]
    pub fn tracked_tokens(&self) -> Vec<Address> {
        let tokens: BTreeSet<Address> = self
            .inflows
            .keys()
            .chain(self.outflows.keys())
            .copied()
            .collect();
        tokens.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::repeat_byte(0x10);

    #[test]
    fn balanced_flows_verify() {
        let mut supply = SupplyConservation::new();
        supply.record_inflow(TOKEN, U256::from(1_000));
        supply.record_outflow(TOKEN, U256::from(400));
        assert_eq!(supply.expected_supply(TOKEN), U256::from(600));
        assert!(supply.verify(TOKEN, U256::from(600)).is_ok());
    }

    #[test]
    fn drift_is_detected() {
        let mut supply = SupplyConservation::new();
        supply.record_inflow(TOKEN, U256::from(10));
        let err = supply.verify(TOKEN, U256::from(11)).unwrap_err();
        assert!(matches!(err, RelayError::SupplyMismatch { .. }));
        assert!(err.to_string().contains("RD_ERR_402"));
    }

    #[test]
    fn tracked_tokens_are_deduplicated() {
        let mut supply = SupplyConservation::new();
        supply.record_inflow(TOKEN, U256::from(1));
        supply.record_outflow(TOKEN, U256::from(1));
        supply.record_inflow(Address::ZERO, U256::from(1));
        assert_eq!(supply.tracked_tokens(), vec![Address::ZERO, TOKEN]);
    }
}
