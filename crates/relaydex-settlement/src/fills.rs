//! Fill ledger: cumulative `subAmount` filled per order hash.
//!
//! Entries only grow and are never reset. An order whose entry equals its
//! `subAmount` is exhausted; re-submitting it settles nothing.

use std::collections::HashMap;

use alloy_primitives::{B256, U256};
use relaydex_types::{RelayError, Result};

#[derive(Debug, Clone, Default)]
pub struct FillLedger {
    filled: HashMap<B256, U256>,
}

impl FillLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filled(&self, order_hash: B256) -> U256 {
        self.filled.get(&order_hash).copied().unwrap_or(U256::ZERO)
    }

    /// What is left of an order of size `sub_amount`.
    #[must_use]
    pub fn remaining(&self, order_hash: B256, sub_amount: U256) -> U256 {
        sub_amount.saturating_sub(self.filled(order_hash))
    }

    /// Adds `amount` to the order's fill, returning the previous value.
    pub fn record(&mut self, order_hash: B256, amount: U256) -> Result<U256> {
        let prev = self.filled(order_hash);
        let next = prev
            .checked_add(amount)
            .ok_or_else(|| RelayError::ArithmeticOverflow(format!("fill of {order_hash}")))?;
        self.filled.insert(order_hash, next);
        Ok(prev)
    }

    pub(crate) fn restore(&mut self, order_hash: B256, prev: U256) {
        if prev.is_zero() {
            self.filled.remove(&order_hash);
        } else {
            self.filled.insert(order_hash, prev);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_accumulate() {
        let mut fills = FillLedger::new();
        let h = B256::repeat_byte(1);
        fills.record(h, U256::from(40)).unwrap();
        fills.record(h, U256::from(60)).unwrap();
        assert_eq!(fills.filled(h), U256::from(100));
        assert_eq!(fills.remaining(h, U256::from(100)), U256::ZERO);
        assert_eq!(fills.remaining(h, U256::from(130)), U256::from(30));
    }

    #[test]
    fn unknown_order_is_unfilled() {
        let fills = FillLedger::new();
        assert_eq!(fills.filled(B256::ZERO), U256::ZERO);
        assert!(fills.is_empty());
    }

    #[test]
    fn restore_to_zero_drops_entry() {
        let mut fills = FillLedger::new();
        let h = B256::repeat_byte(2);
        let prev = fills.record(h, U256::from(5)).unwrap();
        fills.restore(h, prev);
        assert!(fills.is_empty());
    }
}
