//! Balance ledger: `(token, owner) -> amount`.
//!
//! A debit never underflows; it fails with
//! [`RelayError::InsufficientBalance`]. A credit that would overflow 256
//! bits is reported as [`RelayError::LedgerOverflow`], which callers treat
//! as fatal. The ledger also keeps a running per-token total so supply
//! checks do not have to scan every owner.
//!
//! The ledger itself is not journaled. [`SettlementState`](crate::SettlementState)
//! wraps it and records the previous value of every slot it touches.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use relaydex_types::{RelayError, Result};

#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    balances: HashMap<(Address, Address), U256>,
    totals: HashMap<Address, U256>,
}

impl BalanceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Sum of every owner's balance of `token`.
    #[must_use]
    pub fn total_supply(&self, token: Address) -> U256 {
        self.totals.get(&token).copied().unwrap_or(U256::ZERO)
    }

    /// Adds `amount`, returning the balance before the credit.
    pub fn credit(&mut self, token: Address, owner: Address, amount: U256) -> Result<U256> {
        let prev = self.balance(token, owner);
        let next = prev
            .checked_add(amount)
            .ok_or(RelayError::LedgerOverflow { token, owner })?;
        self.set(token, owner, next)?;
        Ok(prev)
    }

    /// Subtracts `amount`, returning the balance before the debit.
    pub fn debit(&mut self, token: Address, owner: Address, amount: U256) -> Result<U256> {
        let prev = self.balance(token, owner);
        let next = prev
            .checked_sub(amount)
            .ok_or(RelayError::InsufficientBalance {
                token,
                owner,
                needed: amount,
                available: prev,
            })?;
        self.set(token, owner, next)?;
        Ok(prev)
    }

    /// Overwrites one slot and keeps the token total in step.
    pub(crate) fn set(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        let prev = self.balance(token, owner);
        let total = self.total_supply(token);
        // total >= prev always holds, so only the add can fail
        let total = (total - prev)
            .checked_add(value)
            .ok_or(RelayError::LedgerOverflow { token, owner })?;

        if value.is_zero() {
            self.balances.remove(&(token, owner));
        } else {
            self.balances.insert((token, owner), value);
        }
        if total.is_zero() {
            self.totals.remove(&token);
        } else {
            self.totals.insert(token, total);
        }
        Ok(())
    }

    /// Number of nonzero `(token, owner)` slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
