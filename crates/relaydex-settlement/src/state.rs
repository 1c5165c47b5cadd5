//! Journaled exchange state.
//!
//! Every mutation made inside [`SettlementState::atomically`] pushes an undo
//! entry holding the slot's previous value. If the closure returns `Err`,
//! the entries written since the checkpoint are replayed in reverse and the
//! state is exactly what it was before the call. Calls nest: an inner
//! failure that the outer closure handles only unwinds the inner part.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Duration, Utc};
use relaydex_types::{RecordKind, Result};
use tracing::warn;

use crate::{BalanceLedger, FillLedger, NonceRegistry, WithdrawLock};

#[derive(Debug, Clone, PartialEq, Eq)]
enum JournalEntry {
    Balance {
        token: Address,
        owner: Address,
        prev: U256,
    },
    Fill {
        order_hash: B256,
        prev: U256,
    },
    Nonce {
        kind: RecordKind,
        owner: Address,
        prev: Option<u32>,
    },
    Lock {
        owner: Address,
        prev: Option<DateTime<Utc>>,
    },
}

/// Ledger, fill, nonce and lock state behind one undo log.
#[derive(Debug, Default)]
pub struct SettlementState {
    ledger: BalanceLedger,
    fills: FillLedger,
    nonces: NonceRegistry,
    locks: WithdrawLock,
    journal: Vec<JournalEntry>,
    depth: usize,
}

impl SettlementState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    #[must_use]
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    #[must_use]
    pub fn fills(&self) -> &FillLedger {
        &self.fills
    }

    #[must_use]
    pub fn nonces(&self) -> &NonceRegistry {
        &self.nonces
    }

    #[must_use]
    pub fn locks(&self) -> &WithdrawLock {
        &self.locks
    }

    #[must_use]
    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.ledger.balance(token, owner)
    }

    #[must_use]
    pub fn total_supply(&self, token: Address) -> U256 {
        self.ledger.total_supply(token)
    }

    // -----------------------------------------------------------------
    // Journaled writes
    // -----------------------------------------------------------------

    pub fn credit(&mut self, token: Address, owner: Address, amount: U256) -> Result<U256> {
        let prev = self.ledger.credit(token, owner, amount)?;
        self.record(JournalEntry::Balance { token, owner, prev });
        Ok(prev + amount)
    }

    pub fn debit(&mut self, token: Address, owner: Address, amount: U256) -> Result<U256> {
        let prev = self.ledger.debit(token, owner, amount)?;
        self.record(JournalEntry::Balance { token, owner, prev });
        Ok(prev - amount)
    }

    /// Debit `from`, credit `to`. Both legs are journaled separately, so a
    /// failed credit leaves the debit to the enclosing rollback.
    pub fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)?;
        Ok(())
    }

    pub fn record_fill(&mut self, order_hash: B256, amount: U256) -> Result<()> {
        let prev = self.fills.record(order_hash, amount)?;
        self.record(JournalEntry::Fill { order_hash, prev });
        Ok(())
    }

    pub fn advance_nonce(&mut self, kind: RecordKind, owner: Address, nonce: u32) -> Result<()> {
        let prev = self.nonces.advance(kind, owner, nonce)?;
        self.record(JournalEntry::Nonce { kind, owner, prev });
        Ok(())
    }

    pub fn lock_account(&mut self, owner: Address, now: DateTime<Utc>) {
        let prev = self.locks.lock(owner, now);
        self.record(JournalEntry::Lock { owner, prev });
    }

    pub fn unlock_account(&mut self, owner: Address) {
        let prev = self.locks.unlock(owner);
        self.record(JournalEntry::Lock { owner, prev });
    }

    pub fn check_withdraw(
        &self,
        owner: Address,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<()> {
        self.locks.check_withdraw(owner, now, cooldown)
    }

    // -----------------------------------------------------------------
    // Atomicity
    // -----------------------------------------------------------------

    /// Run `f` all-or-nothing.
    pub fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.journal.len();
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        match result {
            Ok(value) => {
                if self.depth == 0 {
                    self.journal.clear();
                }
                Ok(value)
            }
            Err(err) => {
                let undone = self.journal.len() - checkpoint;
                self.revert_to(checkpoint);
                warn!(error = %err, undone, "rolled back");
                Err(err)
            }
        }
    }

    fn record(&mut self, entry: JournalEntry) {
        if self.depth > 0 {
            self.journal.push(entry);
        }
    }

    fn revert_to(&mut self, checkpoint: usize) {
        for entry in self.journal.drain(checkpoint..).rev() {
            match entry {
                JournalEntry::Balance { token, owner, prev } => {
                    // restoring an earlier value cannot overflow the total
                    let _ = self.ledger.set(token, owner, prev);
                }
                JournalEntry::Fill { order_hash, prev } => self.fills.restore(order_hash, prev),
                JournalEntry::Nonce { kind, owner, prev } => {
                    self.nonces.restore(kind, owner, prev);
                }
                JournalEntry::Lock { owner, prev } => self.locks.restore(owner, prev),
            }
        }
    }
}
