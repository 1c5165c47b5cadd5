//! Cooldown lock for self-service withdrawals.
//!
//! A user who wants to leave without the relayer locks their account.
//! Once the cooldown has elapsed they may withdraw directly. Unlocking
//! clears the request.

use std::collections::HashMap;

use alloy_primitives::Address;
use chrono::{DateTime, Duration, Utc};
use relaydex_types::{RelayError, Result};

/// End of the cooldown for a lock taken at `locked_at`.
///
/// # Errors
/// [`RelayError::Configuration`] if the result falls outside the
/// representable date range.
pub fn unlock_time(locked_at: DateTime<Utc>, cooldown: Duration) -> Result<DateTime<Utc>> {
    locked_at.checked_add_signed(cooldown).ok_or_else(|| {
        RelayError::Configuration(format!("cooldown {cooldown} overflows lock time {locked_at}"))
    })
}

/// Per-owner lock timestamps.
#[derive(Debug, Clone, Default)]
pub struct WithdrawLock {
    locked_at: HashMap<Address, DateTime<Utc>>,
}

impl WithdrawLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn locked_at(&self, owner: Address) -> Option<DateTime<Utc>> {
        self.locked_at.get(&owner).copied()
    }

    /// Records a lock at `now`, returning any earlier lock time it replaced.
    pub fn lock(&mut self, owner: Address, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_at.insert(owner, now)
    }

    /// Clears the lock, returning the removed timestamp.
    pub fn unlock(&mut self, owner: Address) -> Option<DateTime<Utc>> {
        self.locked_at.remove(&owner)
    }

    /// Check whether `owner` may withdraw at `now`.
    ///
    /// # Errors
    /// [`RelayError::NotUnlocked`] if no lock exists or the cooldown has not
    /// elapsed. `unlocks_at` is filled in for the second case.
    pub fn check_withdraw(
        &self,
        owner: Address,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<()> {
        let Some(locked_at) = self.locked_at(owner) else {
            return Err(RelayError::NotUnlocked {
                owner,
                unlocks_at: None,
            });
        };
        let unlocks_at = unlock_time(locked_at, cooldown)?;
        if now < unlocks_at {
            return Err(RelayError::NotUnlocked {
                owner,
                unlocks_at: Some(unlocks_at),
            });
        }
        Ok(())
    }

    pub(crate) fn restore(&mut self, owner: Address, prev: Option<DateTime<Utc>>) {
        match prev {
            Some(at) => self.locked_at.insert(owner, at),
            None => self.locked_at.remove(&owner),
        };
    }
}
