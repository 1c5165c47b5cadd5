//! Replay protection for withdrawals and transfers.
//!
//! Each `(kind, owner)` pair remembers the last nonce it accepted. A new
//! record must carry a strictly greater nonce. Orders are not tracked here;
//! the fill ledger already stops them from settling twice.

use std::collections::HashMap;

use alloy_primitives::Address;
use relaydex_types::{RecordKind, RelayError, Result};

#[derive(Debug, Clone, Default)]
pub struct NonceRegistry {
    last: HashMap<(RecordKind, Address), u32>,
}

impl NonceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last(&self, kind: RecordKind, owner: Address) -> Option<u32> {
        self.last.get(&(kind, owner)).copied()
    }

    /// Accepts `nonce` if it is above the last one, returning the previous
    /// entry.
    ///
    /// # Errors
    /// [`RelayError::NonceReplay`] when `nonce` does not advance.
    pub fn advance(&mut self, kind: RecordKind, owner: Address, nonce: u32) -> Result<Option<u32>> {
        let prev = self.last(kind, owner);
        if let Some(last) = prev.filter(|last| nonce <= *last) {
            return Err(RelayError::NonceReplay {
                kind,
                owner,
                nonce,
                last,
            });
        }
        self.last.insert((kind, owner), nonce);
        Ok(prev)
    }

    pub(crate) fn restore(&mut self, kind: RecordKind, owner: Address, prev: Option<u32>) {
        match prev {
            Some(nonce) => self.last.insert((kind, owner), nonce),
            None => self.last.remove(&(kind, owner)),
        };
    }
}
