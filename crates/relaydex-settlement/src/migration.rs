//! Balance migration to another ledger instance.
//!
//! A signed migration record names a target and up to three tokens. Every
//! token is resolved before anything moves. The user's balances are then
//! zeroed locally and handed to the target under the same owner address.

use alloy_primitives::{Address, U256};
use relaydex_codec::MigrationView;
use relaydex_signing::verify_record;
use relaydex_types::{Directory, MigrateEvent, RelayError, Result};
use tracing::{debug, info};

use crate::SettlementState;

/// The receiving side of a migration.
pub trait MigrationTarget {
    /// Address the target is known by; migration records must name it.
    fn target_address(&self) -> Address;

    /// Credit every `(token, amount)` leg to `owner` on the target.
    ///
    /// Either every leg is credited or, on `Err`, none is.
    fn receive_migration(&mut self, owner: Address, legs: &[(Address, U256)]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub user: Address,
    pub target: Address,
    /// Tokens with a nonzero balance that were moved.
    pub moved: Vec<MigrateEvent>,
}

pub struct MigrationProcessor<'a, D: Directory> {
    directory: &'a D,
}

impl<'a, D: Directory> MigrationProcessor<'a, D> {
    #[must_use]
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Local debits happen first and are journaled. The target then takes
    /// all legs in one call; an error from it unwinds the local side too.
    pub fn process<T: MigrationTarget + ?Sized>(
        &self,
        state: &mut SettlementState,
        view: &MigrationView<'_>,
        target: &mut T,
    ) -> Result<MigrationOutcome> {
        let requested = view.target();
        let actual = target.target_address();
        if requested != actual {
            return Err(RelayError::TargetMismatch { requested, actual });
        }

        let user = self.directory.require_user(view.user_id())?;
        let digest = verify_record(view, user)?;

        let tokens = view
            .token_ids()
            .into_iter()
            .map(|id| self.directory.require_token(id))
            .collect::<Result<Vec<_>>>()?;

        let mut moved = Vec::with_capacity(tokens.len());
        for token in tokens {
            let amount = state.balance(token, user);
            if amount.is_zero() {
                debug!(%token, user = %user, "nothing to migrate");
                continue;
            }
            state.debit(token, user, amount)?;
            moved.push(MigrateEvent {
                token,
                user,
                target: actual,
                amount,
            });
        }

        if !moved.is_empty() {
            let legs: Vec<_> = moved.iter().map(|e| (e.token, e.amount)).collect();
            target.receive_migration(user, &legs)?;
        }

        info!(
            user = %user,
            target = %actual,
            hash = %digest,
            tokens = moved.len(),
            "migrated balances"
        );
        Ok(MigrationOutcome {
            user,
            target: actual,
            moved,
        })
    }
}
