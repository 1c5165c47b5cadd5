//! # relaydex-settlement
//!
//! **Settlement core**: the balance ledger and every path that moves value
//! through it.
//!
//! ## Architecture
//!
//! An [`Exchange`] owns a journaled [`SettlementState`] and dispatches each
//! entry point to a processor:
//! 1. [`SettlementEngine`] matches a signed taker against signed makers
//! 2. [`WithdrawalProcessor`] handles self-service and relayed withdrawals
//! 3. [`TransferProcessor`] applies multi-receiver internal transfers
//! 4. [`MigrationProcessor`] hands a user's balances to another ledger
//!
//! Processors run inside [`SettlementState::atomically`], so a failed call
//! leaves balances, fills, nonces and locks untouched. Events are emitted
//! only after the call commits, filtered by the configured event mask.
//! [`SupplyConservation`] tracks deposits against withdrawals so the
//! ledger's totals can be audited at any time.

pub mod engine;
pub mod exchange;
pub mod fees;
pub mod fills;
pub mod ledger;
pub mod migration;
pub mod nonce;
pub mod state;
pub mod supply_conservation;
pub mod transfer;
pub mod withdraw_lock;
pub mod withdrawal;

pub use engine::{MakerFill, SettlementEngine, SettlementOutcome};
pub use exchange::Exchange;
pub use fees::{FeeCharge, compute_fee};
pub use fills::FillLedger;
pub use ledger::BalanceLedger;
pub use migration::{MigrationOutcome, MigrationProcessor, MigrationTarget};
pub use nonce::NonceRegistry;
pub use state::SettlementState;
pub use supply_conservation::SupplyConservation;
pub use transfer::{TransferOutcome, TransferProcessor};
pub use withdraw_lock::{WithdrawLock, unlock_time};
pub use withdrawal::{Payout, WithdrawalOutcome, WithdrawalProcessor};
