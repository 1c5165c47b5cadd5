//! # relaydex-types
//!
//! Shared types, errors, and configuration for the **RelayDEX** settlement core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`TokenId`], [`RecordKind`], plus the alloy
//!   [`Address`], [`B256`] and [`U256`] primitives re-exported for convenience
//! - **Signed records**: [`Order`], [`Withdrawal`], [`TransferBatch`], [`Migration`]
//! - **Config flags**: [`OrderFlags`], [`WithdrawalFlags`], [`TransferFlags`]
//! - **Signatures**: [`RecordSignature`]
//! - **Events**: [`ExchangeEvent`], [`EventMask`], [`EventSink`], [`EventLog`]
//! - **Collaborator seams**: [`Directory`], [`AccessControl`], [`AdminCapability`], [`OwnerCapability`]
//! - **Configuration**: [`ExchangeConfig`], [`FeeSchedule`]
//! - **Errors**: [`RelayError`] with `RD_ERR_` prefix codes
//! - **Constants**: wire sizes and defaults

pub mod access;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod event;
pub mod flags;
pub mod ids;
pub mod migration;
pub mod order;
pub mod signature;
pub mod transfer;
pub mod withdrawal;

// Re-export all primary types at crate root for ergonomic imports:
//   use relaydex_types::{Order, Withdrawal, RelayError, ...};

pub use access::*;
pub use config::*;
pub use directory::*;
pub use error::*;
pub use event::*;
pub use flags::*;
pub use ids::*;
pub use migration::*;
pub use order::*;
pub use signature::*;
pub use transfer::*;
pub use withdrawal::*;

pub use alloy_primitives::{Address, B256, U256};

// Constants are accessed via `relaydex_types::constants::FOO`
// (not re-exported to avoid name collisions).
