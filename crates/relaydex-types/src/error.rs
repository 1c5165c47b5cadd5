//! Error types for the RelayDEX settlement core.
//!
//! All errors use the `RD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Codec errors
//! - 2xx: Signature errors
//! - 3xx: Identity (directory) errors
//! - 4xx: Ledger errors
//! - 5xx: Withdrawal timing errors
//! - 6xx: Settlement / record validation errors
//! - 7xx: Access control errors
//! - 9xx: General / internal errors
//!
//! Any error returned from an exchange entry point means the whole call was
//! rolled back.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{RecordKind, Role, TokenId, UserId};

/// Central error enum for all RelayDEX operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    // =================================================================
    // Codec Errors (1xx)
    // =================================================================
    /// The byte blob does not have the shape required by its record type.
    #[error("RD_ERR_100: Malformed {kind} record ({len} bytes): {reason}")]
    MalformedRecord {
        kind: RecordKind,
        len: usize,
        reason: String,
    },

    // =================================================================
    // Signature Errors (2xx)
    // =================================================================
    /// Recovery failed or recovered a different signer.
    #[error("RD_ERR_200: Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    // =================================================================
    // Identity Errors (3xx)
    // =================================================================
    /// The user ID is unregistered or has been removed.
    #[error("RD_ERR_300: Invalid user: {0}")]
    InvalidUser(UserId),

    /// The address is not an active user in the directory.
    #[error("RD_ERR_301: Inactive address: {0}")]
    InactiveAddress(Address),

    /// The token ID is unregistered or has been removed.
    #[error("RD_ERR_302: Invalid token: {0}")]
    InvalidToken(TokenId),

    // =================================================================
    // Ledger Errors (4xx)
    // =================================================================
    /// A debit would underflow the owner's balance.
    #[error(
        "RD_ERR_400: Insufficient balance of {token} for {owner}: need {needed}, have {available}"
    )]
    InsufficientBalance {
        token: Address,
        owner: Address,
        needed: U256,
        available: U256,
    },

    /// A credit overflowed 256 bits. Unreachable with realistic supplies;
    /// treated as a fatal invariant violation.
    #[error("RD_ERR_401: Ledger overflow crediting {token} to {owner}")]
    LedgerOverflow { token: Address, owner: Address },

    /// Sum of balances for a token diverged from deposits minus outflows.
    #[error("RD_ERR_402: Supply mismatch for {token}: ledger {actual}, expected {expected}")]
    SupplyMismatch {
        token: Address,
        expected: U256,
        actual: U256,
    },

    // =================================================================
    // Withdrawal Timing Errors (5xx)
    // =================================================================
    /// Self-service withdrawal attempted without a lock, or before the
    /// cooldown elapsed.
    #[error("RD_ERR_500: Account {owner} not unlocked (unlocks at {unlocks_at:?})")]
    NotUnlocked {
        owner: Address,
        unlocks_at: Option<DateTime<Utc>>,
    },

    // =================================================================
    // Settlement / Validation Errors (6xx)
    // =================================================================
    /// Taker and maker trade different token pairs.
    #[error("RD_ERR_600: Pair mismatch between taker and maker {maker_index}")]
    PairMismatch { maker_index: usize },

    /// Taker and maker are on the same side.
    #[error("RD_ERR_601: Side mismatch between taker and maker {maker_index}")]
    SideMismatch { maker_index: usize },

    /// The maker's price is worse than the taker's limit.
    #[error("RD_ERR_602: Price mismatch between taker and maker {maker_index}")]
    PriceMismatch { maker_index: usize },

    /// The order is structurally valid but not settleable (zero amounts).
    #[error("RD_ERR_603: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// A withdrawal, transfer, or deposit carried a zero amount.
    #[error("RD_ERR_604: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The record's nonce is not above the last accepted one.
    #[error("RD_ERR_605: Nonce replay for {kind} from {owner}: got {nonce}, last {last}")]
    NonceReplay {
        kind: RecordKind,
        owner: Address,
        nonce: u32,
        last: u32,
    },

    /// A migration record names a different target than the one supplied.
    #[error("RD_ERR_606: Migration target mismatch: record names {requested}, target is {actual}")]
    TargetMismatch { requested: Address, actual: Address },

    // =================================================================
    // Access Control Errors (7xx)
    // =================================================================
    /// The caller does not hold the required capability.
    #[error("RD_ERR_700: Unauthorized: {caller} lacks {required} role")]
    Unauthorized { caller: Address, required: Role },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// An intermediate product overflowed 256 bits.
    #[error("RD_ERR_900: Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// Configuration error (invalid config file, zero divisors, etc.).
    #[error("RD_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("RD_ERR_902: Serialization error: {0}")]
    Serialization(String),
}

impl RelayError {
    /// Shorthand for a codec length/shape violation.
    #[must_use]
    pub fn malformed(kind: RecordKind, len: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            len,
            reason: reason.into(),
        }
    }

    /// Shorthand for a signature failure.
    #[must_use]
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RelayError>;

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = RelayError::InvalidUser(UserId(9));
        let msg = format!("{err}");
        assert!(msg.starts_with("RD_ERR_300"), "Got: {msg}");
        assert!(msg.contains("user:9"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = RelayError::InsufficientBalance {
            token: Address::ZERO,
            owner: Address::repeat_byte(0x11),
            needed: U256::from(100),
            available: U256::from(50),
        };
        let msg = format!("{err}");
        assert!(msg.contains("RD_ERR_400"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn malformed_display_names_kind() {
        let err = RelayError::malformed(RecordKind::Order, 173, "not a multiple of 174");
        let msg = format!("{err}");
        assert!(msg.contains("RD_ERR_100"));
        assert!(msg.contains("ORDER"));
        assert!(msg.contains("173"));
    }

    #[test]
    fn all_errors_have_rd_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(RelayError::invalid_signature("zero r")),
            Box::new(RelayError::InvalidToken(TokenId(4))),
            Box::new(RelayError::PairMismatch { maker_index: 0 }),
            Box::new(RelayError::NotUnlocked {
                owner: Address::ZERO,
                unlocks_at: None,
            }),
            Box::new(RelayError::Unauthorized {
                caller: Address::ZERO,
                required: Role::Admin,
            }),
            Box::new(RelayError::ArithmeticOverflow("fee".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("RD_ERR_"),
                "Error missing RD_ERR_ prefix: {msg}"
            );
        }
    }
}
