//! Numeric identifiers embedded in signed records.
//!
//! Records never carry full addresses for users or tokens; they carry the
//! compact directory IDs below, which the [`Directory`](crate::Directory)
//! resolves to addresses at call time.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// Directory-assigned user identifier (4 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UserId(pub u32);

impl UserId {
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// Directory-assigned token identifier (2 bytes on the wire).
///
/// ID `0` is the chain's native asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenId(pub u16);

impl TokenId {
    /// The native asset.
    pub const NATIVE: Self = Self(crate::constants::NATIVE_TOKEN_ID);

    #[must_use]
    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }

    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// The family a wire record belongs to. Used in codec errors and to keep
/// nonce namespaces apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RecordKind {
    Order,
    Withdrawal,
    Transfer,
    Migration,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => write!(f, "ORDER"),
            Self::Withdrawal => write!(f, "WITHDRAWAL"),
            Self::Transfer => write!(f, "TRANSFER"),
            Self::Migration => write!(f, "MIGRATION"),
        }
    }
}
