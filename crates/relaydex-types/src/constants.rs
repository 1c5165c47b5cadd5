//! System-wide constants for the RelayDEX settlement core.
//!
//! Wire sizes are part of the external contract: previously signed records
//! must keep decoding byte-for-byte, so none of these may change.

/// Width of the `s‖r‖v` signature prefix carried by embedded-signature records.
pub const SIGNATURE_LEN: usize = 65;

/// Encoded order record: `s‖r‖v‖feePrice‖nonce‖config‖subAmount‖subToken‖mainAmount‖mainToken‖userID`.
pub const ORDER_LEN: usize = 174;

/// Encoded withdrawal record: `s‖r‖v‖fee‖nonce‖config‖amount‖tokenID‖userID`.
pub const WITHDRAWAL_LEN: usize = 140;

/// Transfer sender record: `nonce‖config‖from`.
pub const TRANSFER_SENDER_LEN: usize = 25;

/// Transfer receiver record: `fee‖amount‖tokenID‖to`.
pub const TRANSFER_RECEIVER_LEN: usize = 86;

/// Fixed part of a migration record: `s‖r‖v‖userID‖target` (token IDs follow the signature).
pub const MIGRATION_FIXED_LEN: usize = SIGNATURE_LEN + 4 + 20;

/// Maximum number of token IDs carried by one migration record.
pub const MAX_MIGRATION_TOKENS: usize = 3;

/// Default taker fee divisor: `fee = amount * feePrice / 5_000_000`.
pub const DEFAULT_TAKER_FEE_DIVISOR: u64 = 5_000_000;

/// Default maker fee divisor: `fee = amount * feePrice / 10_000_000`.
pub const DEFAULT_MAKER_FEE_DIVISOR: u64 = 10_000_000;

/// Default multiplier applied to the divisor when the fee is paid in the
/// platform fee token (2 = half rate).
pub const DEFAULT_FEE_TOKEN_DISCOUNT: u64 = 2;

/// Default self-service withdrawal cooldown (3 days), in seconds.
pub const DEFAULT_WITHDRAW_COOLDOWN_SECS: i64 = 3 * 24 * 60 * 60;

/// Longest accepted self-service withdrawal cooldown (one year), in seconds.
pub const MAX_WITHDRAW_COOLDOWN_SECS: i64 = 365 * 24 * 60 * 60;

/// Token ID reserved for the chain's native asset (resolves to `Address::ZERO`).
pub const NATIVE_TOKEN_ID: u16 = 0;
