//! # relaydex-signing
//!
//! Binds records to their submitters: canonical `keccak256` digests over the
//! signed bytes, and secp256k1 recovery with `v ∈ {0, 1, 27, 28}` and low-s
//! enforcement.
//!
//! Settlement calls [`verify_record`] (embedded signatures) or
//! [`verify_signer`] with [`transfer_hash`] (detached transfer signatures)
//! and compares against the address the directory resolves.

pub mod hash;
pub mod recover;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use hash::{
    SignedRecord, migration_hash, order_hash, payload_hash, transfer_batch_hash, transfer_hash,
    withdrawal_hash,
};
pub use recover::{
    SECP256K1N_HALF, recover_signer, to_alloy_signature, verify_record, verify_signer,
};
