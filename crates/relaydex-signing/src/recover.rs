//! secp256k1 signer recovery.
//!
//! Accepts `v ∈ {0, 1, 27, 28}` and rejects zero scalars and the malleable
//! high-s form before attempting recovery.

use alloy_primitives::{Address, B256, Signature, U256, uint};
use relaydex_types::{RecordSignature, RelayError, Result};
use tracing::debug;

use crate::SignedRecord;

/// Half the secp256k1 group order. Signatures with `s` above it are the
/// malleable twin of a valid low-s signature.
pub const SECP256K1N_HALF: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// Normalises `v` to a y-parity bit.
fn parity(v: u8) -> Result<bool> {
    match v {
        0 | 27 => Ok(false),
        1 | 28 => Ok(true),
        other => Err(RelayError::invalid_signature(format!(
            "recovery id {other} not in {{0, 1, 27, 28}}"
        ))),
    }
}

/// Converts a wire signature into the alloy form after the range checks.
pub fn to_alloy_signature(sig: &RecordSignature) -> Result<Signature> {
    let y_parity = parity(sig.v)?;
    let r = U256::from_be_bytes(sig.r.0);
    let s = U256::from_be_bytes(sig.s.0);
    if r.is_zero() || s.is_zero() {
        return Err(RelayError::invalid_signature("zero r or s"));
    }
    if s > SECP256K1N_HALF {
        return Err(RelayError::invalid_signature("s in upper half of curve order"));
    }
    Ok(Signature::from_scalars_and_parity(sig.r, sig.s, y_parity))
}

/// Recovers the address that produced `sig` over `digest`.
pub fn recover_signer(digest: B256, sig: &RecordSignature) -> Result<Address> {
    let signature = to_alloy_signature(sig)?;
    signature
        .recover_address_from_prehash(&digest)
        .map_err(|e| RelayError::invalid_signature(format!("recovery failed: {e}")))
}

/// Recovers the signer and requires it to be `expected`.
pub fn verify_signer(digest: B256, sig: &RecordSignature, expected: Address) -> Result<()> {
    let recovered = recover_signer(digest, sig)?;
    if recovered != expected {
        debug!(%digest, %recovered, %expected, signature = %sig, "signer mismatch");
        return Err(RelayError::invalid_signature(format!(
            "recovered {recovered}, expected {expected}"
        )));
    }
    Ok(())
}

/// Verifies an embedded-signature record against `expected` and returns its
/// canonical hash.
pub fn verify_record<R: SignedRecord + ?Sized>(record: &R, expected: Address) -> Result<B256> {
    let digest = record.canonical_hash();
    verify_signer(digest, &record.signature(), expected)?;
    Ok(digest)
}
