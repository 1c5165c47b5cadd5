//! The `(r, s, v)` triple attached to user-signed records.

use std::fmt;

use alloy_primitives::{B256, Signature};
use serde::{Deserialize, Serialize};

/// A secp256k1 signature exactly as it travels on the wire.
///
/// `v` is kept raw (`0`/`1` or `27`/`28`); normalisation happens in the
/// signing crate at recovery time so that re-encoding is byte-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RecordSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl RecordSignature {
    #[must_use]
    pub fn new(r: B256, s: B256, v: u8) -> Self {
        Self { r, s, v }
    }

    /// Wire form: `s(32) ‖ r(32) ‖ v(1)`.
    #[must_use]
    pub fn to_wire(&self) -> [u8; crate::constants::SIGNATURE_LEN] {
        let mut out = [0u8; crate::constants::SIGNATURE_LEN];
        out[..32].copy_from_slice(self.s.as_slice());
        out[32..64].copy_from_slice(self.r.as_slice());
        out[64] = self.v;
        out
    }
}

/// Short form for logs: leading bytes of `r` and `s`, then `v`.
impl fmt::Display for RecordSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sig:{}..{}/{}",
            hex::encode(&self.r[..4]),
            hex::encode(&self.s[..4]),
            self.v
        )
    }
}

impl From<Signature> for RecordSignature {
    /// Converts an alloy signature, emitting `v` in the `27`/`28` form.
    fn from(sig: Signature) -> Self {
        Self {
            r: B256::from(sig.r()),
            s: B256::from(sig.s()),
            v: 27 + u8::from(sig.v()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_order_is_s_then_r_then_v() {
        let sig = RecordSignature::new(B256::repeat_byte(0xaa), B256::repeat_byte(0xbb), 27);
        let wire = sig.to_wire();
        assert!(wire[..32].iter().all(|b| *b == 0xbb));
        assert!(wire[32..64].iter().all(|b| *b == 0xaa));
        assert_eq!(wire[64], 27);
    }

    #[test]
    fn display_is_short() {
        let sig = RecordSignature::new(B256::repeat_byte(0xab), B256::repeat_byte(0x01), 28);
        assert_eq!(sig.to_string(), "sig:abababab..01010101/28");
    }

    #[test]
    fn from_alloy_uses_27_28() {
        let alloy = Signature::from_scalars_and_parity(
            B256::repeat_byte(1),
            B256::repeat_byte(2),
            true,
        );
        let sig = RecordSignature::from(alloy);
        assert_eq!(sig.r, B256::repeat_byte(1));
        assert_eq!(sig.s, B256::repeat_byte(2));
        assert_eq!(sig.v, 28);
    }
}
