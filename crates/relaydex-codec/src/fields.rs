//! Big-endian field primitives shared by every record codec.
//!
//! Readers take a slice and an absolute offset. Callers (the views) check
//! the record length once up front, so every offset used here is in range.

use alloy_primitives::{Address, B256, U256};
use relaydex_types::RecordSignature;

pub(crate) fn read_u8(bytes: &[u8], at: usize) -> u8 {
    bytes[at]
}

pub(crate) fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

pub(crate) fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

pub(crate) fn read_b256(bytes: &[u8], at: usize) -> B256 {
    B256::from_slice(&bytes[at..at + 32])
}

pub(crate) fn read_u256(bytes: &[u8], at: usize) -> U256 {
    U256::from_be_slice(&bytes[at..at + 32])
}

pub(crate) fn read_address(bytes: &[u8], at: usize) -> Address {
    Address::from_slice(&bytes[at..at + 20])
}

/// Reads the `s ‖ r ‖ v` prefix starting at `at`.
pub(crate) fn read_signature(bytes: &[u8], at: usize) -> RecordSignature {
    RecordSignature {
        s: read_b256(bytes, at),
        r: read_b256(bytes, at + 32),
        v: read_u8(bytes, at + 64),
    }
}

/// Append-only big-endian writer.
#[derive(Debug, Default)]
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn put_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn put_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn put_u256(&mut self, value: U256) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes::<32>());
        self
    }

    pub fn put_address(&mut self, value: Address) -> &mut Self {
        self.buf.extend_from_slice(value.as_slice());
        self
    }

    pub fn put_signature(&mut self, sig: &RecordSignature) -> &mut Self {
        self.buf.extend_from_slice(&sig.to_wire());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
