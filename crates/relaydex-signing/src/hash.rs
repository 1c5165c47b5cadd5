//! Canonical digests.
//!
//! A record with an embedded signature is identified by `keccak256` of its
//! payload: the wire bytes after the 65-byte `s ‖ r ‖ v` prefix. The same
//! digest keys the fill ledger for orders. A transfer batch carries no
//! prefix, so its digest covers the whole blob.

use alloy_primitives::{B256, keccak256};
use relaydex_codec::{
    MigrationView, OrderView, TransferBatchView, WithdrawalView, encode_migration, encode_order,
    encode_transfer_batch, encode_withdrawal,
};
use relaydex_types::{
    Migration, Order, RecordSignature, Result, TransferBatch, Withdrawal, constants::SIGNATURE_LEN,
};

/// A wire record that carries its own signature in front of its payload.
pub trait SignedRecord {
    /// The signed bytes (everything after `s ‖ r ‖ v`).
    fn payload(&self) -> &[u8];

    fn signature(&self) -> RecordSignature;

    fn canonical_hash(&self) -> B256 {
        keccak256(self.payload())
    }
}

impl SignedRecord for OrderView<'_> {
    fn payload(&self) -> &[u8] {
        OrderView::payload(self)
    }

    fn signature(&self) -> RecordSignature {
        OrderView::signature(self)
    }
}

impl SignedRecord for WithdrawalView<'_> {
    fn payload(&self) -> &[u8] {
        WithdrawalView::payload(self)
    }

    fn signature(&self) -> RecordSignature {
        WithdrawalView::signature(self)
    }
}

impl SignedRecord for MigrationView<'_> {
    fn payload(&self) -> &[u8] {
        MigrationView::payload(self)
    }

    fn signature(&self) -> RecordSignature {
        MigrationView::signature(self)
    }
}

/// Digest of an encoded transfer batch.
#[must_use]
pub fn transfer_hash(view: &TransferBatchView<'_>) -> B256 {
    keccak256(view.as_bytes())
}

/// Digest of a full wire record with the signature prefix stripped.
///
/// Callers are expected to have length-checked `record` through a view.
#[must_use]
pub fn payload_hash(record: &[u8]) -> B256 {
    keccak256(&record[SIGNATURE_LEN.min(record.len())..])
}

#[must_use]
pub fn order_hash(order: &Order) -> B256 {
    payload_hash(&encode_order(order))
}

#[must_use]
pub fn withdrawal_hash(withdrawal: &Withdrawal) -> B256 {
    payload_hash(&encode_withdrawal(withdrawal))
}

pub fn migration_hash(migration: &Migration) -> Result<B256> {
    Ok(payload_hash(&encode_migration(migration)?))
}

#[must_use]
pub fn transfer_batch_hash(batch: &TransferBatch) -> B256 {
    keccak256(encode_transfer_batch(batch))
}
