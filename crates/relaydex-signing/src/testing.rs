//! Signing fixtures for tests.

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use relaydex_types::{Migration, Order, RecordSignature, TransferBatch, Withdrawal};

use crate::{migration_hash, order_hash, transfer_batch_hash, withdrawal_hash};

/// A user key that signs records the way a wallet would.
#[derive(Debug, Clone)]
pub struct RecordSigner {
    inner: PrivateKeySigner,
}

impl RecordSigner {
    /// Deterministic key derived from `seed` (must be nonzero).
    pub fn from_seed(seed: u8) -> Self {
        let inner = PrivateKeySigner::from_bytes(&B256::repeat_byte(seed))
            .expect("repeat-byte keys below the curve order are valid");
        Self { inner }
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    pub fn sign_digest(&self, digest: B256) -> RecordSignature {
        let sig = self
            .inner
            .sign_hash_sync(&digest)
            .expect("local signing does not fail");
        RecordSignature::from(sig)
    }

    /// Fills in `order.signature`.
    pub fn sign_order(&self, mut order: Order) -> Order {
        order.signature = self.sign_digest(order_hash(&order));
        order
    }

    pub fn sign_withdrawal(&self, mut withdrawal: Withdrawal) -> Withdrawal {
        withdrawal.signature = self.sign_digest(withdrawal_hash(&withdrawal));
        withdrawal
    }

    pub fn sign_migration(&self, mut migration: Migration) -> Migration {
        let digest = migration_hash(&migration).expect("1..=3 token ids");
        migration.signature = self.sign_digest(digest);
        migration
    }

    /// Transfer signatures travel beside the blob.
    pub fn sign_transfer(&self, batch: &TransferBatch) -> RecordSignature {
        self.sign_digest(transfer_batch_hash(batch))
    }
}
