//! Migration records: `s ‖ r ‖ v ‖ tokenIDs(n × 2) ‖ userID(4) ‖ target(20)`.
//!
//! The number of token IDs is implied by the record length.

use alloy_primitives::Address;
use relaydex_types::{
    Migration, RecordKind, RecordSignature, RelayError, Result, TokenId, UserId,
    constants::{MAX_MIGRATION_TOKENS, MIGRATION_FIXED_LEN, SIGNATURE_LEN},
};

use crate::fields::{FieldWriter, read_address, read_signature, read_u16, read_u32};

/// Borrowed view of a 91, 93 or 95 byte migration record.
#[derive(Debug, Clone, Copy)]
pub struct MigrationView<'a> {
    bytes: &'a [u8],
    token_count: usize,
}

impl<'a> MigrationView<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let len = bytes.len();
        let variable = len.checked_sub(MIGRATION_FIXED_LEN).ok_or_else(|| {
            RelayError::malformed(RecordKind::Migration, len, "shorter than fixed fields")
        })?;
        if variable % 2 != 0 {
            return Err(RelayError::malformed(
                RecordKind::Migration,
                len,
                "token ID section has odd length",
            ));
        }
        let token_count = variable / 2;
        if token_count == 0 || token_count > MAX_MIGRATION_TOKENS {
            return Err(RelayError::malformed(
                RecordKind::Migration,
                len,
                format!("carries {token_count} token IDs, expected 1..={MAX_MIGRATION_TOKENS}"),
            ));
        }
        Ok(Self { bytes, token_count })
    }

    #[must_use]
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[SIGNATURE_LEN..]
    }

    #[must_use]
    pub fn signature(&self) -> RecordSignature {
        read_signature(self.bytes, 0)
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    #[must_use]
    pub fn token_ids(&self) -> Vec<TokenId> {
        (0..self.token_count)
            .map(|i| TokenId(read_u16(self.bytes, SIGNATURE_LEN + 2 * i)))
            .collect()
    }

    fn user_id_offset(&self) -> usize {
        SIGNATURE_LEN + 2 * self.token_count
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId(read_u32(self.bytes, self.user_id_offset()))
    }

    #[must_use]
    pub fn target(&self) -> Address {
        read_address(self.bytes, self.user_id_offset() + 4)
    }

    #[must_use]
    pub fn to_migration(&self) -> Migration {
        Migration {
            target: self.target(),
            user_id: self.user_id(),
            token_ids: self.token_ids(),
            signature: self.signature(),
        }
    }
}

/// Encodes a migration. Fails when the token list is empty or longer than
/// three entries, since such a record could never decode.
pub fn encode_migration(migration: &Migration) -> Result<Vec<u8>> {
    let n = migration.token_ids.len();
    if n == 0 || n > MAX_MIGRATION_TOKENS {
        return Err(RelayError::malformed(
            RecordKind::Migration,
            MIGRATION_FIXED_LEN + 2 * n,
            format!("carries {n} token IDs, expected 1..={MAX_MIGRATION_TOKENS}"),
        ));
    }
    let mut w = FieldWriter::with_capacity(MIGRATION_FIXED_LEN + 2 * n);
    w.put_signature(&migration.signature);
    for token in &migration.token_ids {
        w.put_u16(token.0);
    }
    w.put_u32(migration.user_id.0).put_address(migration.target);
    Ok(w.finish())
}

pub fn decode_migration(bytes: &[u8]) -> Result<Migration> {
    Ok(MigrationView::new(bytes)?.to_migration())
}
