//! Admin-relayed withdrawal records.

use alloy_primitives::U256;
use relaydex_types::{
    RecordKind, RecordSignature, RelayError, Result, TokenId, UserId, Withdrawal,
    WithdrawalFlags,
    constants::{SIGNATURE_LEN, WITHDRAWAL_LEN},
};

use crate::fields::{FieldWriter, read_signature, read_u8, read_u16, read_u32, read_u256};

const FEE: usize = SIGNATURE_LEN;
const NONCE: usize = FEE + 32;
const CONFIG: usize = NONCE + 4;
const AMOUNT: usize = CONFIG + 1;
const TOKEN_ID: usize = AMOUNT + 32;
const USER_ID: usize = TOKEN_ID + 2;

const _: () = assert!(USER_ID + 4 == WITHDRAWAL_LEN);

/// Borrowed view of a 140-byte withdrawal record.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalView<'a> {
    bytes: &'a [u8],
}

impl<'a> WithdrawalView<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() != WITHDRAWAL_LEN {
            return Err(RelayError::malformed(
                RecordKind::Withdrawal,
                bytes.len(),
                format!("expected exactly {WITHDRAWAL_LEN} bytes"),
            ));
        }
        Ok(Self { bytes })
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
    pub fn fee(&self) -> U256 {
        read_u256(self.bytes, FEE)
    }

    #[must_use]
    pub fn nonce(&self) -> u32 {
        read_u32(self.bytes, NONCE)
    }

    #[must_use]
    pub fn flags(&self) -> WithdrawalFlags {
        WithdrawalFlags::from_byte(read_u8(self.bytes, CONFIG))
    }

    #[must_use]
    pub fn amount(&self) -> U256 {
        read_u256(self.bytes, AMOUNT)
    }

    #[must_use]
    pub fn token_id(&self) -> TokenId {
        TokenId(read_u16(self.bytes, TOKEN_ID))
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId(read_u32(self.bytes, USER_ID))
    }

    #[must_use]
    pub fn to_withdrawal(&self) -> Withdrawal {
        Withdrawal {
            user_id: self.user_id(),
            token_id: self.token_id(),
            amount: self.amount(),
            flags: self.flags(),
            fee: self.fee(),
            nonce: self.nonce(),
            signature: self.signature(),
        }
    }
}

#[must_use]
pub fn encode_withdrawal(withdrawal: &Withdrawal) -> Vec<u8> {
    let mut w = FieldWriter::with_capacity(WITHDRAWAL_LEN);
    w.put_signature(&withdrawal.signature)
        .put_u256(withdrawal.fee)
        .put_u32(withdrawal.nonce)
        .put_u8(withdrawal.flags.to_byte())
        .put_u256(withdrawal.amount)
        .put_u16(withdrawal.token_id.0)
        .put_u32(withdrawal.user_id.0);
    w.finish()
}

pub fn decode_withdrawal(bytes: &[u8]) -> Result<Withdrawal> {
    Ok(WithdrawalView::new(bytes)?.to_withdrawal())
}
