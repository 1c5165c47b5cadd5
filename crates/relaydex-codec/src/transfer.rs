//! Transfer batches: a 25-byte sender header followed by 86-byte receiver legs.
//!
//! The blob carries no signature of its own; the sender signs the keccak of
//! the whole blob and the signature is passed alongside it.

use alloy_primitives::Address;
use relaydex_types::{
    RecordKind, RelayError, Result, TokenId, TransferBatch, TransferFlags, TransferReceiver,
    TransferSender,
    constants::{TRANSFER_RECEIVER_LEN, TRANSFER_SENDER_LEN},
};

use crate::fields::{FieldWriter, read_address, read_u8, read_u16, read_u32, read_u256};

// Sender header offsets.
const NONCE: usize = 0;
const CONFIG: usize = NONCE + 4;
const FROM: usize = CONFIG + 1;

// Receiver offsets, relative to the start of the leg.
const FEE: usize = 0;
const AMOUNT: usize = FEE + 32;
const TOKEN_ID: usize = AMOUNT + 32;
const TO: usize = TOKEN_ID + 2;

const _: () = assert!(FROM + 20 == TRANSFER_SENDER_LEN);
const _: () = assert!(TO + 20 == TRANSFER_RECEIVER_LEN);

/// Random-access view over an encoded transfer batch.
#[derive(Debug, Clone, Copy)]
pub struct TransferBatchView<'a> {
    bytes: &'a [u8],
}

impl<'a> TransferBatchView<'a> {
    /// Accepts `25 + 86·n` bytes for `n >= 1`.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let len = bytes.len();
        if len <= TRANSFER_SENDER_LEN {
            return Err(RelayError::malformed(
                RecordKind::Transfer,
                len,
                "batch needs a sender and at least one receiver",
            ));
        }
        if (len - TRANSFER_SENDER_LEN) % TRANSFER_RECEIVER_LEN != 0 {
            return Err(RelayError::malformed(
                RecordKind::Transfer,
                len,
                format!("receiver section is not a multiple of {TRANSFER_RECEIVER_LEN} bytes"),
            ));
        }
        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[must_use]
    pub fn nonce(&self) -> u32 {
        read_u32(self.bytes, NONCE)
    }

    #[must_use]
    pub fn flags(&self) -> TransferFlags {
        TransferFlags::from_byte(read_u8(self.bytes, CONFIG))
    }

    #[must_use]
    pub fn from(&self) -> Address {
        read_address(self.bytes, FROM)
    }

    #[must_use]
    pub fn sender(&self) -> TransferSender {
        TransferSender {
            nonce: self.nonce(),
            flags: self.flags(),
            from: self.from(),
        }
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        (self.bytes.len() - TRANSFER_SENDER_LEN) / TRANSFER_RECEIVER_LEN
    }

    /// The `i`-th receiver in byte-stream order.
    #[must_use]
    pub fn receiver(&self, i: usize) -> Option<TransferReceiver> {
        if i >= self.receiver_count() {
            return None;
        }
        let base = TRANSFER_SENDER_LEN + i * TRANSFER_RECEIVER_LEN;
        Some(TransferReceiver {
            fee: read_u256(self.bytes, base + FEE),
            amount: read_u256(self.bytes, base + AMOUNT),
            token_id: TokenId(read_u16(self.bytes, base + TOKEN_ID)),
            to: read_address(self.bytes, base + TO),
        })
    }

    /// Receivers as they are applied, last leg in the blob first.
    pub fn processing_order(&self) -> impl Iterator<Item = TransferReceiver> + use<'a> {
        let view = *self;
        (0..view.receiver_count())
            .rev()
            .filter_map(move |i| view.receiver(i))
    }

    #[must_use]
    pub fn to_batch(&self) -> TransferBatch {
        TransferBatch {
            sender: self.sender(),
            receivers: (0..self.receiver_count())
                .filter_map(|i| self.receiver(i))
                .collect(),
        }
    }
}

#[must_use]
pub fn encode_transfer_batch(batch: &TransferBatch) -> Vec<u8> {
    let mut w = FieldWriter::with_capacity(
        TRANSFER_SENDER_LEN + batch.receivers.len() * TRANSFER_RECEIVER_LEN,
    );
    w.put_u32(batch.sender.nonce)
        .put_u8(batch.sender.flags.to_byte())
        .put_address(batch.sender.from);
    for leg in &batch.receivers {
        w.put_u256(leg.fee)
            .put_u256(leg.amount)
            .put_u16(leg.token_id.0)
            .put_address(leg.to);
    }
    w.finish()
}

pub fn decode_transfer_batch(bytes: &[u8]) -> Result<TransferBatch> {
    Ok(TransferBatchView::new(bytes)?.to_batch())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    fn leg(n: u8) -> TransferReceiver {
        TransferReceiver {
            fee: U256::from(u64::from(n) * 10),
            amount: U256::from(u64::from(n) * 1_000),
            token_id: TokenId(u16::from(n)),
            to: Address::repeat_byte(n),
        }
    }

    fn batch(legs: u8) -> TransferBatch {
        TransferBatch {
            sender: TransferSender {
                nonce: 42,
                flags: TransferFlags::from_byte(1),
                from: Address::repeat_byte(0xee),
            },
            receivers: (1..=legs).map(leg).collect(),
        }
    }

    #[test]
    fn roundtrip_various_leg_counts() {
        for legs in 1..=4 {
            let b = batch(legs);
            let bytes = encode_transfer_batch(&b);
            assert_eq!(
                bytes.len(),
                TRANSFER_SENDER_LEN + usize::from(legs) * TRANSFER_RECEIVER_LEN
            );
            assert_eq!(decode_transfer_batch(&bytes).unwrap(), b);
        }
    }

    #[test]
    fn sender_header_layout() {
        let bytes = encode_transfer_batch(&batch(1));
        assert_eq!(&bytes[..4], &[0, 0, 0, 42]);
        assert_eq!(bytes[4], 1);
        assert_eq!(&bytes[5..25], Address::repeat_byte(0xee).as_slice());
        let view = TransferBatchView::new(&bytes).unwrap();
        assert!(view.flags().fee_in_transferred_asset);
        assert_eq!(view.from(), Address::repeat_byte(0xee));
    }

    #[test]
    fn processing_order_is_reverse_byte_order() {
        let bytes = encode_transfer_batch(&batch(3));
        let view = TransferBatchView::new(&bytes).unwrap();
        let seen: Vec<TokenId> = view.processing_order().map(|r| r.token_id).collect();
        assert_eq!(seen, vec![TokenId(3), TokenId(2), TokenId(1)]);
        assert!(view.receiver(3).is_none());
    }

    #[test]
    fn rejects_bad_lengths() {
        for len in [0, 24, 25, 26, 25 + 85, 25 + 87] {
            let err = TransferBatchView::new(&vec![0u8; len]).unwrap_err();
            assert!(matches!(
                err,
                RelayError::MalformedRecord { kind: RecordKind::Transfer, .. }
            ));
        }
    }
}
