//! Multi-receiver internal transfers.
//!
//! A transfer batch is one sender record followed by one or more receiver
//! records. The batch is signed as a whole by the sender; the signature
//! travels detached from the blob.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{TokenId, TransferFlags};

/// The sender header of a transfer batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSender {
    pub nonce: u32,
    pub flags: TransferFlags,
    pub from: Address,
}

/// One leg of a transfer batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceiver {
    pub fee: U256,
    pub amount: U256,
    pub token_id: TokenId,
    pub to: Address,
}

/// A decoded transfer batch.
///
/// `receivers` is kept in byte-stream order. Processing walks it
/// most-recent-first, see [`TransferBatch::processing_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    pub sender: TransferSender,
    pub receivers: Vec<TransferReceiver>,
}

impl TransferBatch {
    /// Receivers in the order they are applied: last appended first.
    pub fn processing_order(&self) -> impl Iterator<Item = &TransferReceiver> {
        self.receivers.iter().rev()
    }

    /// Token the fee of `receiver` is charged in, given the platform fee token.
    #[must_use]
    pub fn fee_token_for(&self, receiver: &TransferReceiver, platform_fee_token: TokenId) -> TokenId {
        if self.sender.flags.fee_in_transferred_asset {
            receiver.token_id
        } else {
            platform_fee_token
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receiver(n: u8) -> TransferReceiver {
        TransferReceiver {
            fee: U256::ZERO,
            amount: U256::from(n),
            token_id: TokenId(1),
            to: Address::repeat_byte(n),
        }
    }

    #[test]
    fn processing_is_most_recent_first() {
        let batch = TransferBatch {
            sender: TransferSender {
                nonce: 1,
                flags: TransferFlags::default(),
                from: Address::repeat_byte(0xff),
            },
            receivers: vec![receiver(1), receiver(2), receiver(3)],
        };
        let order: Vec<u8> = batch.processing_order().map(|r| r.to.0[0]).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn fee_token_selection() {
        let mut batch = TransferBatch {
            sender: TransferSender {
                nonce: 1,
                flags: TransferFlags::default(),
                from: Address::ZERO,
            },
            receivers: vec![receiver(1)],
        };
        let leg = batch.receivers[0];
        assert_eq!(batch.fee_token_for(&leg, TokenId(9)), TokenId(9));
        batch.sender.flags.fee_in_transferred_asset = true;
        assert_eq!(batch.fee_token_for(&leg, TokenId(9)), TokenId(1));
    }
}
