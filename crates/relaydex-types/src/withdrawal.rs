//! Signed withdrawal requests relayed by the admin.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{RecordSignature, TokenId, UserId, WithdrawalFlags};

/// A user-signed withdrawal as decoded from its 140-byte wire record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub user_id: UserId,
    pub token_id: TokenId,
    pub amount: U256,
    pub flags: WithdrawalFlags,
    pub fee: U256,
    pub nonce: u32,
    pub signature: RecordSignature,
}

impl Withdrawal {
    /// Token the fee is charged in.
    #[must_use]
    pub fn fee_token(&self) -> TokenId {
        if self.flags.fee_in_native {
            TokenId::NATIVE
        } else {
            self.token_id
        }
    }
}
