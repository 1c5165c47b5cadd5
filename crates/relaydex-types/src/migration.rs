//! Balance migration requests.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{RecordSignature, TokenId, UserId};

/// "Move all balances of `user_id` for `token_ids` to `target`", signed by
/// the user's registered address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    pub target: Address,
    pub user_id: UserId,
    /// Between one and three token IDs.
    pub token_ids: Vec<TokenId>,
    pub signature: RecordSignature,
}
