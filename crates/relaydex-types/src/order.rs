//! Signed trade orders.
//!
//! An order quotes `mainToken` (the pricing asset) against `subToken` (the
//! traded asset). A buy gives main and receives sub; a sell gives sub and
//! receives main. The limit price is `main_amount / sub_amount`, and fills
//! are accounted in sub-token units.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{OrderFlags, RecordSignature, TokenId, UserId};

/// Which side of the pair this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A user-signed order as decoded from its 174-byte wire record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub user_id: UserId,
    pub main_token: TokenId,
    pub main_amount: U256,
    pub sub_token: TokenId,
    pub sub_amount: U256,
    pub flags: OrderFlags,
    /// Fee-rate parameter, not a literal fee amount.
    pub fee_price: U256,
    pub nonce: u32,
    pub signature: RecordSignature,
}

/// A settlement batch: one taker followed by the makers it is matched
/// against, in submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBatch {
    pub taker: Order,
    pub makers: Vec<Order>,
}

impl OrderBatch {
    /// Number of records (taker included).
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.makers.len()
    }

    /// Always `false`: a batch carries at least its taker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// Unsigned order with a zeroed signature; sign it before settling.
    pub fn unsigned(
        user_id: UserId,
        side: OrderSide,
        (main_token, main_amount): (TokenId, U256),
        (sub_token, sub_amount): (TokenId, U256),
    ) -> Self {
        let flags = match side {
            OrderSide::Buy => OrderFlags::buy(),
            OrderSide::Sell => OrderFlags::sell(),
        };
        Self {
            user_id,
            main_token,
            main_amount,
            sub_token,
            sub_amount,
            flags,
            fee_price: U256::ZERO,
            nonce: 0,
            signature: RecordSignature::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64.pow(18))
    }

    #[test]
    fn unsigned_sets_side_flag() {
        let buy = Order::unsigned(
            UserId(11),
            OrderSide::Buy,
            (TokenId(0), eth(3)),
            (TokenId(11), eth(100)),
        );
        assert_eq!(buy.flags.side(), OrderSide::Buy);
        assert_eq!(buy.flags.to_byte(), 1);

        let sell = Order::unsigned(
            UserId(12),
            OrderSide::Sell,
            (TokenId(0), eth(3)),
            (TokenId(11), eth(100)),
        );
        assert_eq!(sell.flags.side(), OrderSide::Sell);
        assert_eq!(sell.signature, RecordSignature::default());
    }

    #[test]
    fn order_side_display_and_opposite() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }
}
