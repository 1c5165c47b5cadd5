//! Typed views of the one-byte `config` bitfields carried by records.
//!
//! Each struct names the semantic bits and keeps the reserved bits verbatim,
//! so `from_byte(b).to_byte() == b` for every byte. Signed records must
//! re-encode to exactly the bytes the user signed.

use serde::{Deserialize, Serialize};

use crate::OrderSide;

const BIT0: u8 = 0b0000_0001;
const BIT1: u8 = 0b0000_0010;

/// Order `config`: bit0 = buy side, bit1 = fee paid in the platform fee
/// token (on the wire this bit is called `isFeeInMainToken`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OrderFlags {
    pub is_buy: bool,
    pub fee_in_fee_token: bool,
    /// Bits 2..=7, kept in place.
    pub reserved: u8,
}

impl OrderFlags {
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            is_buy: byte & BIT0 != 0,
            fee_in_fee_token: byte & BIT1 != 0,
            reserved: byte & !(BIT0 | BIT1),
        }
    }

    #[must_use]
    pub fn to_byte(self) -> u8 {
        let mut byte = self.reserved & !(BIT0 | BIT1);
        if self.is_buy {
            byte |= BIT0;
        }
        if self.fee_in_fee_token {
            byte |= BIT1;
        }
        byte
    }

    #[must_use]
    pub fn side(self) -> OrderSide {
        if self.is_buy {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    #[must_use]
    pub fn buy() -> Self {
        Self {
            is_buy: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sell() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fee_token(mut self) -> Self {
        self.fee_in_fee_token = true;
        self
    }
}

/// Withdrawal `config`: bit0 = fee paid in the native asset (otherwise in
/// the withdrawn token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WithdrawalFlags {
    pub fee_in_native: bool,
    /// Bits 1..=7, kept in place.
    pub reserved: u8,
}

impl WithdrawalFlags {
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            fee_in_native: byte & BIT0 != 0,
            reserved: byte & !BIT0,
        }
    }

    #[must_use]
    pub fn to_byte(self) -> u8 {
        (self.reserved & !BIT0) | u8::from(self.fee_in_native)
    }
}

/// Transfer `config`: bit0 = fee denominated in the transferred asset
/// (otherwise in the platform fee token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransferFlags {
    pub fee_in_transferred_asset: bool,
    /// Bits 1..=7, kept in place.
    pub reserved: u8,
}

impl TransferFlags {
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            fee_in_transferred_asset: byte & BIT0 != 0,
            reserved: byte & !BIT0,
        }
    }

    #[must_use]
    pub fn to_byte(self) -> u8 {
        (self.reserved & !BIT0) | u8::from(self.fee_in_transferred_asset)
    }
}
