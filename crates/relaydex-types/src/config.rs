//! Configuration for an exchange instance.

use alloy_primitives::{Address, U256};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{EventMask, OrderSide, RelayError, Result, TokenId, constants};

/// Which role an order played in a settlement batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Liquidity {
    Taker,
    Maker,
}

/// Trading fee parameters.
///
/// `fee = amount * fee_price / divisor`, where the divisor is picked by
/// liquidity role and multiplied by `fee_token_discount` when the order
/// pays in the platform fee token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub taker_divisor: u64,
    pub maker_divisor: u64,
    pub fee_token_discount: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            taker_divisor: constants::DEFAULT_TAKER_FEE_DIVISOR,
            maker_divisor: constants::DEFAULT_MAKER_FEE_DIVISOR,
            fee_token_discount: constants::DEFAULT_FEE_TOKEN_DISCOUNT,
        }
    }
}

impl FeeSchedule {
    /// Effective divisor for a fill.
    pub fn divisor(&self, liquidity: Liquidity, fee_in_fee_token: bool) -> Result<U256> {
        let base = match liquidity {
            Liquidity::Taker => self.taker_divisor,
            Liquidity::Maker => self.maker_divisor,
        };
        let divisor = if fee_in_fee_token {
            U256::from(base)
                .checked_mul(U256::from(self.fee_token_discount))
                .ok_or_else(|| RelayError::ArithmeticOverflow("fee divisor".into()))?
        } else {
            U256::from(base)
        };
        Ok(divisor)
    }

    pub fn validate(&self) -> Result<()> {
        if self.taker_divisor == 0 || self.maker_divisor == 0 || self.fee_token_discount == 0 {
            return Err(RelayError::Configuration(
                "fee divisors and discount must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for one exchange instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Ledger owner that accumulates every fee.
    pub fee_wallet: Address,
    /// Platform token used for discounted trading fees and transfer fees.
    pub fee_token: TokenId,
    pub fee_schedule: FeeSchedule,
    /// Self-service withdrawal cooldown, in seconds.
    pub withdraw_cooldown_secs: i64,
    pub event_mask: EventMask,
}

impl ExchangeConfig {
    #[must_use]
    pub fn new(fee_wallet: Address, fee_token: TokenId) -> Self {
        Self {
            fee_wallet,
            fee_token,
            fee_schedule: FeeSchedule::default(),
            withdraw_cooldown_secs: constants::DEFAULT_WITHDRAW_COOLDOWN_SECS,
            event_mask: EventMask::ALL,
        }
    }

    pub fn withdraw_cooldown(&self) -> Result<Duration> {
        Duration::try_seconds(self.withdraw_cooldown_secs).ok_or_else(|| {
            RelayError::Configuration(format!(
                "withdraw cooldown of {}s is out of range",
                self.withdraw_cooldown_secs
            ))
        })
    }

    /// Fee divisor for an order with the given side-independent role.
    pub fn fee_divisor(&self, liquidity: Liquidity, fee_in_fee_token: bool) -> Result<U256> {
        self.fee_schedule.divisor(liquidity, fee_in_fee_token)
    }

    pub fn validate(&self) -> Result<()> {
        self.fee_schedule.validate()?;
        if !(0..=constants::MAX_WITHDRAW_COOLDOWN_SECS).contains(&self.withdraw_cooldown_secs) {
            return Err(RelayError::Configuration(format!(
                "withdraw cooldown must be within 0..={}s",
                constants::MAX_WITHDRAW_COOLDOWN_SECS
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Side-aware label used in logs.
#[must_use]
pub fn describe_fill(liquidity: Liquidity, side: OrderSide) -> &'static str {
    match (liquidity, side) {
        (Liquidity::Taker, OrderSide::Buy) => "taker-buy",
        (Liquidity::Taker, OrderSide::Sell) => "taker-sell",
        (Liquidity::Maker, OrderSide::Buy) => "maker-buy",
        (Liquidity::Maker, OrderSide::Sell) => "maker-sell",
    }
}
