//! Domain events computed by every processor.
//!
//! Payloads are always computed and returned in call outcomes. Whether an
//! event also reaches the [`EventSink`] is decided by the [`EventMask`],
//! which the owner configures.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// One side of a settled match.
///
/// `token_target`/`amount_target` describe the sub (traded) leg and
/// `token_trade`/`amount_trade` the main (pricing) leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub user: Address,
    pub is_buy: bool,
    pub token_target: Address,
    pub amount_target: U256,
    pub token_trade: Address,
    pub amount_trade: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawEvent {
    pub token: Address,
    pub user: Address,
    pub amount: U256,
    /// Balance of `token` left on the ledger after the withdrawal.
    pub balance: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    pub token: Address,
    pub user: Address,
    pub amount: U256,
    pub balance: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateEvent {
    pub token: Address,
    pub user: Address,
    pub target: Address,
    pub amount: U256,
}

/// Every event the core can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    Trade(TradeEvent),
    Withdraw(WithdrawEvent),
    Transfer(TransferEvent),
    Deposit(DepositEvent),
    Migrate(MigrateEvent),
}

impl ExchangeEvent {
    /// The mask bit that gates this event.
    #[must_use]
    pub fn mask_bit(&self) -> u8 {
        match self {
            Self::Trade(_) => EventMask::TRADE,
            Self::Withdraw(_) => EventMask::WITHDRAW,
            Self::Transfer(_) => EventMask::TRANSFER,
            Self::Deposit(_) => EventMask::DEPOSIT,
            Self::Migrate(_) => EventMask::MIGRATE,
        }
    }
}

/// On/off bitmask for event emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventMask(pub u8);

impl EventMask {
    pub const TRADE: u8 = 1 << 0;
    pub const WITHDRAW: u8 = 1 << 1;
    pub const TRANSFER: u8 = 1 << 2;
    pub const DEPOSIT: u8 = 1 << 3;
    pub const MIGRATE: u8 = 1 << 4;

    pub const ALL: Self = Self(
        Self::TRADE | Self::WITHDRAW | Self::TRANSFER | Self::DEPOSIT | Self::MIGRATE,
    );
    pub const NONE: Self = Self(0);

    #[must_use]
    pub fn enables(self, event: &ExchangeEvent) -> bool {
        self.0 & event.mask_bit() != 0
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Destination for emitted events.
pub trait EventSink {
    fn emit(&mut self, event: ExchangeEvent);
}

/// `Vec`-backed sink, the default sink of an exchange instance.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<ExchangeEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ExchangeEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: ExchangeEvent) {
        self.events.push(event);
    }
}
