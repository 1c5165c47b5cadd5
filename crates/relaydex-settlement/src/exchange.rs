//! The exchange facade.
//!
//! [`Exchange`] owns the configuration, the journaled state and an event
//! sink, and exposes one method per entry point. Each method decodes its
//! input, runs the matching processor inside
//! [`SettlementState::atomically`], and emits the resulting events only
//! after the call has committed.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use relaydex_codec::{MigrationView, OrderBatchView, TransferBatchView, WithdrawalView};
use relaydex_types::{
    AdminCapability, DepositEvent, Directory, EventLog, EventMask, EventSink, ExchangeConfig,
    ExchangeEvent, FeeSchedule, OwnerCapability, RecordSignature, Result, TokenId,
};
use tracing::info;

use crate::{
    MigrationOutcome, MigrationProcessor, MigrationTarget, SettlementEngine, SettlementOutcome,
    SettlementState, SupplyConservation, TransferOutcome, TransferProcessor, WithdrawalOutcome,
    WithdrawalProcessor, unlock_time, withdrawal::require_nonzero,
};

pub struct Exchange<D: Directory, S: EventSink = EventLog> {
    address: Address,
    config: ExchangeConfig,
    directory: D,
    state: SettlementState,
    supply: SupplyConservation,
    sink: S,
}

impl<D: Directory> Exchange<D, EventLog> {
    /// Exchange collecting its events in an in-memory [`EventLog`].
    pub fn new(address: Address, config: ExchangeConfig, directory: D) -> Result<Self> {
        Self::with_sink(address, config, directory, EventLog::new())
    }
}

impl<D: Directory, S: EventSink> Exchange<D, S> {
    pub fn with_sink(
        address: Address,
        config: ExchangeConfig,
        directory: D,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;
        info!(%address, fee_wallet = %config.fee_wallet, "exchange initialised");
        Ok(Self {
            address,
            config,
            directory,
            state: SettlementState::new(),
            supply: SupplyConservation::new(),
            sink,
        })
    }

    // =================================================================
    // Accessors
    // =================================================================

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Directory administration (registering and removing users or tokens)
    /// lives outside the exchange.
    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    #[must_use]
    pub fn state(&self) -> &SettlementState {
        &self.state
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.state.balance(token, owner)
    }

    /// Balance by token ID.
    pub fn balance_of(&self, token_id: TokenId, owner: Address) -> Result<U256> {
        let token = self.directory.require_token(token_id)?;
        Ok(self.state.balance(token, owner))
    }

    #[must_use]
    pub fn filled(&self, order_hash: B256) -> U256 {
        self.state.fills().filled(order_hash)
    }

    /// Check every token that ever flowed in or out against the ledger.
    pub fn verify_supply(&self) -> Result<()> {
        for token in self.supply.tracked_tokens() {
            self.supply.verify(token, self.state.total_supply(token))?;
        }
        Ok(())
    }

    // =================================================================
    // User entry points
    // =================================================================

    /// Fund `owner`'s balance. Open to any address.
    pub fn deposit(
        &mut self,
        owner: Address,
        token_id: TokenId,
        amount: U256,
    ) -> Result<DepositEvent> {
        let token = self.directory.require_token(token_id)?;
        require_nonzero(amount, "deposit")?;
        let balance = self
            .state
            .atomically(|state| state.credit(token, owner, amount))?;
        self.supply.record_inflow(token, amount);
        info!(user = %owner, %token, %amount, "deposit");

        let event = DepositEvent {
            token,
            user: owner,
            amount,
            balance,
        };
        self.emit(ExchangeEvent::Deposit(event.clone()));
        Ok(event)
    }

    /// Start the self-service withdrawal cooldown. Returns when it ends.
    pub fn lock_account(&mut self, owner: Address, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let unlocks_at = unlock_time(now, self.config.withdraw_cooldown()?)?;
        self.state.lock_account(owner, now);
        info!(user = %owner, %unlocks_at, "account locked");
        Ok(unlocks_at)
    }

    pub fn unlock_account(&mut self, owner: Address) {
        self.state.unlock_account(owner);
        info!(user = %owner, "account unlocked");
    }

    /// Self-service withdrawal once the lock cooldown has elapsed.
    pub fn withdraw(
        &mut self,
        owner: Address,
        token_id: TokenId,
        amount: U256,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalOutcome> {
        let processor = WithdrawalProcessor::new(&self.directory, &self.config);
        let outcome = self
            .state
            .atomically(|state| processor.withdraw(state, owner, token_id, amount, now))?;
        self.supply.record_outflow(outcome.payout.token, outcome.payout.amount);
        self.emit(ExchangeEvent::Withdraw(outcome.event.clone()));
        Ok(outcome)
    }

    // =================================================================
    // Relayer entry points
    // =================================================================

    /// Settle a taker order against makers.
    pub fn settle_orders(
        &mut self,
        admin: &AdminCapability,
        batch: &[u8],
    ) -> Result<SettlementOutcome> {
        let view = OrderBatchView::new(batch)?;
        let engine = SettlementEngine::new(&self.directory, &self.config);
        let outcome = self.state.atomically(|state| engine.settle(state, &view))?;
        info!(relayer = %admin.caller(), fills = outcome.fills.len(), "order batch committed");
        for event in &outcome.events {
            self.emit(ExchangeEvent::Trade(event.clone()));
        }
        Ok(outcome)
    }

    pub fn withdraw_signed(
        &mut self,
        admin: &AdminCapability,
        record: &[u8],
    ) -> Result<WithdrawalOutcome> {
        let view = WithdrawalView::new(record)?;
        let processor = WithdrawalProcessor::new(&self.directory, &self.config);
        let outcome = self
            .state
            .atomically(|state| processor.withdraw_signed(state, &view))?;
        self.supply.record_outflow(outcome.payout.token, outcome.payout.amount);
        info!(relayer = %admin.caller(), user = %outcome.payout.to, "withdrawal committed");
        self.emit(ExchangeEvent::Withdraw(outcome.event.clone()));
        Ok(outcome)
    }

    pub fn transfer(
        &mut self,
        admin: &AdminCapability,
        batch: &[u8],
        signature: &RecordSignature,
    ) -> Result<TransferOutcome> {
        let view = TransferBatchView::new(batch)?;
        let processor = TransferProcessor::new(&self.directory, &self.config);
        let outcome = self
            .state
            .atomically(|state| processor.process(state, &view, signature))?;
        info!(relayer = %admin.caller(), legs = outcome.legs.len(), "transfer committed");
        for event in &outcome.legs {
            self.emit(ExchangeEvent::Transfer(event.clone()));
        }
        Ok(outcome)
    }

    pub fn migrate<T: MigrationTarget + ?Sized>(
        &mut self,
        admin: &AdminCapability,
        record: &[u8],
        target: &mut T,
    ) -> Result<MigrationOutcome> {
        let view = MigrationView::new(record)?;
        let processor = MigrationProcessor::new(&self.directory);
        let outcome = self
            .state
            .atomically(|state| processor.process(state, &view, target))?;
        for event in &outcome.moved {
            self.supply.record_outflow(event.token, event.amount);
        }
        info!(relayer = %admin.caller(), tokens = outcome.moved.len(), "migration committed");
        for event in &outcome.moved {
            self.emit(ExchangeEvent::Migrate(event.clone()));
        }
        Ok(outcome)
    }

    // =================================================================
    // Owner entry points
    // =================================================================

    pub fn set_fee_wallet(&mut self, owner: &OwnerCapability, fee_wallet: Address) {
        info!(
            owner = %owner.caller(),
            old = %self.config.fee_wallet,
            new = %fee_wallet,
            "fee wallet changed"
        );
        self.config.fee_wallet = fee_wallet;
    }

    pub fn set_fee_schedule(
        &mut self,
        owner: &OwnerCapability,
        schedule: FeeSchedule,
    ) -> Result<()> {
        schedule.validate()?;
        info!(
            owner = %owner.caller(),
            taker = schedule.taker_divisor,
            maker = schedule.maker_divisor,
            discount = schedule.fee_token_discount,
            "fee schedule changed"
        );
        self.config.fee_schedule = schedule;
        Ok(())
    }

    pub fn set_event_mask(&mut self, owner: &OwnerCapability, mask: EventMask) {
        info!(owner = %owner.caller(), mask = mask.0, "event mask changed");
        self.config.event_mask = mask;
    }

    fn emit(&mut self, event: ExchangeEvent) {
        if self.config.event_mask.enables(&event) {
            self.sink.emit(event);
        }
    }
}

impl<D: Directory, S: EventSink> MigrationTarget for Exchange<D, S> {
    fn target_address(&self) -> Address {
        self.address
    }

    /// Migrated value arrives as deposits under the same owner. All legs
    /// are credited in one journaled call.
    fn receive_migration(&mut self, owner: Address, legs: &[(Address, U256)]) -> Result<()> {
        let deposits = self.state.atomically(|state| {
            legs.iter()
                .map(|&(token, amount)| {
                    let balance = state.credit(token, owner, amount)?;
                    Ok(DepositEvent {
                        token,
                        user: owner,
                        amount,
                        balance,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })?;

        info!(user = %owner, tokens = deposits.len(), "migration received");
        for event in deposits {
            self.supply.record_inflow(event.token, event.amount);
            self.emit(ExchangeEvent::Deposit(event));
        }
        Ok(())
    }
}
