//! Internal multi-receiver transfers.
//!
//! The sender signs the whole batch once. Legs are applied most-recent-first
//! and any failing leg aborts every leg of the batch.

use alloy_primitives::{Address, B256};
use relaydex_codec::TransferBatchView;
use relaydex_signing::{transfer_hash, verify_signer};
use relaydex_types::{
    Directory, ExchangeConfig, RecordKind, RecordSignature, RelayError, Result, TransferEvent,
    TransferReceiver,
};
use tracing::{debug, info};

use crate::{SettlementState, withdrawal::require_nonzero};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub digest: B256,
    pub from: Address,
    /// One event per leg, in the order the legs were applied.
    pub legs: Vec<TransferEvent>,
}

pub struct TransferProcessor<'a, D: Directory> {
    directory: &'a D,
    config: &'a ExchangeConfig,
}

impl<'a, D: Directory> TransferProcessor<'a, D> {
    #[must_use]
    pub fn new(directory: &'a D, config: &'a ExchangeConfig) -> Self {
        Self { directory, config }
    }

    pub fn process(
        &self,
        state: &mut SettlementState,
        view: &TransferBatchView<'_>,
        signature: &RecordSignature,
    ) -> Result<TransferOutcome> {
        let digest = transfer_hash(view);
        let from = view.from();
        verify_signer(digest, signature, from)?;
        if !self.directory.is_active_user(from) {
            return Err(RelayError::InactiveAddress(from));
        }
        state.advance_nonce(RecordKind::Transfer, from, view.nonce())?;

        let fee_in_transferred_asset = view.flags().fee_in_transferred_asset;
        let mut legs = Vec::with_capacity(view.receiver_count());
        for leg in view.processing_order() {
            legs.push(self.apply_leg(state, from, &leg, fee_in_transferred_asset)?);
        }

        info!(user = %from, hash = %digest, legs = legs.len(), "transfer batch applied");
        Ok(TransferOutcome { digest, from, legs })
    }

    fn apply_leg(
        &self,
        state: &mut SettlementState,
        from: Address,
        leg: &TransferReceiver,
        fee_in_transferred_asset: bool,
    ) -> Result<TransferEvent> {
        let token = self.directory.require_token(leg.token_id)?;
        require_nonzero(leg.amount, "transfer")?;
        let fee_token_id = if fee_in_transferred_asset {
            leg.token_id
        } else {
            self.config.fee_token
        };
        let fee_token = self.directory.require_token(fee_token_id)?;
        let wallet = self.config.fee_wallet;

        if fee_token == token {
            let total = leg
                .amount
                .checked_add(leg.fee)
                .ok_or_else(|| RelayError::ArithmeticOverflow("transfer amount + fee".into()))?;
            state.debit(token, from, total)?;
            state.credit(token, leg.to, leg.amount)?;
            if !leg.fee.is_zero() {
                state.credit(token, wallet, leg.fee)?;
            }
        } else {
            state.move_balance(token, from, leg.to, leg.amount)?;
            if !leg.fee.is_zero() {
                state.move_balance(fee_token, from, wallet, leg.fee)?;
            }
        }

        debug!(%token, to = %leg.to, amount = %leg.amount, fee = %leg.fee, "transfer leg");
        Ok(TransferEvent {
            token,
            from,
            to: leg.to,
            amount: leg.amount,
            fee: leg.fee,
        })
    }
}
