//! Withdrawal processing.
//!
//! Two paths lead out of the ledger:
//! - self-service: the owner locked their account and the cooldown has
//!   elapsed, no relayer involved
//! - relayed: an admin submits a withdrawal record signed by the user,
//!   which may carry a fee
//!
//! Both debit the ledger and hand back a [`Payout`] for the caller to
//! execute against the outside world.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use relaydex_codec::WithdrawalView;
use relaydex_signing::verify_record;
use relaydex_types::{
    Directory, ExchangeConfig, RecordKind, RelayError, Result, TokenId, WithdrawEvent,
};
use tracing::info;

use crate::{FeeCharge, SettlementState};

/// Value leaving the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub token: Address,
    pub to: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalOutcome {
    pub payout: Payout,
    pub fee: Option<FeeCharge>,
    pub event: WithdrawEvent,
}

pub struct WithdrawalProcessor<'a, D: Directory> {
    directory: &'a D,
    config: &'a ExchangeConfig,
}

impl<'a, D: Directory> WithdrawalProcessor<'a, D> {
    #[must_use]
    pub fn new(directory: &'a D, config: &'a ExchangeConfig) -> Self {
        Self { directory, config }
    }

    /// Self-service withdrawal after the lock cooldown.
    pub fn withdraw(
        &self,
        state: &mut SettlementState,
        owner: Address,
        token_id: TokenId,
        amount: U256,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalOutcome> {
        state.check_withdraw(owner, now, self.config.withdraw_cooldown()?)?;
        let token = self.directory.require_token(token_id)?;
        require_nonzero(amount, "withdrawal")?;

        let balance = state.debit(token, owner, amount)?;
        info!(user = %owner, %token, %amount, "self-service withdrawal");
        Ok(outcome(token, owner, amount, balance, None))
    }

    /// Admin-relayed withdrawal of a signed record.
    pub fn withdraw_signed(
        &self,
        state: &mut SettlementState,
        view: &WithdrawalView<'_>,
    ) -> Result<WithdrawalOutcome> {
        let user = self.directory.require_user(view.user_id())?;
        let token = self.directory.require_token(view.token_id())?;
        let amount = view.amount();
        require_nonzero(amount, "withdrawal")?;

        let digest = verify_record(view, user)?;
        state.advance_nonce(RecordKind::Withdrawal, user, view.nonce())?;

        state.debit(token, user, amount)?;
        let fee = view.fee();
        let fee = if fee.is_zero() {
            None
        } else {
            let fee_token = if view.flags().fee_in_native {
                self.directory.require_token(TokenId::NATIVE)?
            } else {
                token
            };
            state.move_balance(fee_token, user, self.config.fee_wallet, fee)?;
            Some(FeeCharge {
                payer: user,
                token: fee_token,
                amount: fee,
            })
        };

        let balance = state.balance(token, user);
        info!(
            user = %user,
            %token,
            %amount,
            hash = %digest,
            nonce = view.nonce(),
            "relayed withdrawal"
        );
        Ok(outcome(token, user, amount, balance, fee))
    }
}

pub(crate) fn require_nonzero(amount: U256, what: &str) -> Result<()> {
    if amount.is_zero() {
        return Err(RelayError::InvalidAmount {
            reason: format!("zero {what} amount"),
        });
    }
    Ok(())
}

fn outcome(
    token: Address,
    user: Address,
    amount: U256,
    balance: U256,
    fee: Option<FeeCharge>,
) -> WithdrawalOutcome {
    WithdrawalOutcome {
        payout: Payout {
            token,
            to: user,
            amount,
        },
        fee,
        event: WithdrawEvent {
            token,
            user,
            amount,
            balance,
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use relaydex_codec::encode_withdrawal;
    use relaydex_signing::testing::RecordSigner;
    use relaydex_types::{MemoryDirectory, RecordSignature, UserId, Withdrawal, WithdrawalFlags};

    use super::*;

    const FEE_WALLET: Address = Address::repeat_byte(0xfe);
    const TOKEN: Address = Address::repeat_byte(0x11);

    fn eth(milli: u64) -> U256 {
        U256::from(milli) * U256::from(10u64).pow(U256::from(15))
    }

    fn setup() -> (MemoryDirectory, ExchangeConfig, SettlementState, RecordSigner) {
        let signer = RecordSigner::from_seed(5);
        let mut directory = MemoryDirectory::new();
        directory.register_user(UserId(11), signer.address());
        directory.register_token(TokenId(1), TOKEN);
        let mut state = SettlementState::new();
        state.credit(Address::ZERO, signer.address(), eth(5_000)).unwrap();
        state.credit(TOKEN, signer.address(), eth(5_000)).unwrap();
        (directory, ExchangeConfig::new(FEE_WALLET, TokenId(1)), state, signer)
    }

    fn signed(
        signer: &RecordSigner,
        token_id: TokenId,
        flags: u8,
        fee: U256,
        nonce: u32,
    ) -> Vec<u8> {
        encode_withdrawal(&signer.sign_withdrawal(Withdrawal {
            user_id: UserId(11),
            token_id,
            amount: eth(2_000),
            flags: WithdrawalFlags::from_byte(flags),
            fee,
            nonce,
            signature: RecordSignature::default(),
        }))
    }

    #[test]
    fn native_withdrawal_with_native_fee() {
        let (directory, config, mut state, signer) = setup();
        let bytes = signed(&signer, TokenId::NATIVE, 1, eth(5), 1);
        let view = WithdrawalView::new(&bytes).unwrap();
        let out = WithdrawalProcessor::new(&directory, &config)
            .withdraw_signed(&mut state, &view)
            .unwrap();

        assert_eq!(state.balance(Address::ZERO, signer.address()), eth(2_995));
        assert_eq!(state.balance(Address::ZERO, FEE_WALLET), eth(5));
        assert_eq!(out.payout.amount, eth(2_000));
        assert_eq!(out.event.balance, eth(2_995));
    }

    #[test]
    fn fee_in_withdrawn_token_when_flag_clear() {
        let (directory, config, mut state, signer) = setup();
        let bytes = signed(&signer, TokenId(1), 0, eth(5), 1);
        let view = WithdrawalView::new(&bytes).unwrap();
        let out = WithdrawalProcessor::new(&directory, &config)
            .withdraw_signed(&mut state, &view)
            .unwrap();
        assert_eq!(out.fee.unwrap().token, TOKEN);
        assert_eq!(state.balance(TOKEN, signer.address()), eth(2_995));
        assert_eq!(state.balance(Address::ZERO, signer.address()), eth(5_000));
    }

    #[test]
    fn replayed_nonce_is_rejected() {
        let (directory, config, mut state, signer) = setup();
        let processor = WithdrawalProcessor::new(&directory, &config);
        let bytes = signed(&signer, TokenId::NATIVE, 1, U256::ZERO, 7);
        let view = WithdrawalView::new(&bytes).unwrap();
        processor.withdraw_signed(&mut state, &view).unwrap();
        let err = processor.withdraw_signed(&mut state, &view).unwrap_err();
        assert!(matches!(err, RelayError::NonceReplay { nonce: 7, last: 7, .. }));
    }

    #[test]
    fn self_service_requires_elapsed_lock() {
        let (directory, config, mut state, signer) = setup();
        let owner = signer.address();
        let processor = WithdrawalProcessor::new(&directory, &config);
        let t0 = Utc::now();

        let err = processor
            .withdraw(&mut state, owner, TokenId(1), eth(1), t0)
            .unwrap_err();
        assert!(matches!(err, RelayError::NotUnlocked { .. }));

        state.lock_account(owner, t0);
        let err = processor
            .withdraw(&mut state, owner, TokenId(1), eth(1), t0 + Duration::days(1))
            .unwrap_err();
        assert!(matches!(err, RelayError::NotUnlocked { unlocks_at: Some(_), .. }));

        let out = processor
            .withdraw(&mut state, owner, TokenId(1), eth(1), t0 + Duration::days(3))
            .unwrap();
        assert_eq!(out.payout.to, owner);
        assert_eq!(state.balance(TOKEN, owner), eth(4_999));
    }

    #[test]
    fn zero_amount_and_unknown_token() {
        let (directory, config, mut state, signer) = setup();
        let owner = signer.address();
        let processor = WithdrawalProcessor::new(&directory, &config);
        let t0 = Utc::now();
        state.lock_account(owner, t0 - Duration::days(4));

        let err = processor
            .withdraw(&mut state, owner, TokenId(1), U256::ZERO, t0)
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidAmount { .. }));
        let err = processor
            .withdraw(&mut state, owner, TokenId(99), eth(1), t0)
            .unwrap_err();
        assert_eq!(err, RelayError::InvalidToken(TokenId(99)));
    }
}
