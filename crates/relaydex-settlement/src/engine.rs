//! Order settlement.
//!
//! A batch is one taker followed by makers in submitted order. For each
//! maker the engine:
//! 1. Resolves the user and both tokens, rejects zero amounts
//! 2. Verifies the signature against the resolved user address
//! 3. Checks opposite sides, identical pair and an acceptable price
//! 4. Fills `min(taker remaining, maker remaining)` at the maker's price
//! 5. Moves both legs, charges fees to the fee wallet, records fills
//!
//! Any error aborts the whole batch; the caller runs the engine inside
//! [`SettlementState::atomically`] so earlier fills are unwound.

use alloy_primitives::{Address, B256, U256};
use relaydex_codec::{OrderBatchView, OrderView};
use relaydex_signing::verify_record;
use relaydex_types::{
    Directory, ExchangeConfig, Liquidity, OrderSide, RelayError, Result, TradeEvent,
    describe_fill,
};
use tracing::{debug, info};

use crate::{FeeCharge, SettlementState, compute_fee};

/// One maker's share of a settled batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerFill {
    /// Position among the makers (0 = first record after the taker).
    pub maker_index: usize,
    pub maker_hash: B256,
    pub maker: Address,
    /// Amount of `subToken` exchanged.
    pub fill_sub: U256,
    /// Amount of `mainToken` exchanged, at the maker's price.
    pub fill_main: U256,
    pub taker_fee: Option<FeeCharge>,
    pub maker_fee: Option<FeeCharge>,
}

/// Result of settling one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementOutcome {
    pub taker_hash: B256,
    pub taker: Address,
    /// Only makers that actually traded.
    pub fills: Vec<MakerFill>,
    /// `subToken` filled for the taker in this batch.
    pub taker_filled: U256,
    /// What is left of the taker order after this batch.
    pub taker_rest: U256,
    pub events: Vec<TradeEvent>,
}

impl SettlementOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

/// An order whose identities resolved and whose signature checked out.
#[derive(Debug, Clone, Copy)]
struct ResolvedOrder<'a> {
    view: OrderView<'a>,
    hash: B256,
    user: Address,
    main: Address,
    sub: Address,
}

impl ResolvedOrder<'_> {
    fn side(&self) -> OrderSide {
        self.view.flags().side()
    }
}

pub struct SettlementEngine<'a, D: Directory> {
    directory: &'a D,
    config: &'a ExchangeConfig,
}

impl<'a, D: Directory> SettlementEngine<'a, D> {
    #[must_use]
    pub fn new(directory: &'a D, config: &'a ExchangeConfig) -> Self {
        Self { directory, config }
    }

    /// Settle `batch` against `state`.
    ///
    /// Does not open its own checkpoint: on `Err` the state may be partly
    /// written and must be rolled back by the caller.
    pub fn settle(
        &self,
        state: &mut SettlementState,
        batch: &OrderBatchView<'_>,
    ) -> Result<SettlementOutcome> {
        let taker = self.resolve(batch.taker())?;
        let mut taker_remaining = state
            .fills()
            .remaining(taker.hash, taker.view.sub_amount());

        let mut fills = Vec::new();
        let mut events = Vec::new();

        for (maker_index, maker_view) in batch.makers().enumerate() {
            if taker_remaining.is_zero() {
                let skipped = batch.maker_count() - maker_index;
                debug!(taker = %taker.hash, skipped, "taker exhausted");
                break;
            }

            let maker = self.resolve(maker_view)?;
            Self::check_match(&taker, &maker, maker_index)?;

            let maker_remaining = state
                .fills()
                .remaining(maker.hash, maker.view.sub_amount());
            if maker_remaining.is_zero() {
                debug!(maker = %maker.hash, maker_index, "maker already filled");
                continue;
            }

            let fill_sub = taker_remaining.min(maker_remaining);
            let fill_main = maker
                .view
                .main_amount()
                .checked_mul(fill_sub)
                .ok_or_else(|| RelayError::ArithmeticOverflow("maker main * fill".into()))?
                / maker.view.sub_amount();

            let (taker_fee, maker_fee) =
                self.apply_fill(state, &taker, &maker, fill_sub, fill_main)?;

            state.record_fill(maker.hash, fill_sub)?;
            state.record_fill(taker.hash, fill_sub)?;
            taker_remaining -= fill_sub;

            debug!(
                maker_index,
                maker = %maker.user,
                %fill_sub,
                %fill_main,
                label = describe_fill(Liquidity::Maker, maker.side()),
                "fill"
            );

            events.push(trade_event(&taker, fill_sub, fill_main));
            events.push(trade_event(&maker, fill_sub, fill_main));
            fills.push(MakerFill {
                maker_index,
                maker_hash: maker.hash,
                maker: maker.user,
                fill_sub,
                fill_main,
                taker_fee,
                maker_fee,
            });
        }

        let taker_filled = fills
            .iter()
            .fold(U256::ZERO, |acc, f| acc + f.fill_sub);
        let taker_rest = state
            .fills()
            .remaining(taker.hash, taker.view.sub_amount());

        info!(
            taker = %taker.user,
            hash = %taker.hash,
            makers = batch.maker_count(),
            filled = fills.len(),
            %taker_filled,
            %taker_rest,
            "settled order batch"
        );

        Ok(SettlementOutcome {
            taker_hash: taker.hash,
            taker: taker.user,
            fills,
            taker_filled,
            taker_rest,
            events,
        })
    }

    fn resolve<'v>(&self, view: OrderView<'v>) -> Result<ResolvedOrder<'v>> {
        let user = self.directory.require_user(view.user_id())?;
        let main = self.directory.require_token(view.main_token())?;
        let sub = self.directory.require_token(view.sub_token())?;
        if view.main_amount().is_zero() || view.sub_amount().is_zero() {
            return Err(RelayError::InvalidOrder {
                reason: format!("zero amount in order from {}", view.user_id()),
            });
        }
        if view.main_token() == view.sub_token() {
            return Err(RelayError::InvalidOrder {
                reason: format!("main and sub token are both {}", view.main_token()),
            });
        }
        let hash = verify_record(&view, user)?;
        Ok(ResolvedOrder {
            view,
            hash,
            user,
            main,
            sub,
        })
    }

    fn check_match(
        taker: &ResolvedOrder<'_>,
        maker: &ResolvedOrder<'_>,
        maker_index: usize,
    ) -> Result<()> {
        if maker.side() != taker.side().opposite() {
            return Err(RelayError::SideMismatch { maker_index });
        }
        if taker.view.main_token() != maker.view.main_token()
            || taker.view.sub_token() != maker.view.sub_token()
        {
            return Err(RelayError::PairMismatch { maker_index });
        }

        // Compare T.main / T.sub against M.main / M.sub without division.
        let overflow = || RelayError::ArithmeticOverflow("price cross-multiplication".into());
        let taker_side = taker
            .view
            .main_amount()
            .checked_mul(maker.view.sub_amount())
            .ok_or_else(overflow)?;
        let maker_side = maker
            .view
            .main_amount()
            .checked_mul(taker.view.sub_amount())
            .ok_or_else(overflow)?;
        let acceptable = match taker.side() {
            OrderSide::Buy => taker_side >= maker_side,
            OrderSide::Sell => taker_side <= maker_side,
        };
        if !acceptable {
            return Err(RelayError::PriceMismatch { maker_index });
        }
        Ok(())
    }

    /// Moves both legs and charges both fees. Returns `(taker_fee, maker_fee)`.
    fn apply_fill(
        &self,
        state: &mut SettlementState,
        taker: &ResolvedOrder<'_>,
        maker: &ResolvedOrder<'_>,
        fill_sub: U256,
        fill_main: U256,
    ) -> Result<(Option<FeeCharge>, Option<FeeCharge>)> {
        let (buyer, seller) = match taker.side() {
            OrderSide::Buy => (taker, maker),
            OrderSide::Sell => (maker, taker),
        };
        state.move_balance(taker.sub, seller.user, buyer.user, fill_sub)?;
        state.move_balance(taker.main, buyer.user, seller.user, fill_main)?;

        let taker_fee = self.charge_fee(state, taker, Liquidity::Taker, fill_sub, fill_main)?;
        let maker_fee = self.charge_fee(state, maker, Liquidity::Maker, fill_sub, fill_main)?;
        Ok((taker_fee, maker_fee))
    }

    /// Fee on what `order` received: `subToken` for a buy, `mainToken` for
    /// a sell. Charged in the platform fee token when the order asks for it.
    fn charge_fee(
        &self,
        state: &mut SettlementState,
        order: &ResolvedOrder<'_>,
        liquidity: Liquidity,
        fill_sub: U256,
        fill_main: U256,
    ) -> Result<Option<FeeCharge>> {
        let flags = order.view.flags();
        let (received, received_token) = match order.side() {
            OrderSide::Buy => (fill_sub, order.sub),
            OrderSide::Sell => (fill_main, order.main),
        };
        let divisor = self.config.fee_divisor(liquidity, flags.fee_in_fee_token)?;
        let amount = compute_fee(received, order.view.fee_price(), divisor)?;
        if amount.is_zero() {
            return Ok(None);
        }

        let token = if flags.fee_in_fee_token {
            self.directory.require_token(self.config.fee_token)?
        } else {
            received_token
        };
        state.move_balance(token, order.user, self.config.fee_wallet, amount)?;
        Ok(Some(FeeCharge {
            payer: order.user,
            token,
            amount,
        }))
    }
}

fn trade_event(order: &ResolvedOrder<'_>, fill_sub: U256, fill_main: U256) -> TradeEvent {
    TradeEvent {
        user: order.user,
        is_buy: order.view.flags().is_buy,
        token_target: order.sub,
        amount_target: fill_sub,
        token_trade: order.main,
        amount_trade: fill_main,
    }
}

#[cfg(test)]
mod tests {
    use relaydex_codec::encode_order_batch;
    use relaydex_signing::testing::RecordSigner;
    use relaydex_types::{MemoryDirectory, Order, OrderBatch, OrderFlags, TokenId, UserId};

    use super::*;

    const FEE_WALLET: Address = Address::repeat_byte(0xfe);
    const QUOTE: TokenId = TokenId(0);
    const BASE: TokenId = TokenId(11);
    const BASE_ADDR: Address = Address::repeat_byte(0x11);

    struct Fixture {
        directory: MemoryDirectory,
        config: ExchangeConfig,
        state: SettlementState,
        alice: RecordSigner,
        bob: RecordSigner,
        carol: RecordSigner,
    }

    impl Fixture {
        fn new() -> Self {
            let alice = RecordSigner::from_seed(1);
            let bob = RecordSigner::from_seed(2);
            let carol = RecordSigner::from_seed(3);
            let mut directory = MemoryDirectory::new();
            directory.register_token(BASE, BASE_ADDR);
            directory.register_user(UserId(1), alice.address());
            directory.register_user(UserId(2), bob.address());
            directory.register_user(UserId(3), carol.address());

            let mut state = SettlementState::new();
            for who in [&alice, &bob, &carol] {
                state.credit(Address::ZERO, who.address(), U256::from(1_000_000)).unwrap();
                state.credit(BASE_ADDR, who.address(), U256::from(1_000_000)).unwrap();
            }
            Self {
                directory,
                config: ExchangeConfig::new(FEE_WALLET, QUOTE),
                state,
                alice,
                bob,
                carol,
            }
        }

        fn settle(&mut self, taker: Order, makers: Vec<Order>) -> Result<SettlementOutcome> {
            let bytes = encode_order_batch(&OrderBatch { taker, makers });
            let view = OrderBatchView::new(&bytes).unwrap();
            let engine = SettlementEngine::new(&self.directory, &self.config);
            self.state.atomically(|s| engine.settle(s, &view))
        }
    }

    fn order(signer: &RecordSigner, user: u32, side: OrderSide, main: u64, sub: u64) -> Order {
        signer.sign_order(Order::unsigned(
            UserId(user),
            side,
            (QUOTE, U256::from(main)),
            (BASE, U256::from(sub)),
        ))
    }

    #[test]
    fn exact_match_fills_both_fully() {
        let mut fx = Fixture::new();
        let taker = order(&fx.alice, 1, OrderSide::Buy, 300, 100);
        let maker = order(&fx.bob, 2, OrderSide::Sell, 300, 100);
        let out = fx.settle(taker.clone(), vec![maker.clone()]).unwrap();

        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].fill_sub, U256::from(100));
        assert_eq!(out.fills[0].fill_main, U256::from(300));
        assert_eq!(out.taker_rest, U256::ZERO);
        assert_eq!(fx.state.fills().filled(out.taker_hash), U256::from(100));
        assert_eq!(fx.state.fills().filled(out.fills[0].maker_hash), U256::from(100));

        let alice = fx.alice.address();
        assert_eq!(fx.state.balance(BASE_ADDR, alice), U256::from(1_000_100));
        assert_eq!(fx.state.balance(Address::ZERO, alice), U256::from(999_700));
        assert_eq!(out.events.len(), 2);
    }

    #[test]
    fn trade_happens_at_maker_price() {
        let mut fx = Fixture::new();
        // taker willing to pay 4 per unit, maker asks 3
        let taker = order(&fx.alice, 1, OrderSide::Buy, 400, 100);
        let maker = order(&fx.bob, 2, OrderSide::Sell, 150, 50);
        let out = fx.settle(taker, vec![maker]).unwrap();
        assert_eq!(out.fills[0].fill_sub, U256::from(50));
        assert_eq!(out.fills[0].fill_main, U256::from(150));
        assert_eq!(out.taker_rest, U256::from(50));
    }

    #[test]
    fn mismatches_are_reported_with_maker_index() {
        let mut fx = Fixture::new();
        let taker = order(&fx.alice, 1, OrderSide::Buy, 300, 100);

        let same_side = order(&fx.bob, 2, OrderSide::Buy, 300, 100);
        let err = fx.settle(taker.clone(), vec![same_side]).unwrap_err();
        assert_eq!(err, RelayError::SideMismatch { maker_index: 0 });

        let good = order(&fx.bob, 2, OrderSide::Sell, 30, 10);
        let pricey = order(&fx.carol, 3, OrderSide::Sell, 400, 100);
        let err = fx.settle(taker.clone(), vec![good, pricey]).unwrap_err();
        assert_eq!(err, RelayError::PriceMismatch { maker_index: 1 });
        assert_eq!(fx.state.balance(Address::ZERO, fx.bob.address()), U256::from(1_000_000));

        let mut other_pair = Order::unsigned(
            UserId(2),
            OrderSide::Sell,
            (QUOTE, U256::from(300)),
            (TokenId::NATIVE, U256::from(100)),
        );
        other_pair.main_token = BASE;
        let other_pair = fx.bob.sign_order(other_pair);
        let err = fx.settle(taker, vec![other_pair]).unwrap_err();
        assert_eq!(err, RelayError::PairMismatch { maker_index: 0 });
    }

    #[test]
    fn wrong_signer_is_rejected() {
        let mut fx = Fixture::new();
        let taker = order(&fx.alice, 1, OrderSide::Buy, 300, 100);
        // signed by carol but claims to be user 2
        let maker = order(&fx.carol, 2, OrderSide::Sell, 300, 100);
        let err = fx.settle(taker, vec![maker]).unwrap_err();
        assert!(matches!(err, RelayError::InvalidSignature { .. }));
    }

    #[test]
    fn fees_go_to_fee_wallet() {
        let mut fx = Fixture::new();
        let mut taker = Order::unsigned(
            UserId(1),
            OrderSide::Buy,
            (QUOTE, U256::from(300_000)),
            (BASE, U256::from(100_000)),
        );
        taker.fee_price = U256::from(500);
        let taker = fx.alice.sign_order(taker);

        let mut maker = Order::unsigned(
            UserId(2),
            OrderSide::Sell,
            (QUOTE, U256::from(300_000)),
            (BASE, U256::from(100_000)),
        );
        maker.fee_price = U256::from(1_000);
        maker.flags = OrderFlags::sell().with_fee_token();
        let maker = fx.bob.sign_order(maker);

        let out = fx.settle(taker, vec![maker]).unwrap();
        let fill = &out.fills[0];

        // taker buys 100_000 base: 100_000 * 500 / 5_000_000 = 10 base
        let taker_fee = fill.taker_fee.unwrap();
        assert_eq!(taker_fee.token, BASE_ADDR);
        assert_eq!(taker_fee.amount, U256::from(10));
        // maker receives 300_000 quote, pays in fee token at half rate:
        // 300_000 * 1_000 / 20_000_000 = 15
        let maker_fee = fill.maker_fee.unwrap();
        assert_eq!(maker_fee.token, Address::ZERO);
        assert_eq!(maker_fee.amount, U256::from(15));

        assert_eq!(fx.state.balance(BASE_ADDR, FEE_WALLET), U256::from(10));
        assert_eq!(fx.state.balance(Address::ZERO, FEE_WALLET), U256::from(15));
        assert_eq!(
            fx.state.balance(BASE_ADDR, fx.alice.address()),
            U256::from(1_000_000 + 100_000 - 10)
        );
    }

    #[test]
    fn resubmitting_filled_batch_settles_nothing() {
        let mut fx = Fixture::new();
        let taker = order(&fx.alice, 1, OrderSide::Sell, 300, 100);
        let maker = order(&fx.bob, 2, OrderSide::Buy, 300, 100);
        fx.settle(taker.clone(), vec![maker.clone()]).unwrap();
        let again = fx.settle(taker, vec![maker]).unwrap();
        assert!(again.is_empty());
        assert_eq!(again.taker_rest, U256::ZERO);
    }

    #[test]
    fn zero_amount_order_is_invalid() {
        let mut fx = Fixture::new();
        let taker = order(&fx.alice, 1, OrderSide::Buy, 0, 100);
        let maker = order(&fx.bob, 2, OrderSide::Sell, 300, 100);
        let err = fx.settle(taker, vec![maker]).unwrap_err();
        assert!(matches!(err, RelayError::InvalidOrder { .. }));
    }

    #[test]
    fn removed_user_is_invalid() {
        let mut fx = Fixture::new();
        fx.directory.remove_user(UserId(2));
        let taker = order(&fx.alice, 1, OrderSide::Buy, 300, 100);
        let maker = order(&fx.bob, 2, OrderSide::Sell, 300, 100);
        let err = fx.settle(taker, vec![maker]).unwrap_err();
        assert_eq!(err, RelayError::InvalidUser(UserId(2)));
    }
}
