//! Order records and taker+makers batches.

use alloy_primitives::U256;
use relaydex_types::{
    Order, OrderBatch, OrderFlags, RecordKind, RecordSignature, RelayError, Result, TokenId,
    UserId,
    constants::{ORDER_LEN, SIGNATURE_LEN},
};

use crate::fields::{FieldWriter, read_signature, read_u8, read_u16, read_u32, read_u256};

// Offsets within one 174-byte record.
const FEE_PRICE: usize = SIGNATURE_LEN;
const NONCE: usize = FEE_PRICE + 32;
const CONFIG: usize = NONCE + 4;
const SUB_AMOUNT: usize = CONFIG + 1;
const SUB_TOKEN: usize = SUB_AMOUNT + 32;
const MAIN_AMOUNT: usize = SUB_TOKEN + 2;
const MAIN_TOKEN: usize = MAIN_AMOUNT + 32;
const USER_ID: usize = MAIN_TOKEN + 2;

const _: () = assert!(USER_ID + 4 == ORDER_LEN);

/// Borrowed view of a single 174-byte order record.
#[derive(Debug, Clone, Copy)]
pub struct OrderView<'a> {
    bytes: &'a [u8],
}

impl<'a> OrderView<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() != ORDER_LEN {
            return Err(RelayError::malformed(
                RecordKind::Order,
                bytes.len(),
                format!("expected exactly {ORDER_LEN} bytes"),
            ));
        }
        Ok(Self { bytes })
    }

    /// The raw record, signature included.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Signed payload: the record minus its leading `s‖r‖v`.
    #[must_use]
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[SIGNATURE_LEN..]
    }

    #[must_use]
    pub fn signature(&self) -> RecordSignature {
        read_signature(self.bytes, 0)
    }

    #[must_use]
    pub fn fee_price(&self) -> U256 {
        read_u256(self.bytes, FEE_PRICE)
    }

    #[must_use]
    pub fn nonce(&self) -> u32 {
        read_u32(self.bytes, NONCE)
    }

    #[must_use]
    pub fn flags(&self) -> OrderFlags {
        OrderFlags::from_byte(read_u8(self.bytes, CONFIG))
    }

    #[must_use]
    pub fn sub_amount(&self) -> U256 {
        read_u256(self.bytes, SUB_AMOUNT)
    }

    #[must_use]
    pub fn sub_token(&self) -> TokenId {
        TokenId(read_u16(self.bytes, SUB_TOKEN))
    }

    #[must_use]
    pub fn main_amount(&self) -> U256 {
        read_u256(self.bytes, MAIN_AMOUNT)
    }

    #[must_use]
    pub fn main_token(&self) -> TokenId {
        TokenId(read_u16(self.bytes, MAIN_TOKEN))
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId(read_u32(self.bytes, USER_ID))
    }

    /// Materialise the full record.
    #[must_use]
    pub fn to_order(&self) -> Order {
        Order {
            user_id: self.user_id(),
            main_token: self.main_token(),
            main_amount: self.main_amount(),
            sub_token: self.sub_token(),
            sub_amount: self.sub_amount(),
            flags: self.flags(),
            fee_price: self.fee_price(),
            nonce: self.nonce(),
            signature: self.signature(),
        }
    }
}

/// Encode one order into its 174-byte wire form.
#[must_use]
pub fn encode_order(order: &Order) -> Vec<u8> {
    let mut w = FieldWriter::with_capacity(ORDER_LEN);
    write_order(&mut w, order);
    w.finish()
}

fn write_order(w: &mut FieldWriter, order: &Order) {
    w.put_signature(&order.signature)
        .put_u256(order.fee_price)
        .put_u32(order.nonce)
        .put_u8(order.flags.to_byte())
        .put_u256(order.sub_amount)
        .put_u16(order.sub_token.0)
        .put_u256(order.main_amount)
        .put_u16(order.main_token.0)
        .put_u32(order.user_id.0);
}

pub fn decode_order(bytes: &[u8]) -> Result<Order> {
    Ok(OrderView::new(bytes)?.to_order())
}

/// Borrowed view of a taker+makers batch.
///
/// Record `0` is the taker; record `k` (k ≥ 1) is maker `k - 1`.
#[derive(Debug, Clone, Copy)]
pub struct OrderBatchView<'a> {
    bytes: &'a [u8],
}

impl<'a> OrderBatchView<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % ORDER_LEN != 0 {
            return Err(RelayError::malformed(
                RecordKind::Order,
                bytes.len(),
                format!("batch must be a nonzero multiple of {ORDER_LEN} bytes"),
            ));
        }
        Ok(Self { bytes })
    }

    /// Number of records, taker included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / ORDER_LEN
    }

    /// Always `false` once constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn maker_count(&self) -> usize {
        self.len() - 1
    }

    /// The k-th record, or `None` past the end.
    #[must_use]
    pub fn get(&self, k: usize) -> Option<OrderView<'a>> {
        let start = k.checked_mul(ORDER_LEN)?;
        let end = start.checked_add(ORDER_LEN)?;
        let bytes = self.bytes.get(start..end)?;
        Some(OrderView { bytes })
    }

    #[must_use]
    pub fn taker(&self) -> OrderView<'a> {
        OrderView {
            bytes: &self.bytes[..ORDER_LEN],
        }
    }

    #[must_use]
    pub fn maker(&self, index: usize) -> Option<OrderView<'a>> {
        self.get(index.checked_add(1)?)
    }

    /// Makers in submitted order.
    pub fn makers(&self) -> impl Iterator<Item = OrderView<'a>> + use<'a> {
        let bytes: &'a [u8] = self.bytes;
        bytes[ORDER_LEN..]
            .chunks_exact(ORDER_LEN)
            .map(|bytes| OrderView { bytes })
    }

    #[must_use]
    pub fn to_batch(&self) -> OrderBatch {
        OrderBatch {
            taker: self.taker().to_order(),
            makers: self.makers().map(|m| m.to_order()).collect(),
        }
    }
}

#[must_use]
pub fn encode_order_batch(batch: &OrderBatch) -> Vec<u8> {
    let mut w = FieldWriter::with_capacity(ORDER_LEN * batch.len());
    write_order(&mut w, &batch.taker);
    for maker in &batch.makers {
        write_order(&mut w, maker);
    }
    w.finish()
}

pub fn decode_order_batch(bytes: &[u8]) -> Result<OrderBatch> {
    Ok(OrderBatchView::new(bytes)?.to_batch())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use relaydex_types::OrderSide;

    use super::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64.pow(18))
    }

    /// The reference fixture order.
    fn fixture() -> Order {
        Order {
            user_id: UserId(11),
            main_token: TokenId(0),
            main_amount: eth(3),
            sub_token: TokenId(11),
            sub_amount: eth(100),
            flags: OrderFlags::from_byte(1),
            fee_price: U256::from(10),
            nonce: 1,
            signature: RecordSignature::new(B256::repeat_byte(0x0a), B256::repeat_byte(0x05), 28),
        }
    }

    fn random_order(rng: &mut StdRng) -> Order {
        Order {
            user_id: UserId(rng.r#gen()),
            main_token: TokenId(rng.r#gen()),
            main_amount: U256::from_be_bytes(rng.r#gen::<[u8; 32]>()),
            sub_token: TokenId(rng.r#gen()),
            sub_amount: U256::from_be_bytes(rng.r#gen::<[u8; 32]>()),
            flags: OrderFlags::from_byte(rng.r#gen()),
            fee_price: U256::from(rng.r#gen::<u64>()),
            nonce: rng.r#gen(),
            signature: RecordSignature::new(
                B256::from(rng.r#gen::<[u8; 32]>()),
                B256::from(rng.r#gen::<[u8; 32]>()),
                rng.gen_range(27..=28),
            ),
        }
    }

    #[test]
    fn fixture_layout_is_byte_exact() {
        let order = fixture();
        let bytes = encode_order(&order);
        assert_eq!(bytes.len(), ORDER_LEN);
        // s then r then v
        assert!(bytes[..32].iter().all(|b| *b == 0x05));
        assert_eq!(bytes[64], 28);
        // feePrice = 10
        assert_eq!(bytes[FEE_PRICE + 31], 10);
        // nonce = 1, config = 1
        assert_eq!(&bytes[NONCE..NONCE + 4], &[0, 0, 0, 1]);
        assert_eq!(bytes[CONFIG], 1);
        // tokens and user at the tail
        assert_eq!(&bytes[SUB_TOKEN..SUB_TOKEN + 2], &[0, 11]);
        assert_eq!(&bytes[MAIN_TOKEN..MAIN_TOKEN + 2], &[0, 0]);
        assert_eq!(&bytes[USER_ID..], &[0, 0, 0, 11]);
    }

    #[test]
    fn view_getters_read_fields() {
        let bytes = encode_order(&fixture());
        let view = OrderView::new(&bytes).unwrap();
        assert_eq!(view.user_id(), UserId(11));
        assert_eq!(view.main_token(), TokenId(0));
        assert_eq!(view.main_amount(), eth(3));
        assert_eq!(view.sub_token(), TokenId(11));
        assert_eq!(view.sub_amount(), eth(100));
        assert!(view.flags().is_buy);
        assert_eq!(view.fee_price(), U256::from(10));
        assert_eq!(view.nonce(), 1);
        assert_eq!(view.payload().len(), ORDER_LEN - SIGNATURE_LEN);
    }

    #[test]
    fn roundtrip_random_orders() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let order = random_order(&mut rng);
            assert_eq!(decode_order(&encode_order(&order)).unwrap(), order);
        }
    }

    #[test]
    fn batch_roundtrip_one_to_many() {
        let mut rng = StdRng::seed_from_u64(99);
        for makers in 0..6 {
            let batch = OrderBatch {
                taker: random_order(&mut rng),
                makers: (0..makers).map(|_| random_order(&mut rng)).collect(),
            };
            let bytes = encode_order_batch(&batch);
            assert_eq!(bytes.len(), ORDER_LEN * (makers + 1));
            assert_eq!(decode_order_batch(&bytes).unwrap(), batch);
        }
    }

    #[test]
    fn batch_view_random_access() {
        let mut taker = fixture();
        taker.flags = OrderFlags::sell();
        let mut m1 = fixture();
        m1.user_id = UserId(21);
        let mut m2 = fixture();
        m2.user_id = UserId(22);
        let bytes = encode_order_batch(&OrderBatch {
            taker,
            makers: vec![m1, m2],
        });

        let view = OrderBatchView::new(&bytes).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.maker_count(), 2);
        assert!(!view.taker().flags().is_buy);
        assert_eq!(view.maker(1).unwrap().user_id(), UserId(22));
        assert_eq!(view.get(1).unwrap().user_id(), UserId(21));
        assert!(view.maker(2).is_none());
        assert!(view.get(3).is_none());
        let ids: Vec<u32> = view.makers().map(|m| m.user_id().0).collect();
        assert_eq!(ids, vec![21, 22]);
    }

    #[test]
    fn bad_lengths_are_malformed() {
        for len in [0, 1, ORDER_LEN - 1, ORDER_LEN + 1, 2 * ORDER_LEN + 17] {
            let bytes = vec![0u8; len];
            let err = OrderBatchView::new(&bytes).unwrap_err();
            assert!(
                matches!(err, RelayError::MalformedRecord { kind: RecordKind::Order, len: l, .. } if l == len),
                "len {len}: {err:?}"
            );
        }
        assert!(decode_order(&vec![0u8; ORDER_LEN * 2]).is_err());
    }

    #[test]
    fn reserved_config_bits_survive() {
        let mut order = Order::unsigned(
            UserId(1),
            OrderSide::Buy,
            (TokenId(0), eth(1)),
            (TokenId(1), eth(1)),
        );
        order.flags = OrderFlags::from_byte(0b1010_0101);
        let back = decode_order(&encode_order(&order)).unwrap();
        assert_eq!(back.flags.to_byte(), 0b1010_0101);
    }
}
