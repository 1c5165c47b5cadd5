//! # relaydex-codec
//!
//! Byte-exact encoders, decoders and zero-copy views for every RelayDEX
//! wire record.
//!
//! ## Layouts
//!
//! All integers are big-endian. Records carrying their own signature start
//! with `s(32) ‖ r(32) ‖ v(1)`; everything after that prefix is the signed
//! payload.
//!
//! ```text
//! Order (174)      s ‖ r ‖ v ‖ feePrice(32) ‖ nonce(4) ‖ config(1) ‖ subAmount(32) ‖ subToken(2) ‖ mainAmount(32) ‖ mainToken(2) ‖ userID(4)
//! Withdrawal (140) s ‖ r ‖ v ‖ fee(32) ‖ nonce(4) ‖ config(1) ‖ amount(32) ‖ tokenID(2) ‖ userID(4)
//! Transfer         nonce(4) ‖ config(1) ‖ from(20)  then N × [ fee(32) ‖ amount(32) ‖ tokenID(2) ‖ to(20) ]
//! Migration        s ‖ r ‖ v ‖ tokenIDs(n × 2) ‖ userID(4) ‖ target(20)      n ∈ 1..=3
//! ```
//!
//! Order batches are a taker record followed by maker records. Decoding
//! only checks lengths; semantic validation belongs to settlement.
//!
//! Views ([`OrderBatchView`], [`TransferBatchView`], ...) read single fields
//! of the k-th record straight from the borrowed blob, so the settlement
//! engine never materialises records it does not touch.

pub mod fields;
pub mod migration;
pub mod order;
pub mod transfer;
pub mod withdrawal;

pub use fields::FieldWriter;
pub use migration::{MigrationView, decode_migration, encode_migration};
pub use order::{
    OrderBatchView, OrderView, decode_order, decode_order_batch, encode_order,
    encode_order_batch,
};
pub use transfer::{TransferBatchView, decode_transfer_batch, encode_transfer_batch};
pub use withdrawal::{WithdrawalView, decode_withdrawal, encode_withdrawal};
