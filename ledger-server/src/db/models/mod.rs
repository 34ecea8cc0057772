//! Storage row types
//!
//! Cross-record references are stored as `"table:key"` strings; only a row's
//! own `id` round-trips as a SurrealDB `RecordId`.

pub mod earning;
pub mod order;
pub mod serde_helpers;
pub mod withdrawal;

pub use earning::EarningRecord;
pub use order::{OrderDetail, OrderRow, SuborderRow};
pub use withdrawal::WithdrawalRequest;
