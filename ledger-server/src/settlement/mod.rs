//! Settlement Module
//!
//! Order splitting and money math. `splitter`/`commission`/`money` are
//! deterministic and side-effect free; `service` orchestrates placement
//! against the order repository.

pub mod commission;
pub mod money;
pub mod service;
pub mod splitter;

pub use commission::{release_split, take_commission, CommissionSplit, ReleaseSplit};
pub use service::SettlementService;
pub use splitter::{split_order, SuborderDraft};
