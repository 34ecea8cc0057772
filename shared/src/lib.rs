//! Shared types for the Soko marketplace ledger
//!
//! Wire-level DTOs, the domain error enum and response envelopes used by
//! both the ledger server and its client crates.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::LedgerError;
pub use response::PaginatedResponse;
pub use serde::{Deserialize, Serialize};
