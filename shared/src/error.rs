//! Ledger domain errors
//!
//! Every variant is recoverable from the caller's perspective: the operation
//! did not apply and no partial ledger mutation occurred. Store failures are
//! NOT represented here — they surface as a generic service error and must
//! never be interpreted as a business-rule failure.

use thiserror::Error;

/// Business-rule failures of the earnings ledger and withdrawal workflow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Order has no vendors, no items, or a line item missing a vendor tag
    #[error("Invalid order composition: {0}")]
    InvalidOrderComposition(String),

    /// Earnings already recognized for this suborder
    #[error("Earnings already recognized for suborder {0}")]
    DuplicateEarningRecognition(String),

    /// Fund not owned by the vendor, not available, or already reserved
    #[error("Invalid fund selection: {0}")]
    InvalidFundSelection(String),

    /// Vendor already has an open withdrawal request
    #[error("Vendor {0} already has a pending withdrawal request")]
    AlreadyHasPendingRequest(String),

    /// Requested amount is below the configured minimum
    #[error("Requested amount {requested} is below the minimum of {minimum}")]
    BelowMinimumAmount { requested: f64, minimum: f64 },

    /// State-machine guard violation (request not in the expected state)
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Optimistic guard failed — caller should retry the whole operation
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),
}

impl LedgerError {
    /// Stable error code for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidOrderComposition(_) => "E1001",
            LedgerError::DuplicateEarningRecognition(_) => "E1002",
            LedgerError::InvalidFundSelection(_) => "E1003",
            LedgerError::AlreadyHasPendingRequest(_) => "E1004",
            LedgerError::BelowMinimumAmount { .. } => "E1005",
            LedgerError::InvalidTransition(_) => "E1006",
            LedgerError::ConcurrencyConflict(_) => "E1007",
        }
    }
}
