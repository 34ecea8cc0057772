//! Withdrawal request wire types (提现)

use serde::{Deserialize, Serialize};

/// Approval state of a withdrawal request
///
/// PENDING → APPROVED → PROCESSED, or PENDING|APPROVED → REJECTED.
/// PROCESSED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Processed,
    Rejected,
}

impl Default for WithdrawalStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl WithdrawalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, WithdrawalStatus::Processed | WithdrawalStatus::Rejected)
    }

    /// Open requests hold their funds reserved
    pub fn is_open(self) -> bool {
        matches!(self, WithdrawalStatus::Pending | WithdrawalStatus::Approved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "PENDING",
            WithdrawalStatus::Approved => "APPROVED",
            WithdrawalStatus::Processed => "PROCESSED",
            WithdrawalStatus::Rejected => "REJECTED",
        }
    }
}

/// Create-request payload (vendor-initiated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalCreate {
    pub vendor_id: String,
    /// Earning records to cash out ("earning_record:xxx" ids)
    pub fund_ids: Vec<String>,
    /// Payout destination (mobile-money number)
    pub destination: String,
}

/// Admin approve payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WithdrawalApprove {
    pub admin_notes: Option<String>,
}

/// Admin reject payload — reason is mandatory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalReject {
    pub reason: String,
}

/// Admin process payload — external gateway receipt is mandatory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalProcess {
    pub receipt: String,
}
