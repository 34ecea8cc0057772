//! Referral bonus wire types (推荐奖励)

use serde::{Deserialize, Serialize};

/// Accrual payload — reported by the subscription billing collaborator when a
/// referred vendor's payment carries a referral attribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralAccrue {
    /// Vendor receiving the bonus
    pub referrer_id: String,
    /// Vendor whose subscription payment triggered the accrual
    pub referred_id: String,
    pub payment_amount: f64,
    /// Billing-side payment reference; when present, accrual is idempotent
    /// per reference
    pub payment_ref: Option<String>,
}
