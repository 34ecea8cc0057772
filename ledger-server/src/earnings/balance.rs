//! Balance aggregation (余额聚合)
//!
//! Balances are never stored; every read recomputes the buckets from earning
//! records and open withdrawal requests. Hold maturation is evaluated lazily
//! at read time, so a matured record is reported as available even if the
//! background sweep has not run yet.

use crate::db::repository::{EarningRepository, WithdrawalRepository};
use crate::settlement::money::{to_decimal, to_f64};
use crate::utils::AppResult;
use shared::models::BalanceSummary;
use shared::util::now_millis;

#[derive(Clone)]
pub struct BalanceService {
    earnings: EarningRepository,
    withdrawals: WithdrawalRepository,
}

impl BalanceService {
    pub fn new(earnings: EarningRepository, withdrawals: WithdrawalRepository) -> Self {
        Self {
            earnings,
            withdrawals,
        }
    }

    /// Compute a vendor's balance summary as of now.
    ///
    /// `available` excludes RESERVED records by construction (reservation is
    /// a stored status), so funds referenced by an open request can never be
    /// double-counted. `net_available` restates `available` for the
    /// disbursement contract.
    pub async fn balance(&self, vendor_id: &str) -> AppResult<BalanceSummary> {
        let now = now_millis();
        let buckets = self.earnings.buckets(vendor_id, now).await?;
        let pending_withdrawals = self.withdrawals.sum_open(vendor_id).await?;

        // Database f64 sums can carry float noise; settle each bucket to 2 dp
        let available = round2(buckets.available);
        Ok(BalanceSummary {
            available,
            locked: round2(buckets.locked),
            pending_withdrawals: round2(pending_withdrawals),
            withdrawn: round2(buckets.withdrawn),
            referral: round2(buckets.referral),
            net_available: available,
            total_earned: round2(buckets.total_earned),
        })
    }
}

#[inline]
fn round2(value: f64) -> f64 {
    to_f64(to_decimal(value))
}
