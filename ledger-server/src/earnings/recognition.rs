//! Earning recognition (收益确认)
//!
//! When a suborder reaches DELIVERED its net amount becomes vendor money,
//! split into an immediate tranche (AVAILABLE) and a time-locked tranche
//! (HOLD). Recognition is idempotent per suborder: the record pair carries
//! deterministic recognition keys guarded by a unique index, so a duplicate
//! trigger fails without writing anything.

use crate::core::Config;
use crate::db::models::EarningRecord;
use crate::db::repository::{
    EarningRepository, RepoError, SuborderRepository,
};
use crate::settlement::release_split;
use crate::utils::{AppError, AppResult};
use shared::models::{EarningBreakdown, EarningStatus, FulfillmentStatus, FundType, ReleaseType};
use shared::util::now_millis;
use shared::LedgerError;

#[derive(Clone)]
pub struct RecognitionService {
    suborders: SuborderRepository,
    earnings: EarningRepository,
    config: Config,
}

impl RecognitionService {
    pub fn new(
        suborders: SuborderRepository,
        earnings: EarningRepository,
        config: Config,
    ) -> Self {
        Self {
            suborders,
            earnings,
            config,
        }
    }

    /// Recognize earnings for a delivered suborder.
    ///
    /// Creates exactly two records (immediate + locked) in one atomic insert.
    /// Re-invocation for the same suborder fails with
    /// [`LedgerError::DuplicateEarningRecognition`].
    pub async fn recognize(&self, suborder_id: &str) -> AppResult<Vec<EarningRecord>> {
        let suborder = self.suborders.get(suborder_id).await?;

        if suborder.status != FulfillmentStatus::Delivered {
            return Err(AppError::Ledger(LedgerError::InvalidTransition(format!(
                "earnings can only be recognized for DELIVERED suborders, suborder {} is {}",
                suborder_id,
                suborder.status.as_str()
            ))));
        }

        let sid = suborder
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::internal("suborder row missing id"))?;

        let split = release_split(
            suborder.net_amount,
            self.config.immediate_release_percent,
        );
        let breakdown = EarningBreakdown {
            total_amount: suborder.gross_amount,
            commission: suborder.commission,
            vendor_earnings: suborder.net_amount,
            immediate_release: split.immediate,
            remaining_locked: split.locked,
        };

        let now = now_millis();
        let hold_until = now + self.config.hold_duration_millis();

        let base = EarningRecord {
            id: None,
            vendor_id: suborder.vendor_id.clone(),
            order_id: Some(suborder.order_id.clone()),
            suborder_id: Some(sid.clone()),
            fund_type: FundType::Order,
            release_type: ReleaseType::Immediate,
            gross_amount: suborder.gross_amount,
            commission: suborder.commission,
            net_amount: split.immediate,
            status: EarningStatus::Available,
            percentage: self.config.immediate_release_percent,
            is_immediate_release: true,
            hold_until: None,
            breakdown,
            recognition_key: format!("rec:{sid}:IMMEDIATE"),
            payment_ref: None,
            scheduled_at: now,
            created_at: now,
            updated_at: now,
        };

        let locked = EarningRecord {
            release_type: ReleaseType::Locked,
            net_amount: split.locked,
            status: EarningStatus::Hold,
            percentage: 100.0 - self.config.immediate_release_percent,
            is_immediate_release: false,
            hold_until: Some(hold_until),
            recognition_key: format!("rec:{sid}:LOCKED"),
            ..base.clone()
        };

        let created = self
            .earnings
            .insert_many(vec![base, locked])
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => {
                    AppError::Ledger(LedgerError::DuplicateEarningRecognition(sid.clone()))
                }
                other => AppError::from(other),
            })?;

        tracing::info!(
            vendor_id = %suborder.vendor_id,
            suborder_id = %sid,
            immediate = split.immediate,
            locked = split.locked,
            "Earnings recognized"
        );

        Ok(created)
    }
}
