//! Referrals Module (推荐奖励)
//!
//! A referrer earns a configured percentage of a referred vendor's
//! subscription payment. Bonuses land as REFERRAL earning records, available
//! immediately (no hold), and are withdrawable through the same workflow as
//! order earnings; the balance view aggregates them separately.

use crate::core::Config;
use crate::db::models::EarningRecord;
use crate::db::repository::{EarningRepository, RepoError};
use crate::settlement::money::{to_decimal, to_f64};
use crate::utils::validation::{validate_amount, validate_required_text, MAX_NAME_LEN};
use crate::utils::{AppError, AppResult};
use rust_decimal::Decimal;
use shared::models::{EarningBreakdown, EarningStatus, FundType, ReferralAccrue, ReleaseType};
use shared::util::{now_millis, snowflake_id};
use shared::LedgerError;

#[derive(Clone)]
pub struct ReferralService {
    earnings: EarningRepository,
    config: Config,
}

impl ReferralService {
    pub fn new(earnings: EarningRepository, config: Config) -> Self {
        Self { earnings, config }
    }

    /// Credit the referrer's bonus for a referred vendor's payment.
    ///
    /// When the caller supplies a `payment_ref`, accrual is idempotent on it:
    /// re-submitting the same reference fails with
    /// [`LedgerError::DuplicateEarningRecognition`].
    pub async fn accrue(&self, input: ReferralAccrue) -> AppResult<EarningRecord> {
        validate_required_text(&input.referrer_id, "referrer_id", MAX_NAME_LEN)?;
        validate_required_text(&input.referred_id, "referred_id", MAX_NAME_LEN)?;
        validate_amount(input.payment_amount, "payment_amount")?;
        if input.referrer_id == input.referred_id {
            return Err(AppError::validation("a vendor cannot refer themselves"));
        }

        let bonus = to_f64(
            to_decimal(input.payment_amount) * to_decimal(self.config.referral_rate_percent)
                / Decimal::ONE_HUNDRED,
        );

        let recognition_key = match &input.payment_ref {
            Some(r) => format!("ref:{r}"),
            None => format!("ref:{}", snowflake_id()),
        };

        let now = now_millis();
        let record = EarningRecord {
            id: None,
            vendor_id: input.referrer_id.clone(),
            order_id: None,
            suborder_id: None,
            fund_type: FundType::Referral,
            release_type: ReleaseType::Immediate,
            gross_amount: bonus,
            commission: 0.0,
            net_amount: bonus,
            status: EarningStatus::Available,
            percentage: 100.0,
            is_immediate_release: true,
            hold_until: None,
            breakdown: EarningBreakdown {
                total_amount: input.payment_amount,
                commission: 0.0,
                vendor_earnings: bonus,
                immediate_release: bonus,
                remaining_locked: 0.0,
            },
            recognition_key,
            payment_ref: input.payment_ref.clone(),
            scheduled_at: now,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .earnings
            .insert_many(vec![record])
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::Ledger(
                    LedgerError::DuplicateEarningRecognition(
                        input.payment_ref.clone().unwrap_or_default(),
                    ),
                ),
                other => AppError::from(other),
            })?;

        tracing::info!(
            referrer_id = %input.referrer_id,
            referred_id = %input.referred_id,
            bonus,
            "Referral bonus accrued"
        );

        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("referral insert returned no record"))
    }

    /// List a referrer's bonus records
    pub async fn list(&self, vendor_id: &str) -> AppResult<Vec<EarningRecord>> {
        Ok(self.earnings.list_referrals(vendor_id).await?)
    }
}
