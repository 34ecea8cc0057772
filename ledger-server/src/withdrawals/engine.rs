//! Withdrawal workflow engine (提现工作流)
//!
//! Thin orchestration over [`WithdrawalRepository`]: input validation, fund-id
//! normalization, and translation of transaction guard markers into
//! [`LedgerError`] kinds. All atomicity lives in the repository transactions.

use crate::core::Config;
use crate::db::models::WithdrawalRequest;
use crate::db::repository::{
    parse_record_id, RepoError, WithdrawalRepository, GUARD_BELOW_MINIMUM, GUARD_FUND_CONFLICT,
    GUARD_INVALID_TRANSITION, GUARD_PENDING_EXISTS,
};
use crate::utils::validation::{validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult};
use shared::models::{WithdrawalCreate, WithdrawalStatus};
use shared::util::{now_millis, snowflake_id};
use shared::LedgerError;

#[derive(Clone)]
pub struct WithdrawalEngine {
    withdrawals: WithdrawalRepository,
    config: Config,
}

impl WithdrawalEngine {
    pub fn new(withdrawals: WithdrawalRepository, config: Config) -> Self {
        Self {
            withdrawals,
            config,
        }
    }

    /// Create a PENDING request, reserving the selected funds atomically.
    pub async fn create(&self, input: WithdrawalCreate) -> AppResult<WithdrawalRequest> {
        validate_required_text(&input.vendor_id, "vendor_id", MAX_NAME_LEN)?;
        validate_required_text(&input.destination, "destination", MAX_NAME_LEN)?;
        if input.fund_ids.is_empty() {
            return Err(AppError::Ledger(LedgerError::InvalidFundSelection(
                "no funds selected".to_string(),
            )));
        }

        // Normalize to full "earning_record:key" references and deduplicate
        let mut fund_ids: Vec<String> = Vec::with_capacity(input.fund_ids.len());
        for raw in &input.fund_ids {
            let full = parse_record_id("earning_record", raw)
                .map_err(|_| {
                    AppError::Ledger(LedgerError::InvalidFundSelection(format!(
                        "malformed fund id: {raw}"
                    )))
                })?
                .to_string();
            if !fund_ids.contains(&full) {
                fund_ids.push(full);
            }
        }

        // Alphanumeric key keeps the record id free of escape brackets
        let request_key = format!("wd{}", snowflake_id());
        let created = self
            .withdrawals
            .create(
                &request_key,
                &input.vendor_id,
                fund_ids,
                &input.destination,
                self.config.min_withdrawal_amount,
                now_millis(),
            )
            .await
            .map_err(|e| self.map_create_error(e, &input.vendor_id))?;

        tracing::info!(
            vendor_id = %input.vendor_id,
            request_id = %request_key,
            amount = created.amount,
            funds = created.fund_ids.len(),
            "Withdrawal request created"
        );
        Ok(created)
    }

    /// PENDING → APPROVED
    pub async fn approve(
        &self,
        request_id: &str,
        admin_notes: Option<String>,
    ) -> AppResult<WithdrawalRequest> {
        validate_optional_text(&admin_notes, "admin_notes", MAX_NOTE_LEN)?;
        let updated = self
            .withdrawals
            .approve(request_id, admin_notes, now_millis())
            .await
            .map_err(map_transition_error)?;
        tracing::info!(request_id = %request_id, "Withdrawal request approved");
        Ok(updated)
    }

    /// PENDING/APPROVED → REJECTED, funds released back to AVAILABLE
    pub async fn reject(&self, request_id: &str, reason: &str) -> AppResult<WithdrawalRequest> {
        validate_required_text(reason, "reason", MAX_NOTE_LEN)?;
        let updated = self
            .withdrawals
            .reject(request_id, reason, now_millis())
            .await
            .map_err(map_transition_error)?;
        tracing::info!(request_id = %request_id, reason = %reason, "Withdrawal request rejected");
        Ok(updated)
    }

    /// APPROVED → PROCESSED, funds marked WITHDRAWN, receipt stored
    pub async fn process(&self, request_id: &str, receipt: &str) -> AppResult<WithdrawalRequest> {
        validate_required_text(receipt, "receipt", MAX_NAME_LEN)?;
        let updated = self
            .withdrawals
            .process(request_id, receipt, now_millis())
            .await
            .map_err(map_transition_error)?;
        tracing::info!(
            request_id = %request_id,
            receipt = %receipt,
            amount = updated.amount,
            "Withdrawal request processed"
        );
        Ok(updated)
    }

    pub async fn get(&self, request_id: &str) -> AppResult<WithdrawalRequest> {
        Ok(self.withdrawals.get(request_id).await?)
    }

    pub async fn list_by_vendor(
        &self,
        vendor_id: &str,
        status: Option<WithdrawalStatus>,
    ) -> AppResult<Vec<WithdrawalRequest>> {
        Ok(self.withdrawals.list_by_vendor(vendor_id, status).await?)
    }

    pub async fn list_by_status(
        &self,
        status: WithdrawalStatus,
    ) -> AppResult<Vec<WithdrawalRequest>> {
        Ok(self.withdrawals.list_by_status(status).await?)
    }

    pub async fn list_page(
        &self,
        vendor_id: Option<String>,
        status: Option<WithdrawalStatus>,
        range: Option<(i64, i64)>,
        limit: u32,
        offset: u64,
    ) -> AppResult<(Vec<WithdrawalRequest>, u64)> {
        Ok(self
            .withdrawals
            .list_page(vendor_id, status, range, limit, offset)
            .await?)
    }

    fn map_create_error(&self, e: RepoError, vendor_id: &str) -> AppError {
        match e {
            RepoError::Guard(marker) if marker.starts_with(GUARD_PENDING_EXISTS) => {
                AppError::Ledger(LedgerError::AlreadyHasPendingRequest(vendor_id.to_string()))
            }
            RepoError::Guard(marker) if marker.starts_with(GUARD_FUND_CONFLICT) => {
                AppError::Ledger(LedgerError::InvalidFundSelection(
                    "one or more selected funds are not available to this vendor".to_string(),
                ))
            }
            RepoError::Guard(marker) if marker.starts_with(GUARD_BELOW_MINIMUM) => {
                // The cast inside the query may render floats with a type
                // suffix (e.g. "68f")
                let requested = marker
                    .split(':')
                    .nth(1)
                    .and_then(|v| v.trim_end_matches(['f', 'd']).parse::<f64>().ok())
                    .unwrap_or(0.0);
                AppError::Ledger(LedgerError::BelowMinimumAmount {
                    requested,
                    minimum: self.config.min_withdrawal_amount,
                })
            }
            // Unique open_slot index fired before the explicit check: a
            // concurrent create won the race
            RepoError::Duplicate(_) => {
                AppError::Ledger(LedgerError::AlreadyHasPendingRequest(vendor_id.to_string()))
            }
            other => AppError::from(other),
        }
    }
}

fn map_transition_error(e: RepoError) -> AppError {
    match e {
        RepoError::Guard(marker) if marker.starts_with(GUARD_INVALID_TRANSITION) => {
            AppError::Ledger(LedgerError::InvalidTransition(
                marker
                    .split_once(':')
                    .map(|(_, detail)| detail.to_string())
                    .unwrap_or_else(|| "request is not in the expected state".to_string()),
            ))
        }
        RepoError::Guard(marker) if marker.starts_with(GUARD_FUND_CONFLICT) => {
            AppError::Ledger(LedgerError::ConcurrencyConflict(
                "reserved funds changed underneath the request".to_string(),
            ))
        }
        other => AppError::from(other),
    }
}
