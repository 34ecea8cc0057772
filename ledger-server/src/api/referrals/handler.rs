//! Referral API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::EarningRecord;
use crate::utils::AppResult;
use shared::models::ReferralAccrue;

/// POST /api/referrals - 推荐奖励登记 (payment_ref 幂等)
pub async fn accrue(
    State(state): State<ServerState>,
    Json(input): Json<ReferralAccrue>,
) -> AppResult<Json<EarningRecord>> {
    let record = state.referrals.accrue(input).await?;
    Ok(Json(record))
}
