//! Suborder API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::SuborderRow;
use crate::db::repository::{RepoError, GUARD_INVALID_TRANSITION};
use crate::utils::{AppError, AppResult};
use shared::LedgerError;
use shared::models::{FulfillmentStatus, SuborderStatusUpdate};

/// Query params for listing suborders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub vendor_id: String,
    pub status: Option<FulfillmentStatus>,
}

/// GET /api/suborders?vendor_id=... - 供应商子订单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SuborderRow>>> {
    let rows = state
        .suborders
        .list_by_vendor(&query.vendor_id, query.status)
        .await?;
    Ok(Json(rows))
}

/// GET /api/suborders/:id - 子订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SuborderRow>> {
    let row = state.suborders.get(&id).await?;
    Ok(Json(row))
}

/// POST /api/suborders/:id/status - 履约状态推进
///
/// 进入 DELIVERED 时自动触发收益确认；确认本身幂等，
/// 重复触发不会产生额外记录。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(update): Json<SuborderStatusUpdate>,
) -> AppResult<Json<SuborderRow>> {
    let row = state
        .suborders
        .transition(&id, update.status, update.delivery_agent_id)
        .await
        .map_err(map_transition_error)?;

    if update.status == FulfillmentStatus::Delivered {
        match state.recognition.recognize(&id).await {
            Ok(_) => {}
            // Already recognized (e.g. an earlier delivery attempt got through)
            Err(AppError::Ledger(LedgerError::DuplicateEarningRecognition(_))) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(Json(row))
}

fn map_transition_error(e: RepoError) -> AppError {
    match e {
        RepoError::Guard(marker) if marker.starts_with(GUARD_INVALID_TRANSITION) => {
            let detail = marker
                .split_once(':')
                .map(|(_, d)| d.to_string())
                .unwrap_or_else(|| "illegal fulfillment transition".to_string());
            if detail.contains("concurrent") {
                AppError::Ledger(LedgerError::ConcurrencyConflict(detail))
            } else {
                AppError::Ledger(LedgerError::InvalidTransition(detail))
            }
        }
        other => AppError::from(other),
    }
}
