//! Withdrawal API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::WithdrawalRequest;
use crate::utils::AppResult;
use crate::utils::time;
use shared::PaginatedResponse;
use shared::response::page_offset;
use shared::models::{
    WithdrawalApprove, WithdrawalCreate, WithdrawalProcess, WithdrawalReject, WithdrawalStatus,
};

/// Query params for the admin queue / vendor history
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub vendor_id: Option<String>,
    pub status: Option<WithdrawalStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// POST /api/withdrawals - 发起提现请求
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<WithdrawalCreate>,
) -> AppResult<Json<WithdrawalRequest>> {
    let request = state.engine.create(input).await?;
    Ok(Json(request))
}

/// GET /api/withdrawals - 请求分页列表 (供应商 / 状态 / 日期过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<WithdrawalRequest>>> {
    let range = match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            let start_date = time::parse_date(start)?;
            let end_date = time::parse_date(end)?;
            Some((
                time::day_start_millis(start_date),
                time::day_end_millis(end_date),
            ))
        }
        _ => None,
    };

    let limit = query.limit.clamp(1, 200);
    let page = query.page.max(1);
    let offset = page_offset(page, limit);

    let (rows, total) = state
        .engine
        .list_page(query.vendor_id, query.status, range, limit, offset)
        .await?;
    Ok(Json(PaginatedResponse::new(rows, total, page, limit)))
}

/// GET /api/withdrawals/:id - 请求详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<WithdrawalRequest>> {
    let request = state.engine.get(&id).await?;
    Ok(Json(request))
}

/// POST /api/withdrawals/:id/approve - 审批通过 (PENDING → APPROVED)
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<WithdrawalApprove>,
) -> AppResult<Json<WithdrawalRequest>> {
    let request = state.engine.approve(&id, input.admin_notes).await?;
    Ok(Json(request))
}

/// POST /api/withdrawals/:id/reject - 拒绝并释放资金
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<WithdrawalReject>,
) -> AppResult<Json<WithdrawalRequest>> {
    let request = state.engine.reject(&id, &input.reason).await?;
    Ok(Json(request))
}

/// POST /api/withdrawals/:id/process - 支付完成 (APPROVED → PROCESSED)
pub async fn process(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<WithdrawalProcess>,
) -> AppResult<Json<WithdrawalRequest>> {
    let request = state.engine.process(&id, &input.receipt).await?;
    Ok(Json(request))
}
