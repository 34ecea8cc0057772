//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::EarningRecord;
use crate::utils::AppResult;
use crate::utils::time;
use shared::PaginatedResponse;
use shared::models::{BalanceSummary, EarningStatus};
use shared::response::page_offset;
use shared::util::now_millis;

/// Query params for earning history
#[derive(Debug, Deserialize)]
pub struct EarningsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<EarningStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// GET /api/vendors/:vendor_id/balance - 余额汇总
pub async fn balance(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<BalanceSummary>> {
    let summary = state.balance.balance(&vendor_id).await?;
    Ok(Json(summary))
}

/// GET /api/vendors/:vendor_id/earnings - 收益历史 (分页 + 过滤)
pub async fn earnings(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
    Query(query): Query<EarningsQuery>,
) -> AppResult<Json<PaginatedResponse<EarningRecord>>> {
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
        .earnings
        .list_history(&vendor_id, query.status, range, limit, offset)
        .await?;
    Ok(Json(PaginatedResponse::new(rows, total, page, limit)))
}

/// GET /api/vendors/:vendor_id/funds/selectable - 当前可加入提现的资金
pub async fn selectable_funds(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<Vec<EarningRecord>>> {
    let rows = state
        .earnings
        .list_selectable(&vendor_id, now_millis())
        .await?;
    Ok(Json(rows))
}

/// GET /api/vendors/:vendor_id/referrals - 推荐奖励记录
pub async fn referrals(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<Vec<EarningRecord>>> {
    let rows = state.referrals.list(&vendor_id).await?;
    Ok(Json(rows))
}
