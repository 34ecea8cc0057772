//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{OrderDetail, OrderRow};
use crate::utils::AppResult;
use crate::utils::time;
use shared::PaginatedResponse;
use shared::models::OrderInput;
use shared::response::page_offset;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// POST /api/orders - 下单 (拆单 + 佣金结算)
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<OrderInput>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.settlement.place_order(input).await?;
    Ok(Json(detail))
}

/// GET /api/orders/:id - 订单详情 (含子订单)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.orders.get_detail(&id).await?;
    Ok(Json(detail))
}

/// GET /api/orders - 订单分页列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<OrderRow>>> {
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

    let (rows, total) = state.orders.list_page(range, limit, offset).await?;
    Ok(Json(PaginatedResponse::new(rows, total, page, limit)))
}
