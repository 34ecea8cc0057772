//! Earnings API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::EarningRecord;
use crate::utils::AppResult;

/// POST /api/earnings/recognize/:suborder_id - 收益确认 (幂等)
pub async fn recognize(
    State(state): State<ServerState>,
    Path(suborder_id): Path<String>,
) -> AppResult<Json<Vec<EarningRecord>>> {
    let records = state.recognition.recognize(&suborder_id).await?;
    Ok(Json(records))
}
