//! Earnings API Module
//!
//! 履约协作方的收益确认回调入口。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Earnings router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/earnings/recognize/{suborder_id}",
        post(handler::recognize),
    )
}
