//! Suborder API Module
//!
//! 每供应商独立推进履约状态；进入 DELIVERED 时触发收益确认。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Suborder router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/suborders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::update_status))
}
