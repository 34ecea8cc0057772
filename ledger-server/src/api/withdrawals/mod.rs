//! Withdrawal API Module
//!
//! 供应商发起、管理员审批的提现工作流。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Withdrawal router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/withdrawals", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/process", post(handler::process))
}
