//! Vendor API Module
//!
//! 供应商视角的只读查询：余额、收益历史、可选资金、推荐奖励。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Vendor router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vendors", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{vendor_id}/balance", get(handler::balance))
        .route("/{vendor_id}/earnings", get(handler::earnings))
        .route("/{vendor_id}/funds/selectable", get(handler::selectable_funds))
        .route("/{vendor_id}/referrals", get(handler::referrals))
}
