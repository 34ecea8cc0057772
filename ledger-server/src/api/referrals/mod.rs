//! Referral API Module
//!
//! 订阅计费协作方登记推荐奖励的入口。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Referral router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/referrals", post(handler::accrue))
}
