//! Shared fixtures for integration tests (in-memory SurrealDB)
#![allow(dead_code)]

use ledger_server::core::{Config, ServerState};
use ledger_server::db::models::{OrderDetail, SuborderRow};
use shared::models::{FulfillmentStatus, LineItemInput, OrderInput};

/// Build an in-memory server state with the background sweep disabled and
/// test-specific config tweaks applied on top of the env defaults.
pub async fn state_with(configure: impl FnOnce(&mut Config)) -> ServerState {
    let mut config = Config::from_env();
    config.sweep_interval_secs = 0;
    configure(&mut config);
    ServerState::memory(config).await.expect("in-memory state")
}

pub fn line(vendor: &str, product: &str, price: f64, quantity: i32) -> LineItemInput {
    LineItemInput {
        vendor_id: vendor.to_string(),
        product_id: product.to_string(),
        name: product.to_string(),
        price,
        quantity,
    }
}

pub async fn place_order(state: &ServerState, items: Vec<LineItemInput>) -> OrderDetail {
    state
        .settlement
        .place_order(OrderInput {
            buyer_id: "buyer_1".to_string(),
            currency: "KES".to_string(),
            items,
        })
        .await
        .expect("order placement")
}

/// Record id of a persisted suborder as a "suborder:key" string
pub fn suborder_id(row: &SuborderRow) -> String {
    row.id.as_ref().expect("persisted suborder has id").to_string()
}

/// Walk a suborder through the fulfillment chain to DELIVERED
pub async fn deliver(state: &ServerState, suborder_id: &str) {
    use FulfillmentStatus::*;
    for status in [Processing, Shipped, Delivered] {
        state
            .suborders
            .transition(suborder_id, status, None)
            .await
            .expect("fulfillment transition");
    }
}

/// Deliver and recognize earnings, returning the created record ids
pub async fn deliver_and_recognize(state: &ServerState, suborder_id: &str) -> Vec<String> {
    deliver(state, suborder_id).await;
    state
        .recognition
        .recognize(suborder_id)
        .await
        .expect("recognition")
        .into_iter()
        .map(|r| r.id.expect("persisted record has id").to_string())
        .collect()
}
