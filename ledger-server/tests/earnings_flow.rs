//! Order splitting, recognition and balance aggregation
//! Run: cargo test -p ledger-server --test earnings_flow

mod common;

use common::*;
use ledger_server::db::DbService;
use ledger_server::db::repository::RepoError;
use ledger_server::utils::AppError;
use shared::LedgerError;
use shared::models::{EarningStatus, FulfillmentStatus, OrderInput, ReleaseType};

#[tokio::test]
async fn multi_vendor_order_splits_and_settles() {
    let state = state_with(|_| {}).await;

    let detail = place_order(
        &state,
        vec![
            line("v_a", "phone", 10_000.0, 1),
            line("v_b", "case", 500.0, 2),
            line("v_a", "charger", 1_000.0, 1),
        ],
    )
    .await;

    assert_eq!(detail.order.vendor_count, 2);
    assert_eq!(detail.order.total_amount, 12_000.0);
    assert_eq!(detail.suborders.len(), 2);

    // Suborder gross amounts re-add to the order total
    let gross_sum: f64 = detail.suborders.iter().map(|s| s.gross_amount).sum();
    assert_eq!(gross_sum, detail.order.total_amount);

    // 15% commission per suborder
    let v_a = detail
        .suborders
        .iter()
        .find(|s| s.vendor_id == "v_a")
        .unwrap();
    assert_eq!(v_a.gross_amount, 11_000.0);
    assert_eq!(v_a.commission, 1_650.0);
    assert_eq!(v_a.net_amount, 9_350.0);
    assert_eq!(v_a.status, FulfillmentStatus::Pending);
}

#[tokio::test]
async fn rejects_order_with_untagged_line_item() {
    let state = state_with(|_| {}).await;

    let err = state
        .settlement
        .place_order(OrderInput {
            buyer_id: "buyer_1".to_string(),
            currency: "KES".to_string(),
            items: vec![line("v_a", "p1", 10.0, 1), line("", "p2", 10.0, 1)],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidOrderComposition(_))
    ));
}

#[tokio::test]
async fn delivery_recognition_creates_immediate_and_locked_tranches() {
    let state = state_with(|_| {}).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    deliver_and_recognize(&state, &sid).await;

    let records = state.earnings.list_by_vendor("v_a", None).await.unwrap();
    assert_eq!(records.len(), 2);

    let immediate = records
        .iter()
        .find(|r| r.release_type == ReleaseType::Immediate)
        .unwrap();
    assert_eq!(immediate.net_amount, 6_800.0);
    assert_eq!(immediate.status, EarningStatus::Available);
    assert_eq!(immediate.percentage, 80.0);
    assert!(immediate.hold_until.is_none());

    let locked = records
        .iter()
        .find(|r| r.release_type == ReleaseType::Locked)
        .unwrap();
    assert_eq!(locked.net_amount, 1_700.0);
    assert_eq!(locked.status, EarningStatus::Hold);
    assert!(locked.hold_until.unwrap() > shared::util::now_millis());

    // Both carry the same settlement snapshot
    assert_eq!(immediate.breakdown.vendor_earnings, 8_500.0);
    assert_eq!(immediate.breakdown.commission, 1_500.0);
    assert_eq!(immediate.breakdown, locked.breakdown);

    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.available, 6_800.0);
    assert_eq!(balance.locked, 1_700.0);
    assert_eq!(balance.total_earned, 8_500.0);
    assert_eq!(balance.net_available, balance.available);
    assert_eq!(balance.pending_withdrawals, 0.0);
}

#[tokio::test]
async fn duplicate_recognition_creates_no_extra_records() {
    let state = state_with(|_| {}).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    deliver_and_recognize(&state, &sid).await;

    let err = state.recognition.recognize(&sid).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::DuplicateEarningRecognition(_))
    ));

    let records = state.earnings.list_by_vendor("v_a", None).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn recognition_requires_delivered_suborder() {
    let state = state_with(|_| {}).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);

    let err = state.recognition.recognize(&sid).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidTransition(_))
    ));
}

#[tokio::test]
async fn fulfillment_cannot_skip_states() {
    let state = state_with(|_| {}).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 100.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);

    // PENDING → DELIVERED directly is illegal
    let err = state
        .suborders
        .transition(&sid, FulfillmentStatus::Delivered, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Guard(_)));

    // Terminal state stays terminal
    state
        .suborders
        .transition(&sid, FulfillmentStatus::Cancelled, None)
        .await
        .unwrap();
    let err = state
        .suborders
        .transition(&sid, FulfillmentStatus::Processing, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Guard(_)));
}

#[tokio::test]
async fn matured_holds_count_as_available_and_sweep_is_idempotent() {
    // Zero-hour hold: the locked tranche matures immediately
    let state = state_with(|c| c.hold_duration_hours = 0).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    deliver_and_recognize(&state, &sid).await;

    // Lazy maturation: reported available before any sweep ran
    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.available, 8_500.0);
    assert_eq!(balance.locked, 0.0);

    // Sweep promotes the stored status exactly once
    let moved = state
        .earnings
        .mature_holds(shared::util::now_millis())
        .await
        .unwrap();
    assert_eq!(moved, 1);
    let moved = state
        .earnings
        .mature_holds(shared::util::now_millis())
        .await
        .unwrap();
    assert_eq!(moved, 0);

    let available = state
        .earnings
        .list_by_vendor("v_a", Some(EarningStatus::Available))
        .await
        .unwrap();
    assert_eq!(available.len(), 2);

    // Balance unchanged by the sweep
    let after = state.balance.balance("v_a").await.unwrap();
    assert_eq!(after.available, 8_500.0);
    assert_eq!(after.total_earned, balance.total_earned);
}

#[tokio::test]
async fn rocksdb_bootstrap_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.db");
    let path_str = path.to_string_lossy().to_string();

    // Schema definition must survive a reopen
    {
        let _db = DbService::new(&path_str).await.unwrap();
    }
    let _db = DbService::new(&path_str).await.unwrap();
}
