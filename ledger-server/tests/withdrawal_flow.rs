//! Withdrawal workflow: reservation atomicity, state machine, fund release
//! Run: cargo test -p ledger-server --test withdrawal_flow

mod common;

use common::*;
use ledger_server::utils::AppError;
use shared::LedgerError;
use shared::models::{EarningStatus, WithdrawalCreate, WithdrawalStatus};

fn create_input(vendor: &str, fund_ids: Vec<String>) -> WithdrawalCreate {
    WithdrawalCreate {
        vendor_id: vendor.to_string(),
        fund_ids,
        destination: "0712345678".to_string(),
    }
}

#[tokio::test]
async fn full_lifecycle_pending_approved_processed() {
    // 20% commission on 1,250 gross → 1,000 net; zero hold so both tranches
    // are selectable right away
    let state = state_with(|c| {
        c.commission_rate_percent = 20.0;
        c.hold_duration_hours = 0;
    })
    .await;

    let detail = place_order(&state, vec![line("v_a", "phone", 1_250.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    let fund_ids = deliver_and_recognize(&state, &sid).await;

    let request = state
        .engine
        .create(create_input("v_a", fund_ids.clone()))
        .await
        .unwrap();
    assert_eq!(request.status, WithdrawalStatus::Pending);
    assert!(request.status.is_open());
    assert_eq!(request.amount, 1_000.0);
    assert_eq!(request.fund_ids.len(), 2);

    // Reserved funds leave `available` but stay in `total_earned`
    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.available, 0.0);
    assert_eq!(balance.pending_withdrawals, 1_000.0);
    assert_eq!(balance.total_earned, 1_000.0);

    let request_id = request.id.as_ref().unwrap().to_string();
    let approved = state
        .engine
        .approve(&request_id, Some("looks good".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.status, WithdrawalStatus::Approved);
    assert!(approved.status.is_open());
    assert_eq!(approved.admin_notes.as_deref(), Some("looks good"));

    // Admin queue view picks the request up by status
    let queue = state
        .engine
        .list_by_status(WithdrawalStatus::Approved)
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);

    let processed = state.engine.process(&request_id, "MPX123").await.unwrap();
    assert_eq!(processed.status, WithdrawalStatus::Processed);
    assert!(processed.status.is_terminal());
    assert_eq!(processed.receipt.as_deref(), Some("MPX123"));
    assert!(processed.resolved_at.is_some());

    for fund_id in &fund_ids {
        let record = state.earnings.get(fund_id).await.unwrap();
        assert_eq!(record.status, EarningStatus::Withdrawn);
    }

    let after = state.balance.balance("v_a").await.unwrap();
    assert_eq!(after.available, 0.0);
    assert_eq!(after.pending_withdrawals, 0.0);
    assert_eq!(after.withdrawn, 1_000.0);
    assert_eq!(after.total_earned, 1_000.0);
}

#[tokio::test]
async fn rejection_releases_funds_exactly_once() {
    let state = state_with(|_| {}).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    let fund_ids = deliver_and_recognize(&state, &sid).await;
    let immediate = fund_ids[0].clone();

    let request = state
        .engine
        .create(create_input("v_a", vec![immediate.clone()]))
        .await
        .unwrap();
    let request_id = request.id.as_ref().unwrap().to_string();
    assert_eq!(request.amount, 6_800.0);

    let rejected = state
        .engine
        .reject(&request_id, "destination mismatch")
        .await
        .unwrap();
    assert_eq!(rejected.status, WithdrawalStatus::Rejected);
    assert!(rejected.status.is_terminal());
    assert_eq!(rejected.reject_reason.as_deref(), Some("destination mismatch"));

    // Fund is spendable again
    let record = state.earnings.get(&immediate).await.unwrap();
    assert_eq!(record.status, EarningStatus::Available);
    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.available, 6_800.0);
    assert_eq!(balance.pending_withdrawals, 0.0);

    // Terminal: a second reject must not double-release
    let err = state.engine.reject(&request_id, "again").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidTransition(_))
    ));
    let err = state.engine.process(&request_id, "MPX999").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidTransition(_))
    ));
}

#[tokio::test]
async fn below_minimum_aborts_without_reserving() {
    let state = state_with(|c| c.hold_duration_hours = 0).await;

    // 100 gross → 85 net → 68 immediate, under the 100 minimum
    let detail = place_order(&state, vec![line("v_a", "sticker", 100.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    let fund_ids = deliver_and_recognize(&state, &sid).await;
    let immediate = fund_ids[0].clone();

    let err = state
        .engine
        .create(create_input("v_a", vec![immediate.clone()]))
        .await
        .unwrap_err();
    match err {
        AppError::Ledger(LedgerError::BelowMinimumAmount { minimum, .. }) => {
            assert_eq!(minimum, 100.0);
        }
        other => panic!("expected BelowMinimumAmount, got {other:?}"),
    }

    // The whole transaction rolled back: no request, fund untouched
    let requests = state.engine.list_by_vendor("v_a", None).await.unwrap();
    assert!(requests.is_empty());
    let record = state.earnings.get(&immediate).await.unwrap();
    assert_eq!(record.status, EarningStatus::Available);
}

#[tokio::test]
async fn one_pending_request_per_vendor() {
    let state = state_with(|c| c.hold_duration_hours = 0).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    let fund_ids = deliver_and_recognize(&state, &sid).await;
    let (immediate, locked) = (fund_ids[0].clone(), fund_ids[1].clone());

    let first = state
        .engine
        .create(create_input("v_a", vec![immediate]))
        .await
        .unwrap();

    let err = state
        .engine
        .create(create_input("v_a", vec![locked.clone()]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::AlreadyHasPendingRequest(_))
    ));

    // APPROVED no longer blocks a new request
    let request_id = first.id.as_ref().unwrap().to_string();
    state.engine.approve(&request_id, None).await.unwrap();
    let second = state
        .engine
        .create(create_input("v_a", vec![locked]))
        .await
        .unwrap();
    assert_eq!(second.amount, 1_700.0);
}

#[tokio::test]
async fn rejects_foreign_unmatured_and_reserved_funds() {
    let state = state_with(|_| {}).await;

    let detail = place_order(
        &state,
        vec![line("v_a", "phone", 10_000.0, 1), line("v_b", "case", 2_000.0, 1)],
    )
    .await;
    let sub_a = detail.suborders.iter().find(|s| s.vendor_id == "v_a").unwrap();
    let sub_b = detail.suborders.iter().find(|s| s.vendor_id == "v_b").unwrap();
    let funds_a = deliver_and_recognize(&state, &suborder_id(sub_a)).await;
    let funds_b = deliver_and_recognize(&state, &suborder_id(sub_b)).await;

    // Another vendor's fund
    let err = state
        .engine
        .create(create_input("v_a", vec![funds_b[0].clone()]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidFundSelection(_))
    ));

    // Unmatured HOLD tranche (24h default hold)
    let err = state
        .engine
        .create(create_input("v_a", vec![funds_a[1].clone()]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidFundSelection(_))
    ));

    // Fund reserved by an approved request stays locked away
    let first = state
        .engine
        .create(create_input("v_a", vec![funds_a[0].clone()]))
        .await
        .unwrap();
    let request_id = first.id.as_ref().unwrap().to_string();
    state.engine.approve(&request_id, None).await.unwrap();
    let err = state
        .engine
        .create(create_input("v_a", vec![funds_a[0].clone()]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidFundSelection(_))
    ));
}

#[tokio::test]
async fn process_requires_approved_state() {
    let state = state_with(|_| {}).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    let fund_ids = deliver_and_recognize(&state, &sid).await;

    let request = state
        .engine
        .create(create_input("v_a", vec![fund_ids[0].clone()]))
        .await
        .unwrap();
    let request_id = request.id.as_ref().unwrap().to_string();

    let err = state.engine.process(&request_id, "MPX123").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::InvalidTransition(_))
    ));
}

#[tokio::test]
async fn concurrent_creates_never_double_reserve() {
    let state = state_with(|c| c.hold_duration_hours = 0).await;

    let detail = place_order(&state, vec![line("v_a", "phone", 10_000.0, 1)]).await;
    let sid = suborder_id(&detail.suborders[0]);
    let fund_ids = deliver_and_recognize(&state, &sid).await;

    let s1 = state.clone();
    let s2 = state.clone();
    let f1 = fund_ids.clone();
    let f2 = fund_ids.clone();
    let a = tokio::spawn(async move { s1.engine.create(create_input("v_a", f1)).await });
    let b = tokio::spawn(async move { s2.engine.create(create_input("v_a", f2)).await });
    let (ra, rb) = (a.await.unwrap(), b.await.unwrap());

    // At most one request exists; the funds were reserved exactly once
    let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert!(successes <= 1, "both concurrent creates succeeded");

    // The loser gets a business error (pending-request guard, fund conflict
    // or commit conflict), never a store-level 500
    for result in [ra, rb] {
        if let Err(err) = result {
            assert!(
                matches!(err, AppError::Ledger(_)),
                "race loser must surface a ledger error, got {err:?}"
            );
        }
    }

    let pending = state
        .engine
        .list_by_vendor("v_a", Some(WithdrawalStatus::Pending))
        .await
        .unwrap();
    assert!(pending.len() <= 1);

    let reserved_total: f64 = {
        let mut total = 0.0;
        for fund_id in &fund_ids {
            let record = state.earnings.get(fund_id).await.unwrap();
            if record.status == EarningStatus::Reserved {
                total += record.net_amount;
            }
        }
        total
    };
    if successes == 1 {
        assert_eq!(pending.len(), 1);
        assert_eq!(reserved_total, 8_500.0);
        assert_eq!(pending[0].amount, 8_500.0);
    } else {
        // Both lost to a commit conflict: nothing may be left reserved
        assert_eq!(reserved_total, 0.0);
    }

    // Conservation holds either way
    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.total_earned, 8_500.0);
}
