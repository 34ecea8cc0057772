//! Referral bonus accrual and withdrawal of referral funds
//! Run: cargo test -p ledger-server --test referral_flow

mod common;

use common::*;
use ledger_server::utils::AppError;
use shared::LedgerError;
use shared::models::{EarningStatus, FundType, ReferralAccrue, WithdrawalCreate};

fn accrual(referrer: &str, payment_amount: f64, payment_ref: Option<&str>) -> ReferralAccrue {
    ReferralAccrue {
        referrer_id: referrer.to_string(),
        referred_id: "v_new".to_string(),
        payment_amount,
        payment_ref: payment_ref.map(str::to_string),
    }
}

#[tokio::test]
async fn accrues_configured_share_of_payment() {
    let state = state_with(|_| {}).await;

    let record = state
        .referrals
        .accrue(accrual("v_a", 1_000.0, Some("pay_001")))
        .await
        .unwrap();

    // 20% of the referred vendor's payment, available immediately
    assert_eq!(record.net_amount, 200.0);
    assert_eq!(record.fund_type, FundType::Referral);
    assert_eq!(record.status, EarningStatus::Available);
    assert!(record.hold_until.is_none());
    assert_eq!(record.breakdown.total_amount, 1_000.0);
    assert_eq!(record.breakdown.commission, 0.0);

    // Referral money sits in its own bucket, never under `available`
    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.referral, 200.0);
    assert_eq!(balance.available, 0.0);
    assert_eq!(balance.total_earned, 200.0);
}

#[tokio::test]
async fn payment_ref_makes_accrual_idempotent() {
    let state = state_with(|_| {}).await;

    state
        .referrals
        .accrue(accrual("v_a", 1_000.0, Some("pay_001")))
        .await
        .unwrap();
    let err = state
        .referrals
        .accrue(accrual("v_a", 1_000.0, Some("pay_001")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::DuplicateEarningRecognition(_))
    ));

    let records = state.referrals.list("v_a").await.unwrap();
    assert_eq!(records.len(), 1);

    // Without a reference each accrual stands on its own
    state.referrals.accrue(accrual("v_a", 500.0, None)).await.unwrap();
    state.referrals.accrue(accrual("v_a", 500.0, None)).await.unwrap();
    let records = state.referrals.list("v_a").await.unwrap();
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn rejects_self_referral_and_bad_amounts() {
    let state = state_with(|_| {}).await;

    let mut input = accrual("v_new", 1_000.0, None);
    input.referred_id = "v_new".to_string();
    assert!(state.referrals.accrue(input).await.is_err());

    assert!(state.referrals.accrue(accrual("v_a", 0.0, None)).await.is_err());
    assert!(state.referrals.accrue(accrual("v_a", -10.0, None)).await.is_err());
    assert!(state.referrals.accrue(accrual("v_a", f64::NAN, None)).await.is_err());
}

#[tokio::test]
async fn referral_funds_are_withdrawable() {
    let state = state_with(|_| {}).await;

    let record = state
        .referrals
        .accrue(accrual("v_a", 1_000.0, Some("pay_001")))
        .await
        .unwrap();
    let fund_id = record.id.as_ref().unwrap().to_string();

    let request = state
        .engine
        .create(WithdrawalCreate {
            vendor_id: "v_a".to_string(),
            fund_ids: vec![fund_id.clone()],
            destination: "0712345678".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(request.amount, 200.0);

    // Reserved referral money leaves the referral bucket
    let balance = state.balance.balance("v_a").await.unwrap();
    assert_eq!(balance.referral, 0.0);
    assert_eq!(balance.pending_withdrawals, 200.0);
    assert_eq!(balance.total_earned, 200.0);

    let request_id = request.id.as_ref().unwrap().to_string();
    state.engine.approve(&request_id, None).await.unwrap();
    state.engine.process(&request_id, "MPX777").await.unwrap();

    let record = state.earnings.get(&fund_id).await.unwrap();
    assert_eq!(record.status, EarningStatus::Withdrawn);
    let after = state.balance.balance("v_a").await.unwrap();
    assert_eq!(after.withdrawn, 200.0);
}
