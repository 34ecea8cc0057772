//! Earning record wire types (收益记录)
//!
//! An earning record is the atomic, individually reservable unit of vendor
//! money. Records are created by the recognition step and only ever move
//! forward: AVAILABLE → RESERVED → WITHDRAWN, with HOLD as a time-locked
//! entry state for the deferred-release portion.

use serde::{Deserialize, Serialize};

/// Withdrawal status of an earning record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EarningStatus {
    /// Not yet releasable (kept for contract compatibility; records are
    /// persisted directly as AVAILABLE or HOLD)
    Pending,
    /// Selectable for withdrawal
    Available,
    /// Time-locked until `hold_until` passes
    Hold,
    /// Referenced by an open withdrawal request
    Reserved,
    /// Paid out — terminal
    Withdrawn,
}

impl Default for EarningStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Which pool an earning record belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundType {
    /// Proceeds from a delivered suborder
    Order,
    /// Referral bonus on a referred vendor's subscription payment
    Referral,
}

/// Release schedule slot of a record within its suborder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseType {
    /// Released at recognition time
    Immediate,
    /// Time-locked, matures after the hold window
    Locked,
}

/// Audit snapshot of how a suborder's money was carved up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarningBreakdown {
    pub total_amount: f64,
    pub commission: f64,
    pub vendor_earnings: f64,
    pub immediate_release: f64,
    pub remaining_locked: f64,
}

/// Derived per-vendor balance summary — never stored, always recomputed
///
/// `available` already excludes reserved funds; `net_available` restates it
/// for the disbursement collaborator's contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub available: f64,
    pub locked: f64,
    pub pending_withdrawals: f64,
    pub withdrawn: f64,
    pub referral: f64,
    pub net_available: f64,
    pub total_earned: f64,
}
