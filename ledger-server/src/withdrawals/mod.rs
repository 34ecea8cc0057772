//! Withdrawals Module
//!
//! 提现工作流引擎：PENDING → APPROVED → PROCESSED，
//! PENDING/APPROVED → REJECTED (终态)。

pub mod engine;

pub use engine::WithdrawalEngine;
