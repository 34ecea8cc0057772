//! Earnings Module
//!
//! 收益确认、余额聚合与锁定期成熟：
//!
//! - [`RecognitionService`] - 送达后生成收益记录 (80/20 分期)
//! - [`BalanceService`] - 按供应商聚合余额桶
//! - [`SweepTask`] - 后台将到期 HOLD 记录转为 AVAILABLE

pub mod balance;
pub mod recognition;
pub mod sweep;

pub use balance::BalanceService;
pub use recognition::RecognitionService;
pub use sweep::SweepTask;
