//! Domain DTOs shared between the ledger server and its consumers

pub mod earning;
pub mod order;
pub mod referral;
pub mod withdrawal;

pub use earning::{BalanceSummary, EarningBreakdown, EarningStatus, FundType, ReleaseType};
pub use order::{FulfillmentStatus, LineItemInput, OrderInput, SuborderItem, SuborderStatusUpdate};
pub use referral::ReferralAccrue;
pub use withdrawal::{
    WithdrawalApprove, WithdrawalCreate, WithdrawalProcess, WithdrawalReject, WithdrawalStatus,
};
