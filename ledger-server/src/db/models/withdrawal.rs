//! Withdrawal request row (提现请求)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::WithdrawalStatus;
use surrealdb::RecordId;

pub type WithdrawalId = RecordId;

/// A vendor-initiated, admin-approved request to pay out reserved funds.
///
/// The referenced earning records are exclusively owned by this request
/// while it is PENDING or APPROVED.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<WithdrawalId>,

    /// 供应商引用
    pub vendor_id: String,

    /// 本请求消费的收益记录 ("earning_record:xxx")
    pub fund_ids: Vec<String>,

    /// 请求总额 = Σ 引用记录 net_amount (事务内计算)
    pub amount: f64,

    /// 支付目的地 (mobile-money 号码)
    pub destination: String,

    #[serde(default)]
    pub status: WithdrawalStatus,

    /// 管理员备注 (approve 时)
    pub admin_notes: Option<String>,

    /// 拒绝原因 (reject 时必填)
    pub reject_reason: Option<String>,

    /// 外部支付网关回执 (process 时写入)
    pub receipt: Option<String>,

    /// 单一待处理请求的 UNIQUE 槽位:
    /// PENDING 时 = vendor_id，离开 PENDING 后改为自身记录 ID
    pub open_slot: String,

    pub created_at: i64,
    pub updated_at: i64,

    /// 终态时间 (REJECTED / PROCESSED)
    pub resolved_at: Option<i64>,
}
