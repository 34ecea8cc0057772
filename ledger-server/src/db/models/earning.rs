//! Earning record row (收益记录)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{EarningBreakdown, EarningStatus, FundType, ReleaseType};
use surrealdb::RecordId;

pub type EarningId = RecordId;

/// The atomic, individually reservable unit of vendor money.
///
/// Status only moves forward; the one exception is the release-back of a
/// RESERVED record to AVAILABLE when its withdrawal request is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningRecord {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<EarningId>,

    /// 供应商引用
    pub vendor_id: String,

    /// 来源订单 ("order:xxx"，推荐奖励无)
    pub order_id: Option<String>,

    /// 来源子订单 ("suborder:xxx"，推荐奖励无)
    pub suborder_id: Option<String>,

    pub fund_type: FundType,
    pub release_type: ReleaseType,

    pub gross_amount: f64,
    pub commission: f64,

    /// 可提现净额
    pub net_amount: f64,

    #[serde(default)]
    pub status: EarningStatus,

    /// 本条记录占子订单净额的百分比 (80 / 20 / 推荐奖励 100)
    pub percentage: f64,

    pub is_immediate_release: bool,

    /// HOLD 记录的成熟时间；`hold_until <= now` 即视为可提现
    pub hold_until: Option<i64>,

    /// 拆分快照 (审计/展示用)
    pub breakdown: EarningBreakdown,

    /// 幂等键 — UNIQUE 索引:
    /// 订单收益 "rec:{suborder}:{release_type}"，推荐奖励 "ref:{payment_ref}"
    pub recognition_key: String,

    /// 推荐奖励的计费侧支付引用
    pub payment_ref: Option<String>,

    /// 收益确认时间
    pub scheduled_at: i64,

    pub created_at: i64,
    pub updated_at: i64,
}
