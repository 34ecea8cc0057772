//! Order & Suborder rows (多供应商订单)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{FulfillmentStatus, SuborderItem};
use surrealdb::RecordId;

pub type OrderId = RecordId;
pub type SuborderId = RecordId;

/// Order row — immutable once placed; per-vendor state lives on suborders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<OrderId>,

    /// 买家引用 (外部身份服务)
    pub buyer_id: String,

    pub currency: String,

    /// 订单总额 = Σ 子订单 gross_amount
    pub total_amount: f64,

    /// 参与供应商数量
    pub vendor_count: i32,

    /// 创建时间 (Unix millis)
    pub created_at: i64,
}

/// Suborder row — one vendor's slice of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuborderRow {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<SuborderId>,

    /// 所属订单 ("order:xxx")
    pub order_id: String,

    /// 供应商引用 (外部身份服务)
    pub vendor_id: String,

    pub items: Vec<SuborderItem>,

    /// 毛额 = Σ line_total
    pub gross_amount: f64,

    /// 平台佣金
    pub commission: f64,

    /// 净额 = gross - commission (收益确认的基数)
    pub net_amount: f64,

    /// 履约状态 (每个供应商独立)
    #[serde(default)]
    pub status: FulfillmentStatus,

    /// 配送员引用 (可选)
    pub delivery_agent_id: Option<String>,

    /// 送达时间 (进入 DELIVERED 时写入)
    pub delivered_at: Option<i64>,

    pub created_at: i64,
    pub updated_at: i64,
}

/// Order with its suborders (read model)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderRow,
    pub suborders: Vec<SuborderRow>,
}
