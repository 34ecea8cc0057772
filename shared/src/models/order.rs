//! Order & Suborder wire types (多供应商订单)

use serde::{Deserialize, Serialize};

/// Per-vendor fulfillment status of a suborder
///
/// Each vendor fulfills their slice of the order independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for FulfillmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl FulfillmentStatus {
    /// Forward transitions allowed from this state.
    ///
    /// Delivered 和 Cancelled 是终态。
    pub fn can_transition_to(self, next: FulfillmentStatus) -> bool {
        use FulfillmentStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
                | (Shipped, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FulfillmentStatus::Pending => "PENDING",
            FulfillmentStatus::Processing => "PROCESSING",
            FulfillmentStatus::Shipped => "SHIPPED",
            FulfillmentStatus::Delivered => "DELIVERED",
            FulfillmentStatus::Cancelled => "CANCELLED",
        }
    }
}

/// One line item of an incoming order, tagged with its vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    /// 供应商 ID (必填，缺失的行在拆单前被拒绝)
    #[serde(default)]
    pub vendor_id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// One line of a vendor's suborder, with its computed line total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuborderItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Place-order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInput {
    pub buyer_id: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub items: Vec<LineItemInput>,
}

fn default_currency() -> String {
    "KES".to_string()
}

/// Fulfillment transition payload (per suborder)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuborderStatusUpdate {
    pub status: FulfillmentStatus,
    /// 配送员引用 (可选)
    pub delivery_agent_id: Option<String>,
}
