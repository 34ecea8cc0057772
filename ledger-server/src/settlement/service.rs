//! Order placement (下单编排)
//!
//! Splits the incoming order, settles per-vendor commission, and persists the
//! order with its suborders atomically.

use crate::core::Config;
use crate::db::models::{OrderDetail, OrderRow, SuborderRow};
use crate::db::repository::OrderRepository;
use crate::settlement::money::{to_decimal, to_f64};
use crate::settlement::{split_order, take_commission};
use crate::utils::AppResult;
use shared::models::{FulfillmentStatus, OrderInput};
use shared::util::{now_millis, snowflake_id};

#[derive(Clone)]
pub struct SettlementService {
    orders: OrderRepository,
    config: Config,
}

impl SettlementService {
    pub fn new(orders: OrderRepository, config: Config) -> Self {
        Self { orders, config }
    }

    /// Place a multi-vendor order: split, settle, persist.
    pub async fn place_order(&self, input: OrderInput) -> AppResult<OrderDetail> {
        let drafts = split_order(&input)?;
        let now = now_millis();

        // Alphanumeric key keeps the record id free of escape brackets
        let order_key = format!("ord{}", snowflake_id());
        let order_ref = format!("order:{order_key}");

        let mut total = rust_decimal::Decimal::ZERO;
        let mut suborders = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            total += to_decimal(draft.gross_amount);
            let split = take_commission(draft.gross_amount, self.config.commission_rate_percent);
            suborders.push(SuborderRow {
                id: None,
                order_id: order_ref.clone(),
                vendor_id: draft.vendor_id.clone(),
                items: draft.items.clone(),
                gross_amount: split.gross_amount,
                commission: split.commission,
                net_amount: split.net_amount,
                status: FulfillmentStatus::Pending,
                delivery_agent_id: None,
                delivered_at: None,
                created_at: now,
                updated_at: now,
            });
        }

        let order = OrderRow {
            id: None,
            buyer_id: input.buyer_id.clone(),
            currency: input.currency.clone(),
            total_amount: to_f64(total),
            vendor_count: drafts.len() as i32,
            created_at: now,
        };

        let detail = self
            .orders
            .create_with_suborders(&order_key, &order, &suborders)
            .await?;

        tracing::info!(
            order_id = %order_ref,
            buyer_id = %input.buyer_id,
            vendors = drafts.len(),
            total = order.total_amount,
            "Order placed"
        );
        Ok(detail)
    }
}
