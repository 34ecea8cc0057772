//! Order splitting (拆单)
//!
//! Groups an incoming order's line items by vendor and computes per-vendor
//! gross amounts. Rejects malformed orders before anything is persisted.

use super::money::{line_total, to_decimal, to_f64, validate_price, validate_quantity};
use rust_decimal::Decimal;
use shared::models::{LineItemInput, OrderInput, SuborderItem};
use shared::LedgerError;

/// One vendor's slice of an order, before persistence
#[derive(Debug, Clone, PartialEq)]
pub struct SuborderDraft {
    pub vendor_id: String,
    pub items: Vec<SuborderItem>,
    /// 毛额 = Σ line_total
    pub gross_amount: f64,
}

/// Split an order into per-vendor drafts.
///
/// Vendor order follows first appearance in the item list, so splitting is
/// deterministic for a given input.
pub fn split_order(input: &OrderInput) -> Result<Vec<SuborderDraft>, LedgerError> {
    if input.buyer_id.trim().is_empty() {
        return Err(LedgerError::InvalidOrderComposition(
            "buyer_id is required".to_string(),
        ));
    }
    if input.items.is_empty() {
        return Err(LedgerError::InvalidOrderComposition(
            "order has no line items".to_string(),
        ));
    }

    let mut drafts: Vec<(String, Vec<SuborderItem>, Decimal)> = Vec::new();

    for (idx, item) in input.items.iter().enumerate() {
        validate_line_item(idx, item)?;

        let total = line_total(item.price, item.quantity);
        let suborder_item = SuborderItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            line_total: total,
        };

        match drafts.iter_mut().find(|(v, _, _)| v == &item.vendor_id) {
            Some((_, items, gross)) => {
                items.push(suborder_item);
                *gross += to_decimal(total);
            }
            None => {
                drafts.push((item.vendor_id.clone(), vec![suborder_item], to_decimal(total)));
            }
        }
    }

    Ok(drafts
        .into_iter()
        .map(|(vendor_id, items, gross)| SuborderDraft {
            vendor_id,
            items,
            gross_amount: to_f64(gross),
        })
        .collect())
}

fn validate_line_item(idx: usize, item: &LineItemInput) -> Result<(), LedgerError> {
    if item.vendor_id.trim().is_empty() {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "line item {idx} has no vendor_id"
        )));
    }
    if item.product_id.trim().is_empty() {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "line item {idx} has no product_id"
        )));
    }
    validate_price(item.price)?;
    validate_quantity(item.quantity)?;
    Ok(())
}
