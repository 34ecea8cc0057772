//! Order repository (订单持久化)
//!
//! An order and its per-vendor suborders are written atomically; the order
//! itself is immutable after creation.

use super::{check_guarded, count_of, parse_record_id, BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{OrderDetail, OrderRow, SuborderRow};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist an order together with all of its suborders in one transaction.
    ///
    /// Record keys are pre-generated by the caller so the rows can be fetched
    /// back deterministically after commit.
    pub async fn create_with_suborders(
        &self,
        order_key: &str,
        order: &OrderRow,
        suborders: &[SuborderRow],
    ) -> RepoResult<OrderDetail> {
        let sql = r#"
            BEGIN TRANSACTION;
            CREATE type::thing('order', $order_key) CONTENT $order;
            INSERT INTO suborder $suborders;
            COMMIT TRANSACTION;
        "#;

        let response = self
            .base
            .db()
            .query(sql)
            .bind(("order_key", order_key.to_string()))
            .bind(("order", order.clone()))
            .bind(("suborders", suborders.to_vec()))
            .await?;
        check_guarded(response)?;

        self.get_detail(order_key).await
    }

    /// Fetch an order with its suborders
    pub async fn get_detail(&self, order_id: &str) -> RepoResult<OrderDetail> {
        let rid = parse_record_id("order", order_id)?;
        let order_ref = rid.to_string();

        let order: Option<OrderRow> = self.base.db().select(rid).await?;
        let order =
            order.ok_or_else(|| RepoError::NotFound(format!("Order not found: {order_id}")))?;

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM suborder WHERE order_id = $order_ref ORDER BY vendor_id")
            .bind(("order_ref", order_ref))
            .await?;
        let suborders: Vec<SuborderRow> = result.take(0)?;

        Ok(OrderDetail { order, suborders })
    }

    /// Paged order listing with an optional created-at range (millis, half-open)
    pub async fn list_page(
        &self,
        range: Option<(i64, i64)>,
        limit: u32,
        offset: u64,
    ) -> RepoResult<(Vec<OrderRow>, u64)> {
        let (start, end) = range.unwrap_or((0, i64::MAX));
        let sql = r#"
            SELECT * FROM order
                WHERE created_at >= $start AND created_at < $end
                ORDER BY created_at DESC
                LIMIT $limit START $offset;
            SELECT count() AS total FROM order
                WHERE created_at >= $start AND created_at < $end
                GROUP ALL;
        "#;
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("start", start))
            .bind(("end", end))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?;
        let rows: Vec<OrderRow> = result.take(0)?;
        let total = count_of(result.take::<Vec<CountRow>>(1)?);
        Ok((rows, total))
    }
}
