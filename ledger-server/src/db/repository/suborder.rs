//! Suborder repository (子订单持久化)

use super::{parse_record_id, BaseRepository, RepoError, RepoResult, GUARD_INVALID_TRANSITION};
use crate::db::models::SuborderRow;
use shared::models::FulfillmentStatus;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

#[derive(Clone)]
pub struct SuborderRepository {
    base: BaseRepository,
}

impl SuborderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn get(&self, suborder_id: &str) -> RepoResult<SuborderRow> {
        let rid = parse_record_id("suborder", suborder_id)?;
        let row: Option<SuborderRow> = self.base.db().select(rid).await?;
        row.ok_or_else(|| RepoError::NotFound(format!("Suborder not found: {suborder_id}")))
    }

    /// List a vendor's suborders, optionally filtered by fulfillment status
    pub async fn list_by_vendor(
        &self,
        vendor_id: &str,
        status: Option<FulfillmentStatus>,
    ) -> RepoResult<Vec<SuborderRow>> {
        let mut result = match status {
            Some(s) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM suborder WHERE vendor_id = $vendor_id AND status = $status \
                         ORDER BY created_at DESC",
                    )
                    .bind(("vendor_id", vendor_id.to_string()))
                    .bind(("status", s))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM suborder WHERE vendor_id = $vendor_id \
                         ORDER BY created_at DESC",
                    )
                    .bind(("vendor_id", vendor_id.to_string()))
                    .await?
            }
        };
        Ok(result.take(0)?)
    }

    /// Advance a suborder's fulfillment status.
    ///
    /// The legal-transition check runs in Rust against the row we read; the
    /// conditional UPDATE re-checks the expected status so a concurrent writer
    /// loses cleanly instead of double-applying.
    pub async fn transition(
        &self,
        suborder_id: &str,
        to: FulfillmentStatus,
        delivery_agent_id: Option<String>,
    ) -> RepoResult<SuborderRow> {
        let current = self.get(suborder_id).await?;
        if !current.status.can_transition_to(to) {
            return Err(RepoError::Guard(format!(
                "{GUARD_INVALID_TRANSITION}:{}->{}",
                current.status.as_str(),
                to.as_str()
            )));
        }

        let rid = parse_record_id("suborder", suborder_id)?;
        let now = now_millis();
        let delivered_at = (to == FulfillmentStatus::Delivered).then_some(now);

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $rid SET \
                     status = $to, \
                     updated_at = $now, \
                     delivery_agent_id = $agent ?? delivery_agent_id, \
                     delivered_at = $delivered_at ?? delivered_at \
                 WHERE status = $expected \
                 RETURN AFTER",
            )
            .bind(("rid", rid))
            .bind(("to", to))
            .bind(("expected", current.status))
            .bind(("now", now))
            .bind(("agent", delivery_agent_id))
            .bind(("delivered_at", delivered_at))
            .await?;
        let updated: Vec<SuborderRow> = result.take(0)?;

        updated.into_iter().next().ok_or_else(|| {
            RepoError::Guard(format!(
                "{GUARD_INVALID_TRANSITION}:concurrent update on {suborder_id}"
            ))
        })
    }
}
