//! Earning record repository (收益记录持久化)
//!
//! Recognition writes go through a single `INSERT` so the record pair lands
//! atomically; the UNIQUE index on `recognition_key` is the idempotency
//! backstop against concurrent recognition of the same suborder.

use super::{count_of, sum_of, BaseRepository, CountRow, RepoError, RepoResult, SumRow};
use crate::db::models::EarningRecord;
use shared::models::EarningStatus;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

/// Per-vendor aggregate buckets over earning records
#[derive(Debug, Clone, Default)]
pub struct EarningBuckets {
    /// ORDER funds spendable right now (AVAILABLE + matured HOLD)
    pub available: f64,
    /// HOLD funds not yet matured
    pub locked: f64,
    pub withdrawn: f64,
    /// REFERRAL funds spendable right now
    pub referral: f64,
    /// Lifetime net across every status
    pub total_earned: f64,
}

#[derive(Clone)]
pub struct EarningRepository {
    base: BaseRepository,
}

impl EarningRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert one or more earning records atomically.
    ///
    /// A `recognition_key` collision maps to [`RepoError::Duplicate`].
    pub async fn insert_many(&self, records: Vec<EarningRecord>) -> RepoResult<Vec<EarningRecord>> {
        let mut result = self
            .base
            .db()
            .query("INSERT INTO earning_record $records")
            .bind(("records", records))
            .await?;
        let created: Vec<EarningRecord> = result.take(0)?;
        Ok(created)
    }

    /// List a vendor's records, newest first, optionally by stored status
    pub async fn list_by_vendor(
        &self,
        vendor_id: &str,
        status: Option<EarningStatus>,
    ) -> RepoResult<Vec<EarningRecord>> {
        let mut result = match status {
            Some(s) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM earning_record \
                         WHERE vendor_id = $vendor_id AND status = $status \
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
                        "SELECT * FROM earning_record WHERE vendor_id = $vendor_id \
                         ORDER BY created_at DESC",
                    )
                    .bind(("vendor_id", vendor_id.to_string()))
                    .await?
            }
        };
        Ok(result.take(0)?)
    }

    /// Paged earning history with optional status and created-at range filters
    pub async fn list_history(
        &self,
        vendor_id: &str,
        status: Option<EarningStatus>,
        range: Option<(i64, i64)>,
        limit: u32,
        offset: u64,
    ) -> RepoResult<(Vec<EarningRecord>, u64)> {
        let (start, end) = range.unwrap_or((0, i64::MAX));
        let sql = r#"
            SELECT * FROM earning_record
                WHERE vendor_id = $vendor_id
                  AND created_at >= $start AND created_at < $end
                  AND ($status = NONE OR status = $status)
                ORDER BY created_at DESC
                LIMIT $limit START $offset;
            SELECT count() AS total FROM earning_record
                WHERE vendor_id = $vendor_id
                  AND created_at >= $start AND created_at < $end
                  AND ($status = NONE OR status = $status)
                GROUP ALL;
        "#;
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("status", status))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?;
        let rows: Vec<EarningRecord> = result.take(0)?;
        let total = count_of(result.take::<Vec<CountRow>>(1)?);
        Ok((rows, total))
    }

    /// A vendor's referral bonus records, newest first
    pub async fn list_referrals(&self, vendor_id: &str) -> RepoResult<Vec<EarningRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM earning_record \
                 WHERE vendor_id = $vendor_id AND fund_type = 'REFERRAL' \
                 ORDER BY created_at DESC",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Records a vendor could include in a withdrawal right now:
    /// AVAILABLE, or HOLD whose `hold_until` has passed.
    pub async fn list_selectable(
        &self,
        vendor_id: &str,
        now: i64,
    ) -> RepoResult<Vec<EarningRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM earning_record \
                 WHERE vendor_id = $vendor_id \
                   AND (status = 'AVAILABLE' OR (status = 'HOLD' AND hold_until <= $now)) \
                 ORDER BY created_at",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("now", now))
            .await?;
        Ok(result.take(0)?)
    }

    /// Aggregate a vendor's funds into balance buckets.
    ///
    /// Maturity is evaluated lazily against `$now`, so a HOLD record counts
    /// as available the instant its hold expires even if no sweep ran.
    pub async fn buckets(&self, vendor_id: &str, now: i64) -> RepoResult<EarningBuckets> {
        let sql = r#"
            SELECT math::sum(net_amount) AS total FROM earning_record
                WHERE vendor_id = $vendor_id AND fund_type = 'ORDER'
                  AND (status = 'AVAILABLE' OR (status = 'HOLD' AND hold_until <= $now))
                GROUP ALL;
            SELECT math::sum(net_amount) AS total FROM earning_record
                WHERE vendor_id = $vendor_id AND status = 'HOLD' AND hold_until > $now
                GROUP ALL;
            SELECT math::sum(net_amount) AS total FROM earning_record
                WHERE vendor_id = $vendor_id AND status = 'WITHDRAWN'
                GROUP ALL;
            SELECT math::sum(net_amount) AS total FROM earning_record
                WHERE vendor_id = $vendor_id AND fund_type = 'REFERRAL' AND status = 'AVAILABLE'
                GROUP ALL;
            SELECT math::sum(net_amount) AS total FROM earning_record
                WHERE vendor_id = $vendor_id
                GROUP ALL;
        "#;

        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("now", now))
            .await?;

        Ok(EarningBuckets {
            available: sum_of(result.take::<Vec<SumRow>>(0)?),
            locked: sum_of(result.take::<Vec<SumRow>>(1)?),
            withdrawn: sum_of(result.take::<Vec<SumRow>>(2)?),
            referral: sum_of(result.take::<Vec<SumRow>>(3)?),
            total_earned: sum_of(result.take::<Vec<SumRow>>(4)?),
        })
    }

    /// Promote every matured HOLD record to AVAILABLE; returns how many moved
    pub async fn mature_holds(&self, now: i64) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE earning_record SET status = 'AVAILABLE', updated_at = $now \
                 WHERE status = 'HOLD' AND hold_until <= $now \
                 RETURN AFTER",
            )
            .bind(("now", now))
            .await?;
        let moved: Vec<EarningRecord> = result.take(0)?;
        Ok(moved.len())
    }

    pub async fn get(&self, record_id: &str) -> RepoResult<EarningRecord> {
        let rid = super::parse_record_id("earning_record", record_id)?;
        let row: Option<EarningRecord> = self.base.db().select(rid).await?;
        row.ok_or_else(|| RepoError::NotFound(format!("Earning record not found: {record_id}")))
    }
}
