//! Withdrawal request repository (提现请求持久化)
//!
//! Every state change runs as one SurrealQL transaction so fund reservation
//! and request status can never diverge. Race outcomes are deterministic:
//! the conditional UPDATEs re-check status, and a mismatch aborts the whole
//! transaction with a guard marker.

use super::{
    check_guarded, count_of, parse_record_id, sum_of, BaseRepository, CountRow, RepoError,
    RepoResult, SumRow, GUARD_INVALID_TRANSITION,
};
use crate::db::models::WithdrawalRequest;
use shared::models::WithdrawalStatus;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

#[derive(Clone)]
pub struct WithdrawalRepository {
    base: BaseRepository,
}

impl WithdrawalRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn get(&self, request_id: &str) -> RepoResult<WithdrawalRequest> {
        let rid = parse_record_id("withdrawal_request", request_id)?;
        let row: Option<WithdrawalRequest> = self.base.db().select(rid).await?;
        row.ok_or_else(|| RepoError::NotFound(format!("Withdrawal request not found: {request_id}")))
    }

    /// Create a request and reserve its funds atomically.
    ///
    /// Guards, in order:
    /// - `pending_exists` — the vendor already has a PENDING request
    /// - `fund_conflict` — some referenced record is not spendable by this
    ///   vendor right now (wrong owner, wrong status, unmatured hold, or
    ///   reserved by a concurrent request)
    /// - `below_minimum:<amount>` — the reserved total is under the floor
    ///
    /// The `open_slot` UNIQUE index is the backstop if two creates for the
    /// same vendor slip past the explicit PENDING check simultaneously.
    pub async fn create(
        &self,
        request_key: &str,
        vendor_id: &str,
        fund_ids: Vec<String>,
        destination: &str,
        min_amount: f64,
        now: i64,
    ) -> RepoResult<WithdrawalRequest> {
        let expected = fund_ids.len() as i64;
        let sql = r#"
            BEGIN TRANSACTION;
            LET $open = (SELECT VALUE id FROM withdrawal_request
                WHERE vendor_id = $vendor_id AND status = 'PENDING');
            IF array::len($open) > 0 { THROW 'pending_exists' };
            LET $reserved = UPDATE earning_record
                SET status = 'RESERVED', updated_at = $now
                WHERE <string>id IN $fund_ids
                  AND vendor_id = $vendor_id
                  AND (status = 'AVAILABLE' OR (status = 'HOLD' AND hold_until <= $now))
                RETURN AFTER;
            IF array::len($reserved) != $expected { THROW 'fund_conflict' };
            LET $amount = math::sum($reserved.net_amount);
            IF $amount < $min_amount { THROW "below_minimum:" + <string>$amount };
            CREATE type::thing('withdrawal_request', $request_key) CONTENT {
                vendor_id: $vendor_id,
                fund_ids: $fund_ids,
                amount: $amount,
                destination: $destination,
                status: 'PENDING',
                admin_notes: NONE,
                reject_reason: NONE,
                receipt: NONE,
                open_slot: $vendor_id,
                created_at: $now,
                updated_at: $now,
                resolved_at: NONE
            };
            COMMIT TRANSACTION;
        "#;

        let response = self
            .base
            .db()
            .query(sql)
            .bind(("request_key", request_key.to_string()))
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("fund_ids", fund_ids))
            .bind(("destination", destination.to_string()))
            .bind(("min_amount", min_amount))
            .bind(("expected", expected))
            .bind(("now", now))
            .await?;
        check_guarded(response)?;

        self.get(request_key).await
    }

    /// PENDING -> APPROVED. Frees the vendor's open slot: approval no longer
    /// blocks a new request.
    pub async fn approve(
        &self,
        request_id: &str,
        admin_notes: Option<String>,
        now: i64,
    ) -> RepoResult<WithdrawalRequest> {
        // Distinguish missing from mis-stated before the conditional write
        let current = self.get(request_id).await?;
        let rid = parse_record_id("withdrawal_request", request_id)?;

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $rid SET \
                     status = 'APPROVED', \
                     admin_notes = $notes, \
                     updated_at = $now, \
                     open_slot = <string>id \
                 WHERE status = 'PENDING' \
                 RETURN AFTER",
            )
            .bind(("rid", rid))
            .bind(("notes", admin_notes))
            .bind(("now", now))
            .await?;
        let updated: Vec<WithdrawalRequest> = result.take(0)?;

        updated.into_iter().next().ok_or_else(|| {
            RepoError::Guard(format!(
                "{GUARD_INVALID_TRANSITION}:{}->APPROVED",
                current.status.as_str()
            ))
        })
    }

    /// PENDING/APPROVED -> REJECTED, releasing the reserved funds back to
    /// AVAILABLE in the same transaction. The `status = 'RESERVED'` condition
    /// on the release makes it exactly-once.
    pub async fn reject(
        &self,
        request_id: &str,
        reason: &str,
        now: i64,
    ) -> RepoResult<WithdrawalRequest> {
        self.get(request_id).await?;
        let rid = parse_record_id("withdrawal_request", request_id)?;

        let sql = r#"
            BEGIN TRANSACTION;
            LET $req = UPDATE $rid
                SET status = 'REJECTED',
                    reject_reason = $reason,
                    updated_at = $now,
                    resolved_at = $now,
                    open_slot = <string>id
                WHERE status IN ['PENDING', 'APPROVED']
                RETURN AFTER;
            IF array::len($req) != 1 { THROW 'invalid_transition' };
            UPDATE earning_record SET status = 'AVAILABLE', updated_at = $now
                WHERE <string>id IN $req[0].fund_ids AND status = 'RESERVED';
            COMMIT TRANSACTION;
        "#;

        let response = self
            .base
            .db()
            .query(sql)
            .bind(("rid", rid))
            .bind(("reason", reason.to_string()))
            .bind(("now", now))
            .await?;
        check_guarded(response)?;

        self.get(request_id).await
    }

    /// APPROVED -> PROCESSED, marking the reserved funds WITHDRAWN and
    /// recording the payout receipt. Terminal.
    pub async fn process(
        &self,
        request_id: &str,
        receipt: &str,
        now: i64,
    ) -> RepoResult<WithdrawalRequest> {
        self.get(request_id).await?;
        let rid = parse_record_id("withdrawal_request", request_id)?;

        let sql = r#"
            BEGIN TRANSACTION;
            LET $req = UPDATE $rid
                SET status = 'PROCESSED',
                    receipt = $receipt,
                    updated_at = $now,
                    resolved_at = $now,
                    open_slot = <string>id
                WHERE status = 'APPROVED'
                RETURN AFTER;
            IF array::len($req) != 1 { THROW 'invalid_transition' };
            LET $moved = UPDATE earning_record SET status = 'WITHDRAWN', updated_at = $now
                WHERE <string>id IN $req[0].fund_ids AND status = 'RESERVED'
                RETURN AFTER;
            IF array::len($moved) != array::len($req[0].fund_ids) { THROW 'fund_conflict' };
            COMMIT TRANSACTION;
        "#;

        let response = self
            .base
            .db()
            .query(sql)
            .bind(("rid", rid))
            .bind(("receipt", receipt.to_string()))
            .bind(("now", now))
            .await?;
        check_guarded(response)?;

        self.get(request_id).await
    }

    /// List a vendor's requests, newest first, optionally by status
    pub async fn list_by_vendor(
        &self,
        vendor_id: &str,
        status: Option<WithdrawalStatus>,
    ) -> RepoResult<Vec<WithdrawalRequest>> {
        let mut result = match status {
            Some(s) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM withdrawal_request \
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
                        "SELECT * FROM withdrawal_request WHERE vendor_id = $vendor_id \
                         ORDER BY created_at DESC",
                    )
                    .bind(("vendor_id", vendor_id.to_string()))
                    .await?
            }
        };
        Ok(result.take(0)?)
    }

    /// List every request in a given status (admin queue view)
    pub async fn list_by_status(
        &self,
        status: WithdrawalStatus,
    ) -> RepoResult<Vec<WithdrawalRequest>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM withdrawal_request WHERE status = $status ORDER BY created_at",
            )
            .bind(("status", status))
            .await?;
        Ok(result.take(0)?)
    }

    /// Paged request listing with optional vendor, status and created-at
    /// range filters (admin surface)
    pub async fn list_page(
        &self,
        vendor_id: Option<String>,
        status: Option<WithdrawalStatus>,
        range: Option<(i64, i64)>,
        limit: u32,
        offset: u64,
    ) -> RepoResult<(Vec<WithdrawalRequest>, u64)> {
        let (start, end) = range.unwrap_or((0, i64::MAX));
        let sql = r#"
            SELECT * FROM withdrawal_request
                WHERE ($vendor_id = NONE OR vendor_id = $vendor_id)
                  AND ($status = NONE OR status = $status)
                  AND created_at >= $start AND created_at < $end
                ORDER BY created_at DESC
                LIMIT $limit START $offset;
            SELECT count() AS total FROM withdrawal_request
                WHERE ($vendor_id = NONE OR vendor_id = $vendor_id)
                  AND ($status = NONE OR status = $status)
                  AND created_at >= $start AND created_at < $end
                GROUP ALL;
        "#;
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("vendor_id", vendor_id))
            .bind(("status", status))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?;
        let rows: Vec<WithdrawalRequest> = result.take(0)?;
        let total = count_of(result.take::<Vec<CountRow>>(1)?);
        Ok((rows, total))
    }

    /// Total amount tied up in the vendor's open (PENDING/APPROVED) requests
    pub async fn sum_open(&self, vendor_id: &str) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(amount) AS total FROM withdrawal_request \
                 WHERE vendor_id = $vendor_id AND status IN ['PENDING', 'APPROVED'] \
                 GROUP ALL",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .await?;
        Ok(sum_of(result.take::<Vec<SumRow>>(0)?))
    }
}
