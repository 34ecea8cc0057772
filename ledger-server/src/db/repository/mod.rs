//! Repository Module
//!
//! Per-table data access over the embedded SurrealDB handle. Multi-record
//! mutations run as single SurrealQL transactions with `THROW`-based guards;
//! a thrown marker surfaces as [`RepoError::Guard`] and is mapped to a
//! business error by the domain engines.

pub mod earning;
pub mod order;
pub mod suborder;
pub mod withdrawal;

// Re-exports
pub use earning::EarningRepository;
pub use order::OrderRepository;
pub use suborder::SuborderRepository;
pub use withdrawal::WithdrawalRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Guard markers thrown inside SurrealQL transactions
pub const GUARD_PENDING_EXISTS: &str = "pending_exists";
pub const GUARD_FUND_CONFLICT: &str = "fund_conflict";
pub const GUARD_INVALID_TRANSITION: &str = "invalid_transition";
pub const GUARD_BELOW_MINIMUM: &str = "below_minimum";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A transaction guard threw; the payload is the marker string
    /// (possibly with a `:suffix`, e.g. "below_minimum:42.5")
    #[error("Guard violation: {0}")]
    Guard(String),

    /// Store-level optimistic commit conflict — the caller may retry
    #[error("Transaction conflict: {0}")]
    TxnConflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Classify a raw SurrealDB error message
fn classify(msg: &str) -> RepoError {
    for marker in [
        GUARD_PENDING_EXISTS,
        GUARD_FUND_CONFLICT,
        GUARD_INVALID_TRANSITION,
        GUARD_BELOW_MINIMUM,
    ] {
        if let Some(pos) = msg.find(marker) {
            return RepoError::Guard(msg[pos..].trim_end_matches(['\'', '"', '`']).to_string());
        }
    }
    let lower = msg.to_lowercase();
    if lower.contains("already contains") || lower.contains("unique") || lower.contains("duplicate")
    {
        return RepoError::Duplicate(msg.to_string());
    }
    if lower.contains("read or write conflict") || lower.contains("transaction can be retried") {
        return RepoError::TxnConflict(msg.to_string());
    }
    RepoError::Database(msg.to_string())
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        classify(&err.to_string())
    }
}

/// Check a multi-statement response, classifying every statement error.
///
/// When a `THROW` aborts a `BEGIN…COMMIT` transaction, SurrealDB reports the
/// earlier statements as "not executed due to a failed transaction" and the
/// thrown marker sits on a later statement. `Response::check()` would return
/// the first error and lose the marker, so every error is drained and the
/// most specific classification wins: guard marker, then unique-index
/// duplicate, then commit conflict, then a generic database error.
pub(crate) fn check_guarded(mut response: surrealdb::Response) -> RepoResult<surrealdb::Response> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return Ok(response);
    }

    let mut classified: Vec<(usize, RepoError)> = errors
        .into_iter()
        .map(|(idx, e)| (idx, classify(&e.to_string())))
        .collect();
    classified.sort_by_key(|(idx, _)| *idx);

    let mut duplicate = None;
    let mut conflict = None;
    let mut database = None;
    for (_, err) in classified {
        match &err {
            RepoError::Guard(_) => return Err(err),
            RepoError::Duplicate(_) => {
                if duplicate.is_none() {
                    duplicate = Some(err);
                }
            }
            RepoError::TxnConflict(_) => {
                if conflict.is_none() {
                    conflict = Some(err);
                }
            }
            _ => {
                if database.is_none() {
                    database = Some(err);
                }
            }
        }
    }

    Err(duplicate
        .or(conflict)
        .or(database)
        .unwrap_or_else(|| RepoError::Database("transaction failed".to_string())))
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================

/// Parse an incoming ID as either "table:key" or a bare key
pub fn parse_record_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    if raw.trim().is_empty() {
        return Err(RepoError::Validation(format!("Empty {table} id")));
    }
    if let Ok(id) = raw.parse::<RecordId>() {
        if id.table() == table {
            return Ok(id);
        }
        return Err(RepoError::Validation(format!(
            "Expected a {table} id, got: {raw}"
        )));
    }
    Ok(RecordId::from_table_key(table, raw))
}

/// Aggregate result row (`math::sum(...) AS total ... GROUP ALL`)
#[derive(Debug, serde::Deserialize)]
pub(crate) struct SumRow {
    pub total: Option<f64>,
}

/// Count result row (`count() AS total ... GROUP ALL`)
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub total: Option<u64>,
}

pub(crate) fn sum_of(rows: Vec<SumRow>) -> f64 {
    rows.into_iter()
        .next()
        .and_then(|r| r.total)
        .unwrap_or(0.0)
}

pub(crate) fn count_of(rows: Vec<CountRow>) -> u64 {
    rows.into_iter().next().and_then(|r| r.total).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_accepts_both_formats() {
        let full = parse_record_id("suborder", "suborder:abc123").unwrap();
        assert_eq!(full.table(), "suborder");

        let bare = parse_record_id("suborder", "abc123").unwrap();
        assert_eq!(bare.table(), "suborder");
        assert_eq!(full, bare);
    }

    #[test]
    fn test_parse_record_id_rejects_wrong_table() {
        assert!(parse_record_id("suborder", "order:abc").is_err());
        assert!(parse_record_id("suborder", "").is_err());
    }

    #[test]
    fn test_guard_marker_extraction() {
        let err = RepoError::Guard("below_minimum:42.5".to_string());
        match err {
            RepoError::Guard(m) => {
                assert!(m.starts_with(GUARD_BELOW_MINIMUM));
                assert_eq!(m.split(':').nth(1), Some("42.5"));
            }
            _ => panic!("expected guard"),
        }
    }

    #[test]
    fn test_classify_guard_markers() {
        assert!(matches!(
            classify("An error occurred: pending_exists"),
            RepoError::Guard(m) if m.starts_with(GUARD_PENDING_EXISTS)
        ));
        assert!(matches!(
            classify("An error occurred: 'below_minimum:68f'"),
            RepoError::Guard(m) if m == "below_minimum:68f"
        ));
    }

    #[test]
    fn test_classify_aborted_statement_is_not_a_business_error() {
        // The "not executed" report on statements before a THROW carries no
        // marker and must stay a database error
        assert!(matches!(
            classify("The query was not executed due to a failed transaction"),
            RepoError::Database(_)
        ));
    }

    #[test]
    fn test_classify_duplicate_and_commit_conflict() {
        assert!(matches!(
            classify("Database index `uniq_withdrawal_open_slot` already contains 'v_a'"),
            RepoError::Duplicate(_)
        ));
        assert!(matches!(
            classify(
                "Failed to commit transaction due to a read or write conflict. \
                 This transaction can be retried"
            ),
            RepoError::TxnConflict(_)
        ));
    }
}
