//! Database Module
//!
//! Embedded SurrealDB storage. Schema (tables + indexes) is defined at
//! startup; the unique indexes double as race guards:
//!
//! - `earning_record.recognition_key` — idempotent earning recognition
//! - `withdrawal_request.open_slot` — at most one PENDING request per vendor

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "soko";
const DATABASE: &str = "ledger";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::init(db).await?;
        tracing::info!(path = %db_path, "Database connection established (RocksDB)");
        Ok(service)
    }

    /// In-memory database (tests and ephemeral runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Define tables and indexes (idempotent)
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS suborder SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS earning_record SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS withdrawal_request SCHEMALESS;

        DEFINE INDEX IF NOT EXISTS idx_suborder_order
            ON TABLE suborder COLUMNS order_id;
        DEFINE INDEX IF NOT EXISTS idx_suborder_vendor_status
            ON TABLE suborder COLUMNS vendor_id, status;

        DEFINE INDEX IF NOT EXISTS idx_earning_vendor_status
            ON TABLE earning_record COLUMNS vendor_id, status;
        DEFINE INDEX IF NOT EXISTS uniq_earning_recognition
            ON TABLE earning_record COLUMNS recognition_key UNIQUE;

        DEFINE INDEX IF NOT EXISTS idx_withdrawal_vendor_status
            ON TABLE withdrawal_request COLUMNS vendor_id, status;
        DEFINE INDEX IF NOT EXISTS uniq_withdrawal_open_slot
            ON TABLE withdrawal_request COLUMNS open_slot UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

    tracing::info!("Database schema defined");
    Ok(())
}
