//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the `Database` trait family and implementations for
//! DuckDB and PostgreSQL.

pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use postgres::PostgresBackend;
pub use traits::{Database, DatabaseCore, DatabaseLedger, DatabaseTransaction};

use std::sync::Arc;
use tm_core::{DatabaseConfig, DbType};

/// Open the backend selected by `config`.
pub async fn connect(config: &DatabaseConfig) -> DbResult<Arc<dyn Database>> {
    let db: Arc<dyn Database> = match config.db_type {
        DbType::Postgres => Arc::new(PostgresBackend::connect(config).await?),
        DbType::DuckDb => {
            let path = config.path.as_deref().ok_or_else(|| {
                DbError::ConnectionError("database.path is required for duckdb".to_string())
            })?;
            Arc::new(DuckDbBackend::new(path)?)
        }
    };
    log::debug!("Connected to {} database", db.db_type());
    Ok(db)
}
