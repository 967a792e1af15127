//! Error types for the migration engine

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// File, naming, config or ledger consistency error from tm-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Connectivity or query failure outside a migration transaction (M001)
    #[error("[M001] Storage error: {0}")]
    Storage(#[from] DbError),

    /// Migration file has no SQL (M002)
    #[error("[M002] empty migration file {file_name}")]
    EmptyMigration { file_name: String },

    /// Migration SQL or its ledger insert failed; the transaction was rolled back (M003)
    #[error("[M003] migration {file_name} failed and was rolled back: {source}")]
    Apply { file_name: String, source: DbError },

    /// View file has no SQL (M004)
    #[error("[M004] empty view file {name}")]
    EmptyView { name: String },

    /// Creating a view failed (M005)
    #[error("[M005] error running view {name}: {source}")]
    ViewCreate { name: String, source: DbError },

    /// Dropping a view failed under the `fail` drop policy (M006)
    #[error("[M006] error dropping view {name}: {source}")]
    ViewDrop { name: String, source: DbError },

    /// Ensure mode found migrations not yet applied (M007)
    #[error("[M007] there are {count} migrations left to run")]
    PendingMigrations { count: usize },
}

impl MigrateError {
    /// Whether the ledger and the files have diverged.
    pub fn is_consistency_error(&self) -> bool {
        matches!(self, MigrateError::Core(e) if e.is_consistency_error())
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
