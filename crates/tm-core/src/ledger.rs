//! Ledger rows recording applied migrations

use crate::migration_file::MigrationFile;
use chrono::{DateTime, Utc};

/// Default name of the ledger table
pub const DEFAULT_LEDGER_TABLE: &str = "migrations";

/// One applied migration as persisted in the ledger table.
///
/// Rows are written once by the apply engine, inside the same transaction as
/// the migration SQL, and are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Sequence number of the applied migration file
    pub id: i64,

    /// Description parsed from the migration file name
    pub description: String,

    /// When the migration was committed
    pub applied_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build the entry recorded for `file` at `applied_at`.
    pub fn for_file(file: &MigrationFile, applied_at: DateTime<Utc>) -> Self {
        Self {
            id: file.sequence,
            description: file.description.clone(),
            applied_at,
        }
    }
}
