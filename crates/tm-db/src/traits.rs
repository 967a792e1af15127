//! Database trait definitions
//!
//! Split by concern so backends read like the operations the migrator needs:
//! raw execution, explicit transactions, and the ledger table.

use crate::error::DbResult;
use async_trait::async_trait;
use tm_core::LedgerEntry;

/// Core execution and catalog inspection.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute one or more SQL statements verbatim
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists, by catalog lookup
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute a query and return its row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Issue `DROP VIEW IF EXISTS` for `name`
    async fn drop_view_if_exists(&self, name: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Explicit transaction control on the backend's single session.
///
/// Between `begin` and `commit`/`rollback` every call on the same backend
/// runs inside the transaction.
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    /// Start a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;
}

/// Ledger table operations.
#[async_trait]
pub trait DatabaseLedger: Send + Sync {
    /// Create the ledger table unless the catalog already lists it.
    ///
    /// Returns `true` when the table was created.
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<bool>;

    /// All ledger entries ordered by id ascending
    async fn fetch_ledger(&self, table: &str) -> DbResult<Vec<LedgerEntry>>;

    /// Insert one ledger row
    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()>;
}

/// Full database abstraction used by the migrator.
pub trait Database: DatabaseCore + DatabaseTransaction + DatabaseLedger {}

impl<T: DatabaseCore + DatabaseTransaction + DatabaseLedger> Database for T {}
