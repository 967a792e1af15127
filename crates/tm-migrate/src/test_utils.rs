//! Shared fixtures for tm-migrate unit tests

use async_trait::async_trait;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tm_core::LedgerEntry;
use tm_db::{
    DatabaseCore, DatabaseLedger, DatabaseTransaction, DbError, DbResult, DuckDbBackend,
};

/// Create a temporary migrations directory holding `files`.
///
/// Names may include a `views/` prefix.
pub(crate) fn migrations_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, sql) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, sql).unwrap();
    }
    dir
}

/// DuckDB backend that can be told to fail specific calls.
pub(crate) struct FaultyDb {
    pub inner: DuckDbBackend,
    pub fail_begin: bool,
    pub fail_drop: Option<String>,
    pub fail_insert_id: Option<i64>,
    pub rollbacks: AtomicUsize,
}

impl FaultyDb {
    pub fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            fail_begin: false,
            fail_drop: None,
            fail_insert_id: None,
            rollbacks: AtomicUsize::new(0),
        }
    }

    pub fn rollback_count(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseCore for FaultyDb {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql).await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name).await
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.inner.query_count(sql).await
    }

    async fn drop_view_if_exists(&self, name: &str) -> DbResult<()> {
        if self.fail_drop.as_deref() == Some(name) {
            return Err(DbError::ExecutionError(format!("cannot drop {name}")));
        }
        self.inner.drop_view_if_exists(name).await
    }

    fn db_type(&self) -> &'static str {
        "faulty"
    }
}

#[async_trait]
impl DatabaseTransaction for FaultyDb {
    async fn begin(&self) -> DbResult<()> {
        if self.fail_begin {
            return Err(DbError::TransactionError("BEGIN failed: connection lost".to_string()));
        }
        self.inner.begin().await
    }

    async fn commit(&self) -> DbResult<()> {
        self.inner.commit().await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.inner.rollback().await
    }
}

#[async_trait]
impl DatabaseLedger for FaultyDb {
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<bool> {
        self.inner.ensure_ledger_table(table).await
    }

    async fn fetch_ledger(&self, table: &str) -> DbResult<Vec<LedgerEntry>> {
        self.inner.fetch_ledger(table).await
    }

    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        if self.fail_insert_id == Some(entry.id) {
            return Err(DbError::ExecutionError(format!(
                "insert of migration {} refused",
                entry.id
            )));
        }
        self.inner.insert_ledger_entry(table, entry).await
    }
}
