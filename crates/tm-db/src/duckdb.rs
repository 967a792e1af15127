//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCore, DatabaseLedger, DatabaseTransaction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tm_core::sql_utils::split_qualified_name;
use tm_core::LedgerEntry;

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Run a transaction control statement synchronously
    fn transaction_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::TransactionError(format!("{sql} failed: {e}")))
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);

        let count: i64 = match schema {
            Some(schema) => conn.query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            ),
            None => conn.query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = ?",
                duckdb::params![table],
                |row| row.get(0),
            ),
        }
        .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }

    fn fetch_ledger_sync(&self, table: &str) -> DbResult<Vec<LedgerEntry>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT CAST(id AS BIGINT), description, epoch_us(applied_at) FROM {table} ORDER BY id"
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        rows.into_iter()
            .map(|(id, description, micros)| {
                let applied_at = DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(|| {
                    DbError::LedgerRowError(format!("applied_at out of range for migration {id}"))
                })?;
                Ok(LedgerEntry {
                    id,
                    description,
                    applied_at,
                })
            })
            .collect()
    }

    fn insert_ledger_entry_sync(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        let conn = self.lock()?;
        // Stored as a naive UTC TIMESTAMP; TIMESTAMPTZ needs the ICU extension.
        let applied_at = entry
            .applied_at
            .naive_utc()
            .format("%Y-%m-%d %H:%M:%S%.6f")
            .to_string();
        conn.execute(
            &format!(
                "INSERT INTO {table} (id, description, applied_at) VALUES (?, ?, CAST(? AS TIMESTAMP))"
            ),
            duckdb::params![entry.id, entry.description, applied_at],
        )
        .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn drop_view_if_exists(&self, name: &str) -> DbResult<()> {
        self.execute_batch_sync(&format!("DROP VIEW IF EXISTS {}", name))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseTransaction for DuckDbBackend {
    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }
}

#[async_trait]
impl DatabaseLedger for DuckDbBackend {
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<bool> {
        if self.relation_exists_sync(table)? {
            return Ok(false);
        }
        self.execute_batch_sync(&format!(
            "CREATE TABLE {table} (
                id INTEGER PRIMARY KEY NOT NULL,
                description VARCHAR NOT NULL,
                applied_at TIMESTAMP NOT NULL
            )"
        ))?;
        Ok(true)
    }

    async fn fetch_ledger(&self, table: &str) -> DbResult<Vec<LedgerEntry>> {
        self.fetch_ledger_sync(table)
    }

    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        self.insert_ledger_entry_sync(table, entry)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
