//! PostgreSQL database backend implementation
//!
//! Holds a single dedicated connection rather than a pool: `BEGIN`, the
//! migration body, the ledger insert and `COMMIT` must all run on the same
//! session.

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCore, DatabaseLedger, DatabaseTransaction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Connection, Row};
use tm_core::sql_utils::{fold_identifier, split_qualified_name};
use tm_core::{DatabaseConfig, LedgerEntry};
use tokio::sync::Mutex;

/// PostgreSQL database backend.
///
/// Names are interpolated unquoted, so the server folds them to lower case;
/// catalog lookups fold the same way.
pub struct PostgresBackend {
    conn: Mutex<PgConnection>,
}

impl PostgresBackend {
    /// Connect using the host/port/user/password/name fields of `config`
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let missing = |field: &str| DbError::ConnectionError(format!("database.{field} is required"));

        let options = PgConnectOptions::new()
            .host(config.host.as_deref().ok_or_else(|| missing("host"))?)
            .port(config.port.ok_or_else(|| missing("port"))?)
            .username(config.user.as_deref().ok_or_else(|| missing("user"))?)
            .password(config.password.as_deref().ok_or_else(|| missing("password"))?)
            .database(config.name.as_deref().ok_or_else(|| missing("name"))?)
            .ssl_mode(PgSslMode::Prefer);

        Self::connect_with(&options).await
    }

    /// Connect using a `postgres://` URL
    pub async fn connect_url(url: &str) -> DbResult<Self> {
        let options: PgConnectOptions = url
            .parse()
            .map_err(|e: sqlx::Error| DbError::ConnectionError(e.to_string()))?;
        Self::connect_with(&options).await
    }

    async fn connect_with(options: &PgConnectOptions) -> DbResult<Self> {
        let conn = PgConnection::connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        log::debug!(
            "Connected to PostgreSQL at {}:{}",
            options.get_host(),
            options.get_port()
        );
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a statement through the simple-query protocol.
    ///
    /// Allows several `;`-separated statements, which migration files use.
    async fn raw(&self, sql: &str) -> DbResult<()> {
        let mut guard = self.conn.lock().await;
        let conn: &mut PgConnection = &mut guard;
        sqlx::Executor::execute(conn, sqlx::raw_sql(sql)).await?;
        Ok(())
    }

    async fn transaction_statement(&self, sql: &str) -> DbResult<()> {
        self.raw(sql)
            .await
            .map_err(|e| DbError::TransactionError(format!("{sql} failed: {e}")))
    }
}

#[async_trait]
impl DatabaseCore for PostgresBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.raw(sql).await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let folded = fold_identifier(name);
        let (schema, table) = split_qualified_name(&folded);
        let mut conn = self.conn.lock().await;
        let row = sqlx::query(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = COALESCE($1, current_schema()) AND table_name = $2
            )",
        )
        .bind(schema)
        .bind(table)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row.try_get(0)?)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM ({sql}) AS counted");
        let mut conn = self.conn.lock().await;
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
        Ok(count as usize)
    }

    async fn drop_view_if_exists(&self, name: &str) -> DbResult<()> {
        self.raw(&format!("DROP VIEW IF EXISTS {name};")).await
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl DatabaseTransaction for PostgresBackend {
    async fn begin(&self) -> DbResult<()> {
        self.transaction_statement("BEGIN").await
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_statement("COMMIT").await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_statement("ROLLBACK").await
    }
}

#[async_trait]
impl DatabaseLedger for PostgresBackend {
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<bool> {
        let exists: bool = {
            let mut conn = self.conn.lock().await;
            sqlx::query_scalar(
                "SELECT EXISTS (
                    SELECT 1 FROM pg_tables
                    WHERE schemaname = current_schema() AND tablename = $1
                )",
            )
            .bind(fold_identifier(table))
            .fetch_one(&mut *conn)
            .await?
        };
        if exists {
            return Ok(false);
        }

        self.raw(&format!(
            r#"CREATE TABLE {table} (
                "id" INT PRIMARY KEY NOT NULL,
                "description" VARCHAR NOT NULL,
                "applied_at" TIMESTAMPTZ NOT NULL
            );"#
        ))
        .await?;
        Ok(true)
    }

    async fn fetch_ledger(&self, table: &str) -> DbResult<Vec<LedgerEntry>> {
        let sql = format!("SELECT id, description, applied_at FROM {table} ORDER BY id");
        let mut conn = self.conn.lock().await;
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

        rows.iter()
            .map(|row| {
                let decode = |e: sqlx::Error| DbError::LedgerRowError(e.to_string());
                Ok(LedgerEntry {
                    id: i64::from(row.try_get::<i32, _>("id").map_err(decode)?),
                    description: row.try_get("description").map_err(decode)?,
                    applied_at: row
                        .try_get::<DateTime<Utc>, _>("applied_at")
                        .map_err(decode)?,
                })
            })
            .collect()
    }

    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        let id = i32::try_from(entry.id).map_err(|_| {
            DbError::LedgerRowError(format!("migration id {} does not fit in INT", entry.id))
        })?;
        let sql = format!("INSERT INTO {table} (id, description, applied_at) VALUES ($1, $2, $3)");
        let mut conn = self.conn.lock().await;
        sqlx::query(&sql)
            .bind(id)
            .bind(&entry.description)
            .bind(entry.applied_at)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
