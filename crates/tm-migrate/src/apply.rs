//! Apply engine
//!
//! Each pending migration runs in its own transaction together with the
//! insert of its ledger row. A failure rolls that migration back and stops
//! the run; migrations committed before it stay applied.

use crate::error::{MigrateError, MigrateResult};
use chrono::Utc;
use tm_core::{pending, LedgerEntry, MigrationFile, Reporter};
use tm_db::{Database, DbError};

/// Apply `files[ledger.len()..]` in order.
///
/// `ledger` must already have been checked with [`tm_core::validate_ledger`].
/// Returns the ledger entries written by this call.
pub async fn apply_pending(
    db: &dyn Database,
    table: &str,
    files: &[MigrationFile],
    ledger: &[LedgerEntry],
    reporter: &dyn Reporter,
) -> MigrateResult<Vec<LedgerEntry>> {
    let to_apply = pending(files, ledger);
    if to_apply.is_empty() {
        reporter.success("All migrations already ran");
        return Ok(Vec::new());
    }

    reporter.step(&format!(
        "{}/{} migrations already ran",
        ledger.len(),
        files.len()
    ));
    reporter.step("Running migrations");

    let mut applied = Vec::with_capacity(to_apply.len());
    for file in to_apply {
        applied.push(apply_one(db, table, file, reporter).await?);
    }

    reporter.success("All migrations ran successfully");
    Ok(applied)
}

/// Apply a single migration and record it in the ledger atomically.
pub async fn apply_one(
    db: &dyn Database,
    table: &str,
    file: &MigrationFile,
    reporter: &dyn Reporter,
) -> MigrateResult<LedgerEntry> {
    let sql = file.read_sql()?;
    if sql.trim().is_empty() {
        return Err(MigrateError::EmptyMigration {
            file_name: file.file_name.clone(),
        });
    }

    reporter.info(&format!("Running migration {}", file.file_name));
    let entry = LedgerEntry::for_file(file, Utc::now());

    // Nothing to roll back if BEGIN fails.
    db.begin().await?;

    let result = run_in_transaction(db, table, &sql, &entry).await;
    let outcome = match result {
        Ok(()) => match db.commit().await {
            Ok(()) => Ok(()),
            Err(commit_err) => {
                rollback_quietly(db, &file.file_name).await;
                Err(commit_err)
            }
        },
        Err(e) => {
            rollback_quietly(db, &file.file_name).await;
            Err(e)
        }
    };

    outcome.map_err(|source| MigrateError::Apply {
        file_name: file.file_name.clone(),
        source,
    })?;

    log::debug!("Recorded migration {} in {table}", entry.id);
    reporter.success(&format!("Migration {} ran successfully", file.file_name));
    Ok(entry)
}

async fn run_in_transaction(
    db: &dyn Database,
    table: &str,
    sql: &str,
    entry: &LedgerEntry,
) -> Result<(), DbError> {
    db.execute_batch(sql).await?;
    db.insert_ledger_entry(table, entry).await
}

async fn rollback_quietly(db: &dyn Database, file_name: &str) {
    if let Err(e) = db.rollback().await {
        log::warn!("Rollback after failed migration {file_name} also failed: {e}");
    }
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
