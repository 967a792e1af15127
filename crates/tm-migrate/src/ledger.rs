//! Ledger reads around the storage backend

use crate::error::MigrateResult;
use tm_core::{LedgerEntry, Reporter};
use tm_db::Database;

/// Create the ledger table if the catalog does not list it yet.
pub async fn ensure_ledger(
    db: &dyn Database,
    table: &str,
    reporter: &dyn Reporter,
) -> MigrateResult<()> {
    if db.relation_exists(table).await? {
        log::debug!("Ledger table {table} already exists");
        return Ok(());
    }
    reporter.info("Creating migrations table");
    db.ensure_ledger_table(table).await?;
    reporter.success("Migrations table created");
    Ok(())
}

/// Ensure the ledger table exists, then read every entry ordered by id.
pub async fn load_ledger(
    db: &dyn Database,
    table: &str,
    reporter: &dyn Reporter,
) -> MigrateResult<Vec<LedgerEntry>> {
    ensure_ledger(db, table, reporter).await?;
    let entries = db.fetch_ledger(table).await?;
    log::debug!("Read {} ledger entries from {table}", entries.len());
    Ok(entries)
}

/// Read the ledger without creating anything.
///
/// A missing table reads as an empty ledger.
pub async fn read_ledger(db: &dyn Database, table: &str) -> MigrateResult<Vec<LedgerEntry>> {
    if !db.relation_exists(table).await? {
        log::debug!("Ledger table {table} does not exist, treating as empty");
        return Ok(Vec::new());
    }
    Ok(db.fetch_ledger(table).await?)
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
