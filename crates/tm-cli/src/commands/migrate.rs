//! Migrate command implementation

use anyhow::{Context, Result};
use tm_core::Reporter;
use tm_migrate::MigrateReport;

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;
use crate::reporter::ConsoleReporter;

/// Execute the migrate command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let report = run(global, &ConsoleReporter).await?;
    log::debug!(
        "Applied {} migrations ({} already applied), created {} views",
        report.applied.len(),
        report.already_applied,
        report.views_created
    );
    Ok(())
}

pub(crate) async fn run(global: &GlobalArgs, reporter: &dyn Reporter) -> Result<MigrateReport> {
    let ctx = ProjectContext::load_validated(global)?;

    // Malformed file names fail here, before any connection is opened.
    let migrator = ctx.migrator(reporter)?;

    let db = ctx.connect().await?;
    reporter.info(&format!("Connected to {} database", db.db_type()));

    migrator
        .migrate(db.as_ref(), reporter)
        .await
        .context("Migration run failed")
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
