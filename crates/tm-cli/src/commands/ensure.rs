//! Ensure command implementation

use anyhow::{Context, Result};
use tm_core::Reporter;

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;
use crate::reporter::ConsoleReporter;

/// Execute the ensure command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load_validated(global)?;
    let reporter = ConsoleReporter;
    let migrator = ctx.migrator(&reporter)?;
    let db = ctx.connect().await?;
    reporter.info(&format!("Connected to {} database", db.db_type()));

    migrator
        .ensure(db.as_ref(), &reporter)
        .await
        .context("Ensure check failed")?;
    Ok(())
}
