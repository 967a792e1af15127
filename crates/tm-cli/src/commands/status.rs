//! Status command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use tm_migrate::StatusReport;

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;
use crate::reporter::ConsoleReporter;

/// Execute the status command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load_validated(global)?;
    let migrator = ctx.migrator(&ConsoleReporter)?;
    let db = ctx.connect().await?;

    let report = migrator
        .status(db.as_ref())
        .await
        .context("Status check failed")?;

    for line in format_status(&report) {
        println!("{line}");
    }
    Ok(())
}

/// Render one line per migration plus a summary line.
pub(crate) fn format_status(report: &StatusReport) -> Vec<String> {
    let width = report
        .rows
        .iter()
        .map(|row| row.file_name.len())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = report
        .rows
        .iter()
        .map(|row| match row.applied_at {
            Some(at) => format!(
                "{:<width$}  {}",
                row.file_name,
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => format!("{:<width$}  {}", row.file_name, "pending".yellow()),
        })
        .collect();

    let pending = report.pending_count();
    lines.push(format!(
        "{} migrations, {} applied, {} pending",
        report.rows.len(),
        report.rows.len() - pending,
        pending
    ));
    lines
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
