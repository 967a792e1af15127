//! New command implementation

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tm_core::{next_file_name, read_migration_files};

use crate::cli::{GlobalArgs, NewArgs};
use crate::context::ProjectContext;
use crate::reporter::ConsoleReporter;

/// Execute the new command
pub fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let path = create_migration(args, global)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Create an empty `mNNN_<description>.sql` after the highest existing
/// sequence number. Only needs `migrations_path`; no database settings.
pub(crate) fn create_migration(args: &NewArgs, global: &GlobalArgs) -> Result<PathBuf> {
    let ctx = ProjectContext::load(global)?;
    if ctx.config.migrations_path.trim().is_empty() {
        bail!("migrations_path is required (set it in tidemark.yml or pass --migrationspath)");
    }

    let dir = ctx.migrations_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let files = read_migration_files(&dir, &ConsoleReporter)?;
    let file_name = next_file_name(&files, &args.description)?;
    let path = dir.join(&file_name);

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    log::debug!("Scaffolded migration {file_name}");
    Ok(path)
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
