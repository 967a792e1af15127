//! Migration orchestration
//!
//! [`Migrator::load`] reads the migration files and view definitions from
//! disk before any database is contacted, so a malformed file name never
//! reaches storage.

use crate::apply::apply_pending;
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{load_ledger, read_ledger};
use crate::views::{create_views, drop_views};
use chrono::{DateTime, Utc};
use std::path::Path;
use tm_core::{
    discover_views, read_migration_files, validate_ledger, Config, LedgerEntry, MigrationFile,
    Reporter, ViewDefinition, ViewDropPolicy, DEFAULT_LEDGER_TABLE,
};
use tm_db::Database;

/// Options that shape a migration run
#[derive(Debug, Clone)]
pub struct MigratorOptions {
    /// Name of the ledger table
    pub ledger_table: String,

    /// What to do when dropping a view fails
    pub drop_failure: ViewDropPolicy,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
            drop_failure: ViewDropPolicy::default(),
        }
    }
}

impl From<&Config> for MigratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            ledger_table: config.ledger_table.clone(),
            drop_failure: config.views.drop_failure,
        }
    }
}

/// Result of a successful migrate run
#[derive(Debug, Clone)]
pub struct MigrateReport {
    /// Ledger entries written during this run, in apply order
    pub applied: Vec<LedgerEntry>,

    /// Migrations that were already in the ledger before the run
    pub already_applied: usize,

    /// Number of views recreated
    pub views_created: usize,
}

/// Result of a successful ensure check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsureReport {
    /// Number of applied migrations, equal to the number of files
    pub applied: usize,
}

/// One line of `tm status`
#[derive(Debug, Clone)]
pub struct StatusRow {
    /// Sequence number parsed from the file name
    pub sequence: i64,

    /// Migration file name
    pub file_name: String,

    /// When the migration was committed; `None` while pending
    pub applied_at: Option<DateTime<Utc>>,
}

impl StatusRow {
    /// Whether the ledger records this migration
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// Result of a status listing
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// One row per migration file, in sequence order
    pub rows: Vec<StatusRow>,
}

impl StatusReport {
    /// Number of files not yet applied
    pub fn pending_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_applied()).count()
    }
}

/// Migration files and views loaded from one migrations directory
#[derive(Debug)]
pub struct Migrator {
    files: Vec<MigrationFile>,
    views: Vec<ViewDefinition>,
    options: MigratorOptions,
}

impl Migrator {
    /// Read migration files and view definitions from `migrations_dir`.
    pub fn load(
        migrations_dir: &Path,
        options: MigratorOptions,
        reporter: &dyn Reporter,
    ) -> MigrateResult<Self> {
        let files = read_migration_files(migrations_dir, reporter)?;
        let views = discover_views(migrations_dir, reporter)?;
        log::debug!(
            "Loaded {} migrations and {} views from {}",
            files.len(),
            views.len(),
            migrations_dir.display()
        );
        Ok(Self {
            files,
            views,
            options,
        })
    }

    /// Load using the paths and options of a project config rooted at `root`.
    pub fn from_config(config: &Config, root: &Path, reporter: &dyn Reporter) -> MigrateResult<Self> {
        Self::load(&config.migrations_dir(root), config.into(), reporter)
    }

    /// Migration files sorted by sequence number
    pub fn files(&self) -> &[MigrationFile] {
        &self.files
    }

    /// View definitions sorted by name
    pub fn views(&self) -> &[ViewDefinition] {
        &self.views
    }

    /// Ledger table and view drop policy in effect
    pub fn options(&self) -> &MigratorOptions {
        &self.options
    }

    /// Validate the ledger, drop views, apply pending migrations, then
    /// recreate views.
    ///
    /// The ledger is read once; the same snapshot drives validation and
    /// the choice of pending files.
    pub async fn migrate(
        &self,
        db: &dyn Database,
        reporter: &dyn Reporter,
    ) -> MigrateResult<MigrateReport> {
        let table = &self.options.ledger_table;
        let ledger = load_ledger(db, table, reporter).await?;
        validate_ledger(&self.files, &ledger)?;

        drop_views(db, &self.views, self.options.drop_failure, reporter).await?;
        let applied = apply_pending(db, table, &self.files, &ledger, reporter).await?;
        let views_created = create_views(db, &self.views, reporter).await?;

        Ok(MigrateReport {
            applied,
            already_applied: ledger.len(),
            views_created,
        })
    }

    /// Check that the ledger matches the files and nothing is pending.
    ///
    /// Never writes to the database.
    pub async fn ensure(
        &self,
        db: &dyn Database,
        reporter: &dyn Reporter,
    ) -> MigrateResult<EnsureReport> {
        let ledger = read_ledger(db, &self.options.ledger_table).await?;
        validate_ledger(&self.files, &ledger)?;

        let outstanding = self.files.len() - ledger.len();
        if outstanding > 0 {
            return Err(MigrateError::PendingMigrations { count: outstanding });
        }

        reporter.success("Migrations are up to date");
        Ok(EnsureReport {
            applied: ledger.len(),
        })
    }

    /// List every migration file with the time it was applied.
    ///
    /// Runs the consistency check first and never writes to the database.
    pub async fn status(&self, db: &dyn Database) -> MigrateResult<StatusReport> {
        let ledger = read_ledger(db, &self.options.ledger_table).await?;
        validate_ledger(&self.files, &ledger)?;

        let rows = self
            .files
            .iter()
            .enumerate()
            .map(|(position, file)| StatusRow {
                sequence: file.sequence,
                file_name: file.file_name.clone(),
                applied_at: ledger.get(position).map(|entry| entry.applied_at),
            })
            .collect();
        Ok(StatusReport { rows })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
