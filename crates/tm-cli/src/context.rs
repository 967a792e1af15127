//! Project context for CLI commands
//!
//! Loads `tidemark.yml` when present and layers the command-line flags on
//! top of it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tm_core::{Config, DatabaseConfig, DbType, Reporter};
use tm_db::Database;
use tm_migrate::Migrator;

use crate::cli::GlobalArgs;

/// Configuration resolved for one invocation
#[derive(Debug)]
pub struct ProjectContext {
    /// Project directory; relative paths in the config resolve against it
    pub root: PathBuf,

    /// File config with flag overrides applied
    pub config: Config,
}

impl ProjectContext {
    /// Load the config file (if any) and apply flag overrides.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = global.project_dir.clone();

        let mut config = match &global.config {
            Some(path) => Config::load(path).context("Failed to load configuration file")?,
            None if Config::find_in_dir(&root).is_some() => {
                Config::load_from_dir(&root).context("Failed to load project configuration")?
            }
            None => {
                log::debug!("No config file in {}, using flags only", root.display());
                Config::default()
            }
        };
        apply_overrides(&mut config, global);

        Ok(Self { root, config })
    }

    /// Load and require a complete configuration.
    pub fn load_validated(global: &GlobalArgs) -> Result<Self> {
        let ctx = Self::load(global)?;
        ctx.config.validate().context("Invalid configuration")?;
        Ok(ctx)
    }

    /// Absolute or project-relative migrations directory
    pub fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir(&self.root)
    }

    /// Read migration files and views. Touches only the filesystem.
    pub fn migrator(&self, reporter: &dyn Reporter) -> Result<Migrator> {
        Migrator::from_config(&self.config, &self.root, reporter)
            .context("Failed to read migrations")
    }

    /// Database settings with a relative DuckDB path resolved against the
    /// project directory.
    pub fn database_config(&self) -> DatabaseConfig {
        let mut database = self.config.database.clone();
        if database.db_type == DbType::DuckDb {
            database.path = database
                .path
                .map(|path| resolve_duckdb_path(&self.root, &path));
        }
        database
    }

    /// Open the configured database.
    pub async fn connect(&self) -> Result<Arc<dyn Database>> {
        tm_db::connect(&self.database_config())
            .await
            .context("Failed to connect to database")
    }
}

fn apply_overrides(config: &mut Config, global: &GlobalArgs) {
    if let Some(path) = &global.migrationspath {
        config.migrations_path = path.clone();
    }

    let database = &mut config.database;
    if let Some(backend) = global.backend {
        database.db_type = backend.into();
    }
    let overrides = [
        (&mut database.host, &global.dbhost),
        (&mut database.user, &global.dbuser),
        (&mut database.password, &global.dbpassword),
        (&mut database.name, &global.dbname),
        (&mut database.path, &global.database_path),
    ];
    for (field, value) in overrides {
        if value.is_some() {
            field.clone_from(value);
        }
    }
    if global.dbport.is_some() {
        database.port = global.dbport;
    }
}

fn resolve_duckdb_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
