//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tm_core::DbType;

/// Tidemark - apply ordered SQL migrations exactly once and rebuild views
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands.
///
/// Database and path flags override the matching `tidemark.yml` values.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database backend
    #[arg(long, global = true, value_enum, env = "TM_BACKEND")]
    pub backend: Option<Backend>,

    /// Database host
    #[arg(long, global = true, env = "TM_DB_HOST")]
    pub dbhost: Option<String>,

    /// Database port
    #[arg(long, global = true, env = "TM_DB_PORT")]
    pub dbport: Option<u16>,

    /// Database user
    #[arg(long, global = true, env = "TM_DB_USER")]
    pub dbuser: Option<String>,

    /// Database password
    #[arg(long, global = true, env = "TM_DB_PASSWORD", hide_env_values = true)]
    pub dbpassword: Option<String>,

    /// Database name
    #[arg(long, global = true, env = "TM_DB_NAME")]
    pub dbname: Option<String>,

    /// Directory holding the migration files
    #[arg(long, global = true, env = "TM_MIGRATIONS_PATH")]
    pub migrationspath: Option<String>,

    /// DuckDB database file, or ":memory:"
    #[arg(long, global = true, env = "TM_DATABASE_PATH")]
    pub database_path: Option<String>,
}

#[cfg(test)]
impl GlobalArgs {
    /// Arguments as if only `--project-dir` was given
    pub(crate) fn for_project(project_dir: &std::path::Path) -> Self {
        Self {
            verbose: false,
            project_dir: project_dir.to_path_buf(),
            config: None,
            backend: None,
            dbhost: None,
            dbport: None,
            dbuser: None,
            dbpassword: None,
            dbname: None,
            migrationspath: None,
            database_path: None,
        }
    }
}

/// Database backends selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// PostgreSQL
    Postgres,
    /// DuckDB
    Duckdb,
}

impl From<Backend> for DbType {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Postgres => DbType::Postgres,
            Backend::Duckdb => DbType::DuckDb,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations and rebuild views
    Migrate,

    /// Check that every migration ran and matches the ledger (read-only)
    Ensure,

    /// List migrations with the time each was applied
    Status,

    /// Create the next numbered migration file
    New(NewArgs),
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Short description, used in the file name
    pub description: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
