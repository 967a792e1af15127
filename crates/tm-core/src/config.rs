//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use crate::ledger::DEFAULT_LEDGER_TABLE;
use crate::sql_utils::is_plain_identifier;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file names searched for in a project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["tidemark.yml", "tidemark.yaml"];

/// Main configuration from tidemark.yml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing `mNNN_*.sql` files and the `views/` subdirectory
    #[serde(default)]
    pub migrations_path: String,

    /// Table recording applied migrations
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// View rebuild settings
    #[serde(default)]
    pub views: ViewsConfig,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_path: String::new(),
            ledger_table: default_ledger_table(),
            views: ViewsConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

fn default_ledger_table() -> String {
    DEFAULT_LEDGER_TABLE.to_string()
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// PostgreSQL (default)
    #[default]
    Postgres,
    /// DuckDB, file-based or in-memory
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::Postgres => write!(f, "postgres"),
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (postgres or duckdb)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// PostgreSQL host
    #[serde(default)]
    pub host: Option<String>,

    /// PostgreSQL port
    #[serde(default)]
    pub port: Option<u16>,

    /// PostgreSQL user
    #[serde(default)]
    pub user: Option<String>,

    /// PostgreSQL password
    #[serde(default)]
    pub password: Option<String>,

    /// PostgreSQL database name
    #[serde(default)]
    pub name: Option<String>,

    /// DuckDB database path (or `:memory:`)
    #[serde(default)]
    pub path: Option<String>,
}

/// What to do when dropping a tracked view fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewDropPolicy {
    /// Report the failure and keep going
    #[default]
    Warn,
    /// Abort the run with a view error
    Fail,
}

/// View rebuild configuration
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewsConfig {
    /// Behaviour when `DROP VIEW IF EXISTS` fails
    #[serde(default)]
    pub drop_failure: ViewDropPolicy,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Find the config file in a project directory, if there is one
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration from a project directory
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Resolve the migrations directory relative to `root`
    pub fn migrations_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    /// Check that everything required to run is present
    pub fn validate(&self) -> CoreResult<()> {
        if self.migrations_path.trim().is_empty() {
            return Err(invalid("migrations_path is required"));
        }
        if !is_plain_identifier(&self.ledger_table) {
            return Err(invalid(&format!(
                "ledger_table '{}' must be a plain SQL identifier",
                self.ledger_table
            )));
        }
        self.database.validate()
    }
}

impl DatabaseConfig {
    /// Check that the fields required by the selected backend are set
    pub fn validate(&self) -> CoreResult<()> {
        match self.db_type {
            DbType::Postgres => {
                if self.host.as_deref().map_or(true, str::is_empty) {
                    return Err(invalid("database.host is required"));
                }
                if self.port.is_none() {
                    return Err(invalid("database.port is required"));
                }
                let required = [
                    ("database.user", self.user.as_deref()),
                    ("database.password", self.password.as_deref()),
                    ("database.name", self.name.as_deref()),
                ];
                for (field, value) in required {
                    if value.map_or(true, str::is_empty) {
                        return Err(invalid(&format!("{field} is required")));
                    }
                }
                Ok(())
            }
            DbType::DuckDb => match self.path.as_deref() {
                Some(path) if !path.is_empty() => Ok(()),
                _ => Err(invalid("database.path is required for duckdb")),
            },
        }
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::ConfigInvalid {
        message: message.to_string(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
