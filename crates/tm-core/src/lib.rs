//! tm-core - Core library for Tidemark
//!
//! This crate provides the migration file reader, view discovery, ledger
//! types, the ledger/file consistency validator, configuration parsing, and
//! the [`Reporter`] interface used by every Tidemark component.

pub mod config;
pub mod error;
pub mod ledger;
pub mod migration_file;
pub mod report;
pub mod sql_utils;
pub mod validate;
pub mod view;

pub use config::{Config, DatabaseConfig, DbType, ViewDropPolicy, ViewsConfig};
pub use error::{CoreError, CoreResult};
pub use ledger::{LedgerEntry, DEFAULT_LEDGER_TABLE};
pub use migration_file::{next_file_name, parse_file_name, read_migration_files, MigrationFile};
pub use report::{LogReporter, RecordingReporter, ReportLevel, Reporter};
pub use validate::{pending, validate_ledger};
pub use view::{discover_views, ViewDefinition, VIEWS_DIR};
