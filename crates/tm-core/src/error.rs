//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {source}")]
    ConfigParseError {
        path: String,
        source: serde_yaml::Error,
    },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// T001: A directory or file could not be read
    #[error("[T001] Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// T002: Migration file name does not follow `m000_description.sql`
    #[error("[T002] invalid migration file name {file_name}, must be in format m000_description_text.sql")]
    MalformedFileName { file_name: String },

    /// T003: Two migration files share a sequence number
    #[error("[T003] Duplicate migration sequence {sequence:03}: '{first}' and '{second}'")]
    DuplicateSequence {
        sequence: i64,
        first: String,
        second: String,
    },

    /// T004: Ledger entry id differs from the file at the same position
    #[error("[T004] inconsistent migration state at position {position}, expected migration with id {expected}, got {actual}. this requires manual solution")]
    IdMismatch {
        position: usize,
        expected: i64,
        actual: i64,
    },

    /// T004: Ledger entry description differs from the file at the same position
    #[error("[T004] inconsistent migration state at position {position}, expected migration with description \"{expected}\", got \"{actual}\". this requires manual solution")]
    DescriptionMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    /// T004: Ledger records more migrations than exist on disk
    #[error("[T004] inconsistent migration state, ledger records migration {id} (\"{description}\") but no migration file exists at position {position}. this requires manual solution")]
    LedgerAhead {
        position: usize,
        id: i64,
        description: String,
    },

    /// T005: View file name is not a usable SQL identifier
    #[error("[T005] invalid view file name {file_name}, view names must be SQL identifiers")]
    InvalidViewName { file_name: String },

    /// T006: No sequence number is left for a new migration
    #[error("[T006] Migration sequence exhausted: next number {next} does not fit in three digits")]
    SequenceExhausted { next: i64 },

    /// T007: Description cannot be used in a migration file name
    #[error("[T007] invalid migration description \"{description}\": use letters, digits, spaces, '-' or '_'")]
    InvalidDescription { description: String },
}

impl CoreError {
    /// Whether this error reports a ledger/file divergence that needs an operator.
    pub fn is_consistency_error(&self) -> bool {
        matches!(
            self,
            CoreError::IdMismatch { .. }
                | CoreError::DescriptionMismatch { .. }
                | CoreError::LedgerAhead { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
