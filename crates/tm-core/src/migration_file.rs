//! Migration file discovery and file name parsing
//!
//! A migrations directory holds one `m<NNN>_<description>.sql` file per
//! migration, plus an optional `views/` subdirectory handled by
//! [`crate::view`].

use crate::error::{CoreError, CoreResult};
use crate::report::Reporter;
use crate::view::VIEWS_DIR;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static FILE_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn file_name_re() -> &'static Regex {
    FILE_NAME_RE.get_or_init(|| Regex::new(r"^m(\d{3})_(.+)\.sql$").expect("valid regex"))
}

/// Highest sequence number expressible in the three-digit file name prefix
pub const MAX_SEQUENCE: i64 = 999;

/// A migration file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Sequence number parsed from the `mNNN` prefix
    pub sequence: i64,

    /// Text between the prefix and the `.sql` suffix
    pub description: String,

    /// Bare file name, e.g. `m001_add_users.sql`
    pub file_name: String,

    /// Full path used to load the SQL body
    pub path: PathBuf,
}

impl MigrationFile {
    /// Read the SQL body of this migration.
    pub fn read_sql(&self) -> CoreResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| CoreError::ReadError {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Split a migration file name into `(sequence, description)`.
pub fn parse_file_name(file_name: &str) -> CoreResult<(i64, String)> {
    let malformed = || CoreError::MalformedFileName {
        file_name: file_name.to_string(),
    };
    let caps = file_name_re().captures(file_name).ok_or_else(malformed)?;
    let sequence = caps[1].parse::<i64>().map_err(|_| malformed())?;
    Ok((sequence, caps[2].to_string()))
}

/// List `dir` non-recursively and parse every migration file in it.
///
/// The `views` subdirectory is skipped silently, any other subdirectory is
/// reported as a warning and skipped. A file whose name does not parse aborts
/// the whole read so that no partial migration set is ever acted on.
///
/// The result is sorted by sequence number; two files with the same number
/// are rejected.
pub fn read_migration_files(dir: &Path, reporter: &dyn Reporter) -> CoreResult<Vec<MigrationFile>> {
    let read_error = |e| CoreError::ReadError {
        path: dir.display().to_string(),
        source: e,
    };
    let entries = std::fs::read_dir(dir).map_err(read_error)?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            if file_name != VIEWS_DIR {
                reporter.warn(&format!(
                    "Found directory \"{}\" in migrations directory",
                    file_name
                ));
            }
            continue;
        }

        let (sequence, description) = parse_file_name(&file_name)?;
        files.push(MigrationFile {
            sequence,
            description,
            file_name,
            path,
        });
    }

    files.sort_by_key(|f| f.sequence);
    if let Some(pair) = files.windows(2).find(|w| w[0].sequence == w[1].sequence) {
        return Err(CoreError::DuplicateSequence {
            sequence: pair[0].sequence,
            first: pair[0].file_name.clone(),
            second: pair[1].file_name.clone(),
        });
    }

    log::debug!(
        "Read {} migration files from {}",
        files.len(),
        dir.display()
    );
    Ok(files)
}

/// File name for a new migration appended after `files`.
///
/// The description is lower-cased and spaces/dashes become underscores.
pub fn next_file_name(files: &[MigrationFile], description: &str) -> CoreResult<String> {
    let next = files.iter().map(|f| f.sequence + 1).max().unwrap_or(0);
    if next > MAX_SEQUENCE {
        return Err(CoreError::SequenceExhausted { next });
    }

    let sanitized = description
        .trim()
        .to_lowercase()
        .replace(['-', ' '], "_");
    let valid = !sanitized.is_empty()
        && sanitized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(CoreError::InvalidDescription {
            description: description.to_string(),
        });
    }

    let file_name = format!("m{:03}_{}.sql", next, sanitized);
    parse_file_name(&file_name)?;
    Ok(file_name)
}

#[cfg(test)]
#[path = "migration_file_test.rs"]
mod tests;
