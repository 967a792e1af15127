//! View definition discovery
//!
//! Views live under `{migrations}/views/{name}.sql`. They are not versioned:
//! every migrate run drops each tracked view and recreates it from its file.

use crate::error::{CoreError, CoreResult};
use crate::report::Reporter;
use crate::sql_utils::is_qualified_identifier;
use std::path::{Path, PathBuf};

/// Name of the reserved views subdirectory
pub const VIEWS_DIR: &str = "views";

/// A view definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDefinition {
    /// View name (file name without `.sql`)
    pub name: String,

    /// Path to the SQL creating the view
    pub path: PathBuf,
}

impl ViewDefinition {
    /// Read the creation SQL for this view.
    pub fn read_sql(&self) -> CoreResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| CoreError::ReadError {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Discover view definitions under `{migrations_dir}/views`, sorted by name.
///
/// A missing views directory yields no views.
pub fn discover_views(migrations_dir: &Path, reporter: &dyn Reporter) -> CoreResult<Vec<ViewDefinition>> {
    let views_dir = migrations_dir.join(VIEWS_DIR);
    if !views_dir.is_dir() {
        log::debug!("No views directory at {}", views_dir.display());
        return Ok(Vec::new());
    }

    let read_error = |e| CoreError::ReadError {
        path: views_dir.display().to_string(),
        source: e,
    };
    let entries = std::fs::read_dir(&views_dir).map_err(read_error)?;

    let mut views = Vec::new();
    for entry in entries {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            reporter.warn(&format!(
                "Found directory \"{}\" in views directory",
                file_name
            ));
            continue;
        }

        let Some(name) = file_name.strip_suffix(".sql") else {
            reporter.warn(&format!("Skipping non-SQL file \"{}\" in views directory", file_name));
            continue;
        };

        if !is_qualified_identifier(name) {
            return Err(CoreError::InvalidViewName { file_name });
        }

        views.push(ViewDefinition {
            name: name.to_string(),
            path,
        });
    }

    views.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!("Discovered {} views in {}", views.len(), views_dir.display());
    Ok(views)
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
