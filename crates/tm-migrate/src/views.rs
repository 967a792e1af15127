//! View rebuilder
//!
//! Views are owned by the migration directory: every apply run drops each
//! tracked view before migrating and recreates it afterwards, whether or not
//! any migration was pending.

use crate::error::{MigrateError, MigrateResult};
use tm_core::{Reporter, ViewDefinition, ViewDropPolicy};
use tm_db::Database;

/// Drop every tracked view.
///
/// Under [`ViewDropPolicy::Warn`] a failed drop is reported and the next view
/// is tried; under [`ViewDropPolicy::Fail`] it aborts the run.
pub async fn drop_views(
    db: &dyn Database,
    views: &[ViewDefinition],
    policy: ViewDropPolicy,
    reporter: &dyn Reporter,
) -> MigrateResult<()> {
    if views.is_empty() {
        return Ok(());
    }
    reporter.step("Dropping views");

    for view in views {
        match db.drop_view_if_exists(&view.name).await {
            Ok(()) => log::debug!("Dropped view {}", view.name),
            Err(source) => match policy {
                ViewDropPolicy::Fail => {
                    return Err(MigrateError::ViewDrop {
                        name: view.name.clone(),
                        source,
                    })
                }
                ViewDropPolicy::Warn => {
                    reporter.warn(&format!("Could not drop view {}: {source}", view.name));
                }
            },
        }
    }
    Ok(())
}

/// Create every tracked view from its definition file, stopping at the first
/// failure. Returns the number of views created.
pub async fn create_views(
    db: &dyn Database,
    views: &[ViewDefinition],
    reporter: &dyn Reporter,
) -> MigrateResult<usize> {
    if views.is_empty() {
        return Ok(0);
    }
    reporter.step("Setting up views");

    for view in views {
        let sql = view.read_sql()?;
        if sql.trim().is_empty() {
            return Err(MigrateError::EmptyView {
                name: view.name.clone(),
            });
        }
        db.execute_batch(&sql)
            .await
            .map_err(|source| MigrateError::ViewCreate {
                name: view.name.clone(),
                source,
            })?;
        reporter.info(&format!("View {} created", view.name));
    }

    reporter.success("All views are set up");
    Ok(views.len())
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
