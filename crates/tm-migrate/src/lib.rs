//! tm-migrate - Migration engine for Tidemark
//!
//! Orders migration files, cross-checks them against the ledger of applied
//! migrations, applies each pending migration in its own transaction, and
//! rebuilds views around the apply step.
//!
//! An apply run is: read files → read ledger → validate → drop views →
//! apply pending → create views. Ensure mode stops after validation and
//! additionally requires nothing to be pending.

pub mod apply;
pub mod error;
pub mod ledger;
pub mod migrator;
pub mod views;

#[cfg(test)]
pub(crate) mod test_utils;

pub use apply::apply_pending;
pub use error::{MigrateError, MigrateResult};
pub use migrator::{
    EnsureReport, MigrateReport, Migrator, MigratorOptions, StatusReport, StatusRow,
};
