//! Ledger/file consistency validation
//!
//! The ledger must be a prefix of the migration files: entry `i` records
//! file `i`, with the same id and description. Any divergence is reported and
//! left for an operator to resolve.

use crate::error::{CoreError, CoreResult};
use crate::ledger::LedgerEntry;
use crate::migration_file::MigrationFile;

/// Check that `ledger` is a prefix of `files`, failing on the first mismatch.
pub fn validate_ledger(files: &[MigrationFile], ledger: &[LedgerEntry]) -> CoreResult<()> {
    for (position, entry) in ledger.iter().enumerate() {
        let Some(file) = files.get(position) else {
            return Err(CoreError::LedgerAhead {
                position,
                id: entry.id,
                description: entry.description.clone(),
            });
        };

        if entry.id != file.sequence {
            return Err(CoreError::IdMismatch {
                position,
                expected: file.sequence,
                actual: entry.id,
            });
        }
        if entry.description != file.description {
            return Err(CoreError::DescriptionMismatch {
                position,
                expected: file.description.clone(),
                actual: entry.description.clone(),
            });
        }
    }
    Ok(())
}

/// Files not yet recorded in a validated `ledger`.
///
/// Callers must run [`validate_ledger`] first; the result is simply the
/// suffix of `files` after the ledger's length.
pub fn pending<'a>(files: &'a [MigrationFile], ledger: &[LedgerEntry]) -> &'a [MigrationFile] {
    files.get(ledger.len()..).unwrap_or(&[])
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
