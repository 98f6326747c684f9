//! Consistency check between the migrations directory and recorded history

use crate::error::{MigrationError, MigrationResult};
use std::collections::BTreeSet;
use tm_core::MigrationFile;

/// Verify that `on_disk` can be reconciled with the recorded successes.
///
/// Every on-disk entry must carry the `.sql` extension, and every filename
/// recorded as successful must still exist on disk. When several recorded
/// files are missing, the lexicographically smallest one is reported.
pub fn check_integrity(
    recorded_successes: &BTreeSet<String>,
    on_disk: &[MigrationFile],
) -> MigrationResult<()> {
    let mut unaccounted = recorded_successes.clone();

    for file in on_disk {
        if !file.has_sql_extension() {
            return Err(MigrationError::InvalidExtension {
                filename: file.filename.clone(),
            });
        }
        unaccounted.remove(&file.filename);
    }

    match unaccounted.into_iter().next() {
        Some(filename) => Err(MigrationError::MissingRecordedFile { filename }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "integrity_test.rs"]
mod tests;
