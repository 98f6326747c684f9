//! Backend-independent transaction driver.

use crate::error::{DbError, DbResult};
use std::fmt::Display;

/// Run `statements` between BEGIN and COMMIT through `exec`.
///
/// The first failing statement rolls the transaction back and is reported as
/// [`DbError::StatementFailed`]. A failed COMMIT is rolled back too and
/// reported as [`DbError::TransactionError`]. ROLLBACK failures are logged,
/// the original error is returned.
pub(crate) fn run_transactional<E, F>(backend: &str, statements: &[String], mut exec: F) -> DbResult<()>
where
    E: Display,
    F: FnMut(&str) -> Result<(), E>,
{
    exec("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    for (index, statement) in statements.iter().enumerate() {
        log::debug!("{backend}: executing statement #{}: {}", index + 1, statement);
        if let Err(e) = exec(statement) {
            rollback(backend, &mut exec, "statement error");
            return Err(DbError::StatementFailed {
                index,
                statement: statement.clone(),
                message: e.to_string(),
            });
        }
    }

    if let Err(commit_err) = exec("COMMIT") {
        rollback(backend, &mut exec, "COMMIT error");
        return Err(DbError::TransactionError(format!(
            "COMMIT failed: {commit_err}"
        )));
    }
    Ok(())
}

fn rollback<E, F>(backend: &str, exec: &mut F, after: &str)
where
    E: Display,
    F: FnMut(&str) -> Result<(), E>,
{
    if let Err(e) = exec("ROLLBACK") {
        log::warn!("{backend}: ROLLBACK failed after {after}: {e}");
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
