//! Read-only view of the migration history

use crate::error::MigrationResult;
use crate::history_store::HistoryStore;
use tm_core::HistoryRecord;
use tm_db::Database;

/// All history records ordered by rank ascending.
///
/// The history relation is created if missing so that status works on a
/// fresh database.
pub async fn status(db: &dyn Database, history_table: &str) -> MigrationResult<Vec<HistoryRecord>> {
    let history = HistoryStore::new(db, history_table)?;
    history.ensure_schema().await?;
    history.all_records().await
}
