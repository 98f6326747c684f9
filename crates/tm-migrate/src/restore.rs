//! Clearing failed migration records

use crate::error::MigrationResult;
use crate::history_store::HistoryStore;
use tm_db::Database;

/// Delete every failed record from `history_table`, returning the count.
///
/// Run this after fixing a failed migration file; the next `migrate` then
/// retries it. Successful records are never touched.
pub async fn restore(db: &dyn Database, history_table: &str) -> MigrationResult<usize> {
    let history = HistoryStore::new(db, history_table)?;
    history.ensure_schema().await?;

    let failed = history.failed_filenames().await?;
    let deleted = history.delete_failed().await?;
    if deleted > 0 {
        log::info!(
            "Removed {} failed record(s) for {}",
            deleted,
            failed.join(", ")
        );
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tm_core::HistoryRecord;
    use tm_db::SqliteBackend;

    #[tokio::test]
    async fn test_restore_empty_history() {
        let db = SqliteBackend::in_memory().unwrap();
        assert_eq!(restore(&db, "history").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restore_keeps_successes() {
        let db = SqliteBackend::in_memory().unwrap();
        let history = HistoryStore::new(&db, "history").unwrap();
        history.ensure_schema().await.unwrap();
        let now = Utc::now().naive_utc();
        history
            .append(&HistoryRecord::new(1, "a.sql", now, 3, true))
            .await
            .unwrap();
        history
            .append(&HistoryRecord::new(2, "b.sql", now, 3, false))
            .await
            .unwrap();

        assert_eq!(restore(&db, "history").await.unwrap(), 1);

        let records = history.all_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "a.sql");
    }
}
