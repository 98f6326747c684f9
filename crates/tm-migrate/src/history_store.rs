//! Persistence of migration attempts in the history relation.

use crate::error::{schema_err, MigrationError, MigrationResult};
use std::collections::BTreeSet;
use tm_core::{is_plain_identifier, HistoryRecord};
use tm_db::{Database, DbResult, Row, SqlValue};

const RECORD_COLUMNS: &str = "installed_rank, filename, installed_on, execution_time_ms, success";

/// Typed access to the history relation.
///
/// Every method is a single statement against the backend; none of them opens
/// a transaction, so [`HistoryStore::append`] can run right after a
/// migration's own transaction was rolled back.
pub struct HistoryStore<'a> {
    db: &'a dyn Database,
    table: String,
}

impl<'a> HistoryStore<'a> {
    /// Bind the store to `table`, which must be a plain SQL identifier
    pub fn new(db: &'a dyn Database, table: impl Into<String>) -> MigrationResult<Self> {
        let table = table.into();
        if !is_plain_identifier(&table) {
            return Err(MigrationError::InvalidTableName { name: table });
        }
        Ok(Self { db, table })
    }

    /// Name of the history relation
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the history relation if it does not exist yet
    pub async fn ensure_schema(&self) -> MigrationResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                installed_rank BIGINT NOT NULL,
                filename TEXT NOT NULL,
                installed_on TIMESTAMP NOT NULL,
                execution_time_ms BIGINT NOT NULL,
                success BOOLEAN NOT NULL
            )",
            self.table
        );
        self.db
            .execute_batch(&sql)
            .await
            .map_err(schema_err(format!("failed to create {}", self.table)))
    }

    /// Every recorded filename, successful or not
    pub async fn all_filenames(&self) -> MigrationResult<BTreeSet<String>> {
        let sql = format!("SELECT DISTINCT filename FROM {}", self.table);
        self.filename_set(&sql, "failed to read recorded filenames")
            .await
    }

    /// Filenames of successful attempts
    pub async fn successful_filenames(&self) -> MigrationResult<BTreeSet<String>> {
        let sql = format!(
            "SELECT DISTINCT filename FROM {} WHERE success = TRUE",
            self.table
        );
        self.filename_set(&sql, "failed to read successful filenames")
            .await
    }

    /// Filenames of failed attempts, in rank order
    pub async fn failed_filenames(&self) -> MigrationResult<Vec<String>> {
        let sql = format!(
            "SELECT filename FROM {} WHERE success = FALSE ORDER BY installed_rank, filename",
            self.table
        );
        let rows = self
            .query(&sql, "failed to read failed filenames")
            .await?;
        let mut names: Vec<String> = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = row
                .get_string(0)
                .map_err(schema_err("failed to decode filename"))?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Highest rank among successful records, 0 when there are none
    pub async fn max_successful_rank(&self) -> MigrationResult<i64> {
        let sql = format!(
            "SELECT COALESCE(MAX(installed_rank), 0) FROM {} WHERE success = TRUE",
            self.table
        );
        let rows = self
            .query(&sql, "failed to read the highest installed rank")
            .await?;
        match rows.first() {
            Some(row) if !row.get(0).is_null() => row
                .get_i64(0)
                .map_err(schema_err("failed to decode installed rank")),
            _ => Ok(0),
        }
    }

    /// Whether any attempt is recorded as failed
    pub async fn has_failed_record(&self) -> MigrationResult<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE success = FALSE",
            self.table
        );
        let rows = self
            .query(&sql, "failed to look for failed migrations")
            .await?;
        let count = match rows.first() {
            Some(row) => row
                .get_i64(0)
                .map_err(schema_err("failed to decode failed-record count"))?,
            None => 0,
        };
        Ok(count > 0)
    }

    /// Filename of the successful record with the highest rank
    pub async fn last_successful_filename(&self) -> MigrationResult<Option<String>> {
        let sql = format!(
            "SELECT filename FROM {} WHERE success = TRUE ORDER BY installed_rank DESC LIMIT 1",
            self.table
        );
        let rows = self
            .query(&sql, "failed to read the last successful migration")
            .await?;
        rows.first()
            .map(|row| row.get_string(0))
            .transpose()
            .map_err(schema_err("failed to decode filename"))
    }

    /// Append one record
    pub async fn append(&self, record: &HistoryRecord) -> MigrationResult<()> {
        self.append_raw(record).await.map_err(schema_err(format!(
            "failed to record migration {}",
            record.filename
        )))
    }

    /// Like [`HistoryStore::append`], surfacing the raw backend error
    pub(crate) async fn append_raw(&self, record: &HistoryRecord) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {} ({RECORD_COLUMNS}) VALUES (?, ?, ?, ?, ?)",
            self.table
        );
        let params = [
            SqlValue::Integer(record.installed_rank),
            SqlValue::Text(record.filename.clone()),
            SqlValue::Timestamp(record.installed_on),
            SqlValue::Integer(record.execution_time_ms),
            SqlValue::Boolean(record.success),
        ];
        self.db.execute(&sql, &params).await.map(|_| ())
    }

    /// All records ordered by rank ascending
    pub async fn all_records(&self) -> MigrationResult<Vec<HistoryRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM {} ORDER BY installed_rank, installed_on",
            self.table
        );
        let rows = self.query(&sql, "failed to read migration history").await?;
        rows.iter()
            .map(record_from_row)
            .collect::<DbResult<Vec<_>>>()
            .map_err(schema_err("failed to decode history record"))
    }

    /// Delete every failed record, returning how many were removed
    pub async fn delete_failed(&self) -> MigrationResult<usize> {
        let sql = format!("DELETE FROM {} WHERE success = FALSE", self.table);
        self.db
            .execute(&sql, &[])
            .await
            .map_err(schema_err("failed to delete failed records"))
    }

    async fn query(&self, sql: &str, context: &str) -> MigrationResult<Vec<Row>> {
        self.db.query(sql, &[]).await.map_err(schema_err(context))
    }

    async fn filename_set(&self, sql: &str, context: &str) -> MigrationResult<BTreeSet<String>> {
        let rows = self.query(sql, context).await?;
        rows.iter()
            .map(|row| row.get_string(0))
            .collect::<DbResult<BTreeSet<_>>>()
            .map_err(schema_err("failed to decode filename"))
    }
}

fn record_from_row(row: &Row) -> DbResult<HistoryRecord> {
    Ok(HistoryRecord {
        installed_rank: row.get_i64(0)?,
        filename: row.get_string(1)?,
        installed_on: row.get_datetime(2)?,
        execution_time_ms: row.get_i64(3)?,
        success: row.get_bool(4)?,
    })
}

#[cfg(test)]
#[path = "history_store_test.rs"]
mod tests;
