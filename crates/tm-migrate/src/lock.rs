//! Table-based migration lock.
//!
//! A single-row lock relation (`<history_table>_lock`) guards a run against
//! concurrent runs on the same database. The process whose row is present
//! holds the lock:
//!
//! 1. insert row `lock_id = 1` with a fresh owner id, ignoring conflicts
//! 2. read the row back; if the owner is ours, the lock is held
//! 3. otherwise sleep and retry until the timeout elapses
//!
//! Release deletes only our own row. A crashed run leaves its row behind;
//! `tidemark unlock` clears it.

use crate::error::{lock_err, MigrationError, MigrationResult};
use chrono::{NaiveDateTime, Utc};
use std::time::{Duration, Instant};
use tm_db::{Database, SqlValue};
use uuid::Uuid;

const LOCK_ID: i64 = 1;

/// Delay between acquisition attempts
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Current occupant of the lock row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolder {
    pub owner: String,
    pub acquired_at: NaiveDateTime,
}

/// Proof of lock ownership, consumed by [`MigrationLock::release`]
#[derive(Debug)]
#[must_use = "the migration lock stays held until released"]
pub struct LockGuard {
    owner: String,
}

impl LockGuard {
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// Migration lock backed by a relation in the target database
pub struct MigrationLock<'a> {
    db: &'a dyn Database,
    table: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a> MigrationLock<'a> {
    /// Create a lock over `table`. The name is assumed to be validated.
    pub fn new(db: &'a dyn Database, table: impl Into<String>, timeout: Duration) -> Self {
        Self {
            db,
            table: table.into(),
            timeout,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the delay between attempts
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the lock relation if absent
    pub async fn ensure_schema(&self) -> MigrationResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                lock_id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                acquired_at TIMESTAMP NOT NULL
            )",
            self.table
        );
        self.db
            .execute_batch(&sql)
            .await
            .map_err(lock_err(format!("failed to create {}", self.table)))
    }

    /// Wait for the lock, giving up after the configured timeout
    pub async fn acquire(&self) -> MigrationResult<LockGuard> {
        self.ensure_schema().await?;

        let owner = Uuid::new_v4().to_string();
        let insert = format!(
            "INSERT INTO {} (lock_id, owner, acquired_at) VALUES (?, ?, ?) ON CONFLICT DO NOTHING",
            self.table
        );
        let start = Instant::now();

        loop {
            let params = [
                SqlValue::Integer(LOCK_ID),
                SqlValue::Text(owner.clone()),
                SqlValue::Timestamp(Utc::now().naive_utc()),
            ];
            self.db
                .execute(&insert, &params)
                .await
                .map_err(lock_err("failed to insert lock row"))?;

            let holder = self.holder().await?;
            if let Some(holder) = &holder {
                if holder.owner == owner {
                    log::debug!("Acquired migration lock {} as {}", self.table, owner);
                    return Ok(LockGuard { owner });
                }
            }

            let waited = start.elapsed();
            if waited >= self.timeout {
                let (holder_owner, acquired_at) = match holder {
                    Some(h) => (h.owner, h.acquired_at.to_string()),
                    None => ("<unknown>".to_string(), "<unknown>".to_string()),
                };
                return Err(MigrationError::LockTimeout {
                    owner: holder_owner,
                    acquired_at,
                    waited,
                });
            }

            if let Some(h) = &holder {
                log::info!(
                    "Waiting for migration lock held by {} since {}",
                    h.owner,
                    h.acquired_at
                );
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Release a lock acquired by this process
    pub async fn release(&self, guard: LockGuard) -> MigrationResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE lock_id = ? AND owner = ?",
            self.table
        );
        let params = [SqlValue::Integer(LOCK_ID), SqlValue::Text(guard.owner)];
        let deleted = self
            .db
            .execute(&sql, &params)
            .await
            .map_err(lock_err("failed to release lock"))?;
        if deleted == 0 {
            log::warn!("Migration lock {} was already gone on release", self.table);
        }
        Ok(())
    }

    /// Current lock row, if any
    pub async fn holder(&self) -> MigrationResult<Option<LockHolder>> {
        let sql = format!(
            "SELECT owner, acquired_at FROM {} WHERE lock_id = ?",
            self.table
        );
        let rows = self
            .db
            .query(&sql, &[SqlValue::Integer(LOCK_ID)])
            .await
            .map_err(lock_err("failed to read lock row"))?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let owner = row
            .get_string(0)
            .map_err(lock_err("failed to decode lock row"))?;
        let acquired_at = row
            .get_datetime(1)
            .map_err(lock_err("failed to decode lock row"))?;
        Ok(Some(LockHolder { owner, acquired_at }))
    }

    /// Delete the lock row regardless of owner. Returns whether one existed.
    pub async fn force_release(&self) -> MigrationResult<bool> {
        self.ensure_schema().await?;
        let sql = format!("DELETE FROM {}", self.table);
        let deleted = self
            .db
            .execute(&sql, &[])
            .await
            .map_err(lock_err("failed to clear lock"))?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod tests;
