//! Migration execution engine.
//!
//! One run walks the sorted migrations directory and applies every pending
//! file in its own transaction. Each attempt is written in two phases: the
//! attempt phase runs the file's statements transactionally, then the record
//! phase appends a history row whose `success` reflects the attempt. The
//! record phase runs even when the attempt rolled back, so a failure stays
//! visible and blocks later runs until it is restored.

use crate::error::{MigrationError, MigrationResult};
use crate::history_store::HistoryStore;
use crate::integrity::check_integrity;
use crate::lock::MigrationLock;
use crate::planner::{build_plan, FileState, MigrationPlan, ResumePoint};
use chrono::Utc;
use std::path::Path;
use std::time::{Duration, Instant};
use tm_core::{list_files, Config, HistoryRecord, MigrationFile};
use tm_db::{Database, DbError};

/// Tunables for a [`Migrator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorOptions {
    /// History relation name; the lock relation is `<history_table>_lock`
    pub history_table: String,

    /// How long to wait for a concurrent run to release the lock
    pub lock_timeout: Duration,
}

impl MigratorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            history_table: config.history_table.clone(),
            lock_timeout: Duration::from_secs(config.lock_timeout_secs),
        }
    }

    fn lock_table(&self) -> String {
        format!("{}_lock", self.history_table)
    }
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Records written for the files applied by this run, in order
    pub applied: Vec<HistoryRecord>,

    /// Files skipped because they were already recorded
    pub already_recorded: usize,

    /// Unrecorded files skipped because they sort before the resume point
    pub skipped_before_resume_point: Vec<String>,

    /// Wall-clock duration of the whole run
    pub elapsed: Duration,
}

impl MigrationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// Applies the migrations of a directory to one database
pub struct Migrator<'a> {
    db: &'a dyn Database,
    history: HistoryStore<'a>,
    lock: MigrationLock<'a>,
}

impl<'a> Migrator<'a> {
    /// Migrator with the default history table and lock timeout
    pub fn new(db: &'a dyn Database) -> MigrationResult<Self> {
        Self::with_options(db, MigratorOptions::default())
    }

    pub fn with_options(db: &'a dyn Database, options: MigratorOptions) -> MigrationResult<Self> {
        let history = HistoryStore::new(db, options.history_table.clone())?;
        let lock = MigrationLock::new(db, options.lock_table(), options.lock_timeout);
        Ok(Self { db, history, lock })
    }

    pub fn history(&self) -> &HistoryStore<'a> {
        &self.history
    }

    pub fn lock(&self) -> &MigrationLock<'a> {
        &self.lock
    }

    /// Apply every pending migration in `dir` under the migration lock.
    ///
    /// The lock is released whether the run succeeds or fails.
    pub async fn run(&self, dir: &Path) -> MigrationResult<MigrationReport> {
        let started = Instant::now();
        let guard = self.lock.acquire().await?;

        let result = self.run_locked(dir).await;

        if let Err(e) = self.lock.release(guard).await {
            log::error!("{e}");
        }

        result.map(|mut report| {
            report.elapsed = started.elapsed();
            report
        })
    }

    /// Decide what a run would do without executing or recording anything.
    ///
    /// Creates the history relation if needed, checks integrity, refuses
    /// to plan past an unresolved failure, then classifies every file.
    /// File contents are never read.
    pub async fn plan(&self, dir: &Path) -> MigrationResult<MigrationPlan> {
        self.history.ensure_schema().await?;

        let files = list_files(dir)?;
        let successes = self.history.successful_filenames().await?;
        check_integrity(&successes, &files)?;

        let resume = ResumePoint::load(&self.history).await?;
        if resume.blocked {
            return Err(MigrationError::Blocked {
                filenames: self.history.failed_filenames().await?,
            });
        }

        let recorded = self.history.all_filenames().await?;
        Ok(build_plan(files, &recorded, &resume))
    }

    async fn run_locked(&self, dir: &Path) -> MigrationResult<MigrationReport> {
        let plan = self.plan(dir).await?;

        let mut report = MigrationReport {
            already_recorded: plan.files_in(FileState::AlreadyRecorded).count(),
            skipped_before_resume_point: plan
                .files_in(FileState::BeforeResumePoint)
                .map(|f| f.filename.clone())
                .collect(),
            ..Default::default()
        };

        if plan.is_up_to_date() {
            log::info!("No pending migrations in {}", dir.display());
            return Ok(report);
        }

        let mut rank = plan.start_rank;
        for file in plan.pending() {
            rank += 1;
            let record = self.apply(file, rank).await?;
            log::info!(
                "Applied {} (rank {}, {} ms)",
                record.filename,
                record.installed_rank,
                record.execution_time_ms
            );
            report.applied.push(record);
        }

        Ok(report)
    }

    /// Attempt one file, then record the attempt.
    async fn apply(&self, file: &MigrationFile, rank: i64) -> MigrationResult<HistoryRecord> {
        let statements = file.read_statements()?;
        log::debug!(
            "Executing {} ({} statement(s))",
            file.filename,
            statements.len()
        );

        let installed_on = Utc::now().naive_utc();
        let started = Instant::now();
        let attempt = self.db.execute_transactional(&statements).await;
        let execution_time_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

        let record = HistoryRecord::new(
            rank,
            file.filename.clone(),
            installed_on,
            execution_time_ms,
            attempt.is_ok(),
        );

        let attempt_err = match attempt {
            Ok(()) => {
                self.history.append(&record).await?;
                return Ok(record);
            }
            Err(e) => e,
        };

        let recorded = self.history.append_raw(&record).await;
        let err = attempt_error(&file.filename, attempt_err, recorded.err());
        log::error!("{err}");
        Err(err)
    }
}

/// Turn a failed attempt into the engine error, folding in a failed record phase
fn attempt_error(
    filename: &str,
    attempt: DbError,
    record_error: Option<DbError>,
) -> MigrationError {
    let filename = filename.to_string();
    match (attempt, record_error) {
        (
            DbError::StatementFailed {
                statement, message, ..
            },
            None,
        ) => MigrationError::Execution {
            filename,
            statement,
            message,
        },
        (
            DbError::StatementFailed {
                statement, message, ..
            },
            Some(record_error),
        ) => MigrationError::FailureNotRecorded {
            filename,
            statement,
            message,
            record_error,
        },
        (other, None) => MigrationError::Transaction {
            filename,
            source: other,
        },
        (other, Some(record_error)) => MigrationError::FailureNotRecorded {
            filename,
            statement: String::new(),
            message: other.to_string(),
            record_error,
        },
    }
}

/// Apply every pending migration in `dir` with default options.
///
/// Shorthand for [`Migrator::new`] followed by [`Migrator::run`].
pub async fn migrate(db: &dyn Database, dir: &Path) -> MigrationResult<()> {
    Migrator::new(db)?.run(dir).await.map(|_| ())
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
