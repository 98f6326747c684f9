//! Migration engine for Tidemark.
//!
//! Reconciles the `.sql` files of a migrations directory against the
//! persisted migration history, decides which files are pending, executes
//! each one in its own transaction, and records every attempt (including
//! failures) so that a re-run is safe and resumes where the last one stopped.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = tm_db::DuckDbBackend::new("app.duckdb")?;
//! tm_migrate::migrate(&db, std::path::Path::new("migrations")).await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod history_store;
pub mod integrity;
pub mod lock;
pub mod planner;
pub mod restore;
pub mod status;

pub use engine::{migrate, MigrationReport, Migrator, MigratorOptions};
pub use error::{MigrationError, MigrationResult};
pub use history_store::HistoryStore;
pub use integrity::check_integrity;
pub use lock::{LockGuard, LockHolder, MigrationLock};
pub use planner::{build_plan, FileState, MigrationPlan, PlannedFile, ResumePoint};
pub use restore::restore;
pub use status::status;
