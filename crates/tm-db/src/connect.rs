//! Backend selection from configuration.

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::sqlite::SqliteBackend;
use crate::traits::Database;
use tm_core::{DatabaseConfig, DbType};

/// Open the backend named by `config`.
///
/// This is the only place a backend is chosen; everything downstream works
/// against `dyn Database`.
pub fn connect(config: &DatabaseConfig) -> DbResult<Box<dyn Database>> {
    let db: Box<dyn Database> = match config.db_type {
        DbType::DuckDb => Box::new(DuckDbBackend::new(&config.path)?),
        DbType::Sqlite => Box::new(SqliteBackend::new(&config.path)?),
    };
    log::debug!("Connected to {} database at {}", db.db_type(), config.path);
    Ok(db)
}
