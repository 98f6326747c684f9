//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::transaction::run_transactional;
use crate::value::{Row, SqlValue};
use async_trait::async_trait;
use chrono::DateTime;
use duckdb::types::{TimeUnit, ToSqlOutput, Value};
use duckdb::{params_from_iter, Connection, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter()))
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Run statements inside BEGIN / COMMIT, rolling back on the first error
    fn execute_transactional_sync(&self, statements: &[String]) -> DbResult<()> {
        let conn = self.lock()?;
        run_transactional("duckdb", statements, |sql| conn.execute_batch(sql))
    }

    /// Query rows synchronously
    ///
    /// Column count is read from each row rather than the statement, since
    /// DuckDB panics on `stmt.column_count()` before execution.
    fn query_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get::<_, Value>(i).map(from_duckdb_value))
                    .collect::<duckdb::Result<Vec<_>>>()
                    .map(Row::new)
            })
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.execute_sync(sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn execute_transactional(&self, statements: &[String]) -> DbResult<()> {
        self.execute_transactional_sync(statements)
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        self.query_sync(sql, params)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(n) => Value::BigInt(*n),
            SqlValue::Real(f) => Value::Double(*f),
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Boolean(b) => Value::Boolean(*b),
            SqlValue::Timestamp(ts) => {
                Value::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros())
            }
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

fn from_duckdb_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Boolean(b),
        Value::TinyInt(n) => SqlValue::Integer(n.into()),
        Value::SmallInt(n) => SqlValue::Integer(n.into()),
        Value::Int(n) => SqlValue::Integer(n.into()),
        Value::BigInt(n) => SqlValue::Integer(n),
        Value::UTinyInt(n) => SqlValue::Integer(n.into()),
        Value::USmallInt(n) => SqlValue::Integer(n.into()),
        Value::UInt(n) => SqlValue::Integer(n.into()),
        Value::HugeInt(n) => i64::try_from(n)
            .map(SqlValue::Integer)
            .unwrap_or(SqlValue::Real(n as f64)),
        Value::UBigInt(n) => i64::try_from(n)
            .map(SqlValue::Integer)
            .unwrap_or(SqlValue::Real(n as f64)),
        Value::Float(f) => SqlValue::Real(f.into()),
        Value::Double(f) => SqlValue::Real(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Timestamp(unit, n) => {
            let micros = match unit {
                TimeUnit::Second => n.saturating_mul(1_000_000),
                TimeUnit::Millisecond => n.saturating_mul(1_000),
                TimeUnit::Microsecond => n,
                TimeUnit::Nanosecond => n / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map(|dt| SqlValue::Timestamp(dt.naive_utc()))
                .unwrap_or(SqlValue::Integer(n))
        }
        other => SqlValue::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
