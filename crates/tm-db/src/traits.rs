//! Database trait definition

use crate::error::DbResult;
use crate::value::{Row, SqlValue};
use async_trait::async_trait;

/// Database abstraction trait for Tidemark
///
/// Implementations must be Send + Sync for async operation. Every call runs
/// to completion before returning, so statements issued by one caller are
/// strictly ordered.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one statement with bound parameters, returns affected rows
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute multiple `;`-separated statements without parameters
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute `statements` in order inside a single transaction.
    ///
    /// On the first failing statement the transaction is rolled back, no
    /// later statement runs, and [`DbError::StatementFailed`] reports which
    /// one failed. All statements commit together otherwise.
    ///
    /// [`DbError::StatementFailed`]: crate::error::DbError::StatementFailed
    async fn execute_transactional(&self, statements: &[String]) -> DbResult<()>;

    /// Run a query and collect every row
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
