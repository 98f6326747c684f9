//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the `Database` trait and its DuckDB and SQLite
//! implementations. A backend is chosen once at startup with [`connect`] and
//! handed to the migration engine as `&dyn Database`.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod sqlite;
pub mod traits;
mod transaction;
pub mod value;

pub use crate::connect::connect;
pub use crate::duckdb::DuckDbBackend;
pub use crate::error::{DbError, DbResult};
pub use crate::sqlite::SqliteBackend;
pub use crate::traits::Database;
pub use crate::value::{Row, SqlValue};
