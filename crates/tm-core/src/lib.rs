//! tm-core - Core library for Tidemark
//!
//! This crate provides the shared types used across all Tidemark components:
//! configuration parsing, migration file discovery, and the history record
//! model persisted by the migration engine.

pub mod config;
pub mod error;
pub mod history;
pub mod migration_file;
pub(crate) mod serde_helpers;

pub use config::{is_plain_identifier, Config, DatabaseConfig, DbType, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use history::HistoryRecord;
pub use migration_file::{list_files, split_statements, MigrationFile, SQL_EXTENSION};
