//! Migration file discovery and statement splitting.
//!
//! A migration is a single `.sql` file. Its filename is both its display name
//! and its ordering key: files apply in plain lexicographic (byte) order, so
//! callers encode dates or sequence numbers in the name prefix
//! (`v20240101_create_users_00001.sql`).

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Suffix a migration file name must end with
pub const SQL_EXTENSION: &str = ".sql";

/// One entry of the migrations directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// File name, used as identity and sort key
    pub filename: String,

    /// Full path to the file
    pub path: PathBuf,
}

impl MigrationFile {
    /// Build an entry for `filename` inside `dir`
    pub fn new(dir: &Path, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            path: dir.join(&filename),
            filename,
        }
    }

    /// Whether the filename ends in `.sql` (case-sensitive).
    ///
    /// A file named just `.sql` qualifies.
    pub fn has_sql_extension(&self) -> bool {
        self.filename.ends_with(SQL_EXTENSION)
    }

    /// Read the file and split it into executable statements.
    ///
    /// Content is only read here, never during discovery.
    pub fn read_statements(&self) -> CoreResult<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| CoreError::IoWithPath {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(split_statements(&content))
    }
}

/// List every entry of `dir`, sorted ascending by filename.
///
/// No filtering happens here: sub-directories and files with other
/// extensions are returned too, and rejected later by the integrity check.
pub fn list_files(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    let unreadable = |e: std::io::Error| CoreError::MigrationsDirUnreadable {
        path: dir.display().to_string(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        files.push(MigrationFile::new(dir, filename));
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}

/// Split raw SQL on `;`, trimming each fragment and dropping empty ones.
///
/// The split is purely textual: a `;` inside a string literal or comment
/// also ends a statement.
pub fn split_statements(content: &str) -> Vec<String> {
    content
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "migration_file_test.rs"]
mod tests;
