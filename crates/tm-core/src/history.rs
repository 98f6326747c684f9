//! History record model for the migration history relation.

use chrono::NaiveDateTime;
use serde::Serialize;

/// One attempted migration, as persisted in the history relation.
///
/// Records are append-only: the engine writes one per attempt (success or
/// failure) and never updates it. Only `restore` deletes rows, and only
/// failed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    /// Audit ordinal, one higher than the previous successful attempt
    pub installed_rank: i64,

    /// Migration filename
    pub filename: String,

    /// When the attempt started (UTC)
    pub installed_on: NaiveDateTime,

    /// Wall-clock duration of the attempt
    pub execution_time_ms: i64,

    /// Whether every statement of the file committed
    pub success: bool,
}

impl HistoryRecord {
    /// Create a new `HistoryRecord`
    pub fn new(
        installed_rank: i64,
        filename: impl Into<String>,
        installed_on: NaiveDateTime,
        execution_time_ms: i64,
        success: bool,
    ) -> Self {
        Self {
            installed_rank,
            filename: filename.into(),
            installed_on,
            execution_time_ms,
            success,
        }
    }

    /// "Yes" / "No" rendering of the success flag
    pub fn success_label(&self) -> &'static str {
        if self.success {
            "Yes"
        } else {
            "No"
        }
    }
}
