//! Resume planning: which files to run, starting at which rank.

use crate::error::MigrationResult;
use crate::history_store::HistoryStore;
use std::collections::BTreeSet;
use tm_core::MigrationFile;

/// Where the previous run left off
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResumePoint {
    /// Highest rank among successful records (0 on a fresh history)
    pub start_rank: i64,

    /// Filename of the successful record with that rank
    pub last_successful: Option<String>,

    /// Whether any failed record is still present
    pub blocked: bool,
}

impl ResumePoint {
    /// Read the resume point from the history relation
    pub async fn load(history: &HistoryStore<'_>) -> MigrationResult<Self> {
        Ok(Self {
            start_rank: history.max_successful_rank().await?,
            last_successful: history.last_successful_filename().await?,
            blocked: history.has_failed_record().await?,
        })
    }

    /// Whether `filename` sorts strictly after the last successful migration.
    ///
    /// Everything is past the resume point on a fresh history.
    pub fn is_past(&self, filename: &str) -> bool {
        match &self.last_successful {
            Some(last) => filename > last.as_str(),
            None => true,
        }
    }
}

/// What a run does with one on-disk file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Will be executed
    Pending,
    /// Already has a history record
    AlreadyRecorded,
    /// Unrecorded, but sorts at or before the last successful migration
    BeforeResumePoint,
}

impl FileState {
    pub fn label(&self) -> &'static str {
        match self {
            FileState::Pending => "pending",
            FileState::AlreadyRecorded => "applied",
            FileState::BeforeResumePoint => "skipped (before resume point)",
        }
    }
}

/// One on-disk file and its planned fate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub file: MigrationFile,
    pub state: FileState,
}

/// Ordered decision for every file in the migrations directory
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationPlan {
    /// Rank of the last successful migration; new ranks count up from here
    pub start_rank: i64,

    /// Every on-disk file in execution order
    pub files: Vec<PlannedFile>,
}

impl MigrationPlan {
    /// Files that will be executed, in order
    pub fn pending(&self) -> impl Iterator<Item = &MigrationFile> {
        self.files_in(FileState::Pending)
    }

    /// Files in the given state, in order
    pub fn files_in(&self, state: FileState) -> impl Iterator<Item = &MigrationFile> {
        self.files
            .iter()
            .filter(move |planned| planned.state == state)
            .map(|planned| &planned.file)
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending_count() == 0
    }
}

/// Decide the fate of every sorted on-disk file.
///
/// Recorded files are skipped. Unrecorded files are only selected once the
/// walk passes the last successful filename; earlier ones are never run
/// retroactively.
pub fn build_plan(
    files: Vec<MigrationFile>,
    recorded: &BTreeSet<String>,
    resume: &ResumePoint,
) -> MigrationPlan {
    let files = files
        .into_iter()
        .map(|file| {
            let state = if recorded.contains(&file.filename) {
                FileState::AlreadyRecorded
            } else if resume.is_past(&file.filename) {
                FileState::Pending
            } else {
                log::warn!(
                    "Skipping {}: it sorts before the last applied migration ({}) and will not be run",
                    file.filename,
                    resume.last_successful.as_deref().unwrap_or_default()
                );
                FileState::BeforeResumePoint
            };
            PlannedFile { file, state }
        })
        .collect();

    MigrationPlan {
        start_rank: resume.start_rank,
        files,
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
