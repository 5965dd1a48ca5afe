//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ChapterIndex, LevelNumber, SessionOutcomeError};
use storage::question_file::QuestionFileError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LeaderboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("chapter {} level {level} is locked", .chapter.display_number())]
    Locked {
        chapter: ChapterIndex,
        level: LevelNumber,
    },
    #[error("question bank has no chapters")]
    NoChapters,
    #[error("no question is active")]
    NoActiveQuestion,
    #[error("question already answered")]
    AlreadyAnswered,
    #[error("time is up for this question")]
    TimeExpired,
    #[error("option {selected} does not exist (question has {options})")]
    InvalidOption { selected: usize, options: usize },
    #[error("session already completed")]
    Completed,
    #[error(transparent)]
    Outcome(#[from] SessionOutcomeError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardServiceError),
}

/// Errors emitted by `TransferService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransferError {
    #[error("import is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid import document: {0}")]
    InvalidDocument(&'static str),
    #[error("invalid `{field}` in import document: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode export document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardServiceError),
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
}

/// Errors emitted while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error(transparent)]
    File(#[from] QuestionFileError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}
