#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod error;
pub mod leaderboard_service;
pub mod progress_service;
pub mod question_bank;
pub mod sessions;
pub mod transfer_service;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use app_settings_service::SettingsService;
pub use error::{
    AppServicesError, LeaderboardServiceError, ProgressServiceError, QuestionBankError,
    SessionError, SettingsServiceError, TransferError,
};
pub use leaderboard_service::LeaderboardService;
pub use progress_service::ProgressService;
pub use question_bank::{ChapterInfo, QuestionBank};
pub use sessions::{
    AdvanceResult, AnswerFeedback, QuestionState, QuizSession, SessionLoopService,
    SessionProgress, TickOutcome, TimerToken,
};
pub use transfer_service::{ExportBundle, ImportReport, TransferService};
