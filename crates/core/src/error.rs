use thiserror::Error;

use crate::model::{LeaderboardEntryError, LevelError, QuestionError, SessionOutcomeError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    SessionOutcome(#[from] SessionOutcomeError),
    #[error(transparent)]
    LeaderboardEntry(#[from] LeaderboardEntryError),
}
