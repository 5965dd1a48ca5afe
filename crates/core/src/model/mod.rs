mod ids;
mod leaderboard;
mod progress;
mod question;
mod score;
mod session;
mod settings;

pub use ids::{
    ChapterIndex, Difficulty, LEVELS_PER_CHAPTER, LevelError, LevelNumber, ParseIdError,
};
pub use leaderboard::{LEADERBOARD_CAP, Leaderboard, LeaderboardEntry, LeaderboardEntryError};
pub use progress::{ProgressMap, Unlock};
pub use question::{Question, QuestionDraft, QuestionError};
pub use score::{QUESTIONS_PER_LEVEL, SECONDS_PER_QUESTION, ScoreCard, percent, time_bonus};
pub use session::{SessionOutcome, SessionOutcomeError};
pub use settings::Settings;
