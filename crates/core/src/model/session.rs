use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::leaderboard::LeaderboardEntry;
use crate::model::progress::Unlock;
use crate::model::score::{QUESTIONS_PER_LEVEL, ScoreCard};
use crate::model::{ChapterIndex, LevelNumber};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionOutcomeError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: u32 },

    #[error("correct answers ({correct}) exceed question count ({total})")]
    CountMismatch { correct: u32, total: u32 },
}

/// Final result of a completed level session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    chapter: ChapterIndex,
    level: LevelNumber,
    correct: u32,
    total: u32,
    time_bonus: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    next_unlock: Option<Unlock>,
}

impl SessionOutcome {
    /// Build an outcome from the session's final score.
    ///
    /// # Errors
    ///
    /// Returns `SessionOutcomeError::InvalidTimeRange` if `completed_at` is before `started_at`,
    /// `TooManyQuestions` above `QUESTIONS_PER_LEVEL`, or `CountMismatch` if more answers were
    /// correct than asked.
    pub fn new(
        chapter: ChapterIndex,
        level: LevelNumber,
        score: ScoreCard,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        next_unlock: Option<Unlock>,
    ) -> Result<Self, SessionOutcomeError> {
        if completed_at < started_at {
            return Err(SessionOutcomeError::InvalidTimeRange);
        }
        let total = score.total();
        if usize::try_from(total).map_or(true, |len| len > QUESTIONS_PER_LEVEL) {
            return Err(SessionOutcomeError::TooManyQuestions { len: total });
        }
        if score.correct() > total {
            return Err(SessionOutcomeError::CountMismatch {
                correct: score.correct(),
                total,
            });
        }

        Ok(Self {
            chapter,
            level,
            correct: score.correct(),
            total,
            time_bonus: score.time_bonus(),
            started_at,
            completed_at,
            next_unlock,
        })
    }

    /// Attach the unlock that followed this session.
    #[must_use]
    pub fn with_next_unlock(mut self, unlock: Option<Unlock>) -> Self {
        self.next_unlock = unlock;
        self
    }

    #[must_use]
    pub fn chapter(&self) -> ChapterIndex {
        self.chapter
    }

    #[must_use]
    pub fn level(&self) -> LevelNumber {
        self.level
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn time_bonus(&self) -> u32 {
        self.time_bonus
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        crate::model::score::percent(self.correct, self.total)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Level opened by completing this session, if the chapter had one left.
    #[must_use]
    pub fn next_unlock(&self) -> Option<Unlock> {
        self.next_unlock
    }

    #[must_use]
    pub fn to_leaderboard_entry(&self) -> LeaderboardEntry {
        LeaderboardEntry {
            chapter: self.chapter,
            level: self.level,
            correct: self.correct,
            total: self.total,
            percent: self.percent(),
            recorded_at: self.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn score(correct: u32, total: u32) -> ScoreCard {
        let mut card = ScoreCard::new(total);
        for _ in 0..correct {
            card.record_correct(10);
        }
        card
    }

    #[test]
    fn outcome_builds_leaderboard_entry() {
        let now = fixed_now();
        let outcome = SessionOutcome::new(
            ChapterIndex::new(1),
            LevelNumber::new(3).unwrap(),
            score(9, 12),
            now,
            now,
            None,
        )
        .unwrap();

        let entry = outcome.to_leaderboard_entry();
        assert_eq!(entry.percent, 75);
        assert_eq!(entry.correct, 9);
        assert_eq!(entry.total, 12);
        assert_eq!(entry.recorded_at, now);
        assert_eq!(outcome.time_bonus(), 90);
    }

    #[test]
    fn outcome_rejects_inverted_time_range() {
        let now = fixed_now();
        let err = SessionOutcome::new(
            ChapterIndex::FIRST,
            LevelNumber::FIRST,
            score(0, 1),
            now,
            now - chrono::Duration::seconds(1),
            None,
        )
        .unwrap_err();
        assert_eq!(err, SessionOutcomeError::InvalidTimeRange);
    }

    #[test]
    fn outcome_rejects_oversized_session() {
        let now = fixed_now();
        let err = SessionOutcome::new(
            ChapterIndex::FIRST,
            LevelNumber::FIRST,
            ScoreCard::new(13),
            now,
            now,
            None,
        )
        .unwrap_err();
        assert_eq!(err, SessionOutcomeError::TooManyQuestions { len: 13 });
    }

    #[test]
    fn empty_outcome_is_zero_percent() {
        let now = fixed_now();
        let outcome = SessionOutcome::new(
            ChapterIndex::FIRST,
            LevelNumber::FIRST,
            ScoreCard::new(0),
            now,
            now,
            None,
        )
        .unwrap();
        assert_eq!(outcome.percent(), 0);
    }
}
