use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;
use rand::seq::IteratorRandom;

use quiz_core::model::{ChapterIndex, LevelNumber, SessionOutcome};
use quiz_core::shuffle::{self, QuizRng};

use super::plan::SessionBuilder;
use super::service::{QuizSession, Step};
use super::timer::TimerToken;
use crate::Clock;
use crate::error::SessionError;
use crate::leaderboard_service::LeaderboardService;
use crate::progress_service::ProgressService;
use crate::question_bank::QuestionBank;

/// Result of moving past the current question.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult {
    /// Another question is on screen; ticks must carry this token.
    Next(TimerToken),
    /// The session ended; its outcome has been recorded.
    Completed(SessionOutcome),
}

/// Orchestrates session start and persisted completion.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    progress: Arc<ProgressService>,
    leaderboard: Arc<LeaderboardService>,
    rng: Arc<Mutex<QuizRng>>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        progress: Arc<ProgressService>,
        leaderboard: Arc<LeaderboardService>,
    ) -> Self {
        Self {
            clock,
            bank,
            progress,
            leaderboard,
            rng: Arc::new(Mutex::new(shuffle::entropy_rng())),
        }
    }

    /// Make question selection and daily picks reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(shuffle::seeded_rng(seed)));
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start a session for an unlocked chapter/level.
    ///
    /// A level with no questions yields a session that is already complete.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Locked` if the level is not unlocked, or a
    /// storage error from progress lookup or immediate completion.
    pub async fn start_level(
        &self,
        chapter: ChapterIndex,
        level: LevelNumber,
    ) -> Result<QuizSession, SessionError> {
        if !self.progress.is_unlocked(chapter, level).await? {
            return Err(SessionError::Locked { chapter, level });
        }
        self.begin(chapter, level).await
    }

    /// Unlock the level if needed, then start it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for storage failures.
    pub async fn start_forced_level(
        &self,
        chapter: ChapterIndex,
        level: LevelNumber,
    ) -> Result<QuizSession, SessionError> {
        self.progress.force_unlock(chapter, level).await?;
        self.begin(chapter, level).await
    }

    /// Random chapter among the bank's chapters and random level in that chapter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoChapters` for an empty bank.
    pub fn daily_pick(&self) -> Result<(ChapterIndex, LevelNumber), SessionError> {
        let count = self.bank.chapter_count();
        if count == 0 {
            return Err(SessionError::NoChapters);
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let chapter = ChapterIndex::new(rng.random_range(0..count));
        let level = LevelNumber::all()
            .choose(&mut *rng)
            .unwrap_or(LevelNumber::FIRST);
        Ok((chapter, level))
    }

    /// Start the daily challenge, force-unlocking the picked level.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoChapters` for an empty bank, or a storage error.
    pub async fn start_daily(&self) -> Result<QuizSession, SessionError> {
        let (chapter, level) = self.daily_pick()?;
        log::info!(
            "daily challenge: chapter {} level {level}",
            chapter.display_number()
        );
        self.start_forced_level(chapter, level).await
    }

    /// Fresh session on the same chapter/level.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for storage failures.
    pub async fn retry(&self, session: &QuizSession) -> Result<QuizSession, SessionError> {
        self.begin(session.chapter(), session.level()).await
    }

    /// Settle the active question and show the next one, or finish the session.
    ///
    /// An unanswered question counts as incorrect. Finishing applies the
    /// unlock and then records the leaderboard entry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` for a finished session, or a storage
    /// error while recording the outcome. A failed completion can be retried
    /// by calling `advance` again.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceResult, SessionError> {
        if session.is_complete() {
            return Err(SessionError::Completed);
        }

        match session.step() {
            Step::Next(token) => Ok(AdvanceResult::Next(token)),
            Step::Finished => Ok(AdvanceResult::Completed(self.complete(session).await?)),
        }
    }

    async fn begin(
        &self,
        chapter: ChapterIndex,
        level: LevelNumber,
    ) -> Result<QuizSession, SessionError> {
        let plan = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            SessionBuilder::new(&self.bank).build(chapter, level, &mut *rng)
        };
        log::info!(
            "starting chapter {} level {level}: {} of {} questions",
            chapter.display_number(),
            plan.questions.len(),
            plan.pool_size
        );

        let mut session = QuizSession::new(chapter, level, plan.questions, self.clock.now());
        if session.total_questions() == 0 {
            log::warn!(
                "no questions for chapter {} level {level}",
                chapter.display_number()
            );
            self.complete(&mut session).await?;
        }
        Ok(session)
    }

    async fn complete(&self, session: &mut QuizSession) -> Result<SessionOutcome, SessionError> {
        if let Some(outcome) = session.outcome() {
            return Ok(outcome.clone());
        }

        let (chapter, level) = (session.chapter(), session.level());
        let completed_at = self.clock.now().max(session.started_at());
        let outcome = SessionOutcome::new(
            chapter,
            level,
            session.score(),
            session.started_at(),
            completed_at,
            None,
        )?;

        // The leaderboard append stays the last write so a retry never repeats it.
        let unlock = match session.applied_unlock() {
            Some(unlock) => unlock,
            None => {
                let unlock = self.progress.record_completion(chapter, level).await?;
                session.mark_unlock_applied(unlock);
                unlock
            }
        };
        let outcome = outcome.with_next_unlock(unlock);
        self.leaderboard
            .record(outcome.to_leaderboard_entry())
            .await?;

        log::info!(
            "completed chapter {} level {level}: {}/{} ({}%), bonus {}",
            chapter.display_number(),
            outcome.correct(),
            outcome.total(),
            outcome.percent(),
            outcome.time_bonus()
        );
        session.finish(outcome.clone());
        Ok(outcome)
    }
}
