use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    ChapterIndex, LevelNumber, Question, SECONDS_PER_QUESTION, ScoreCard, SessionOutcome, Unlock,
};

use super::progress::SessionProgress;
use super::timer::{QuestionTimer, TickOutcome, TimerToken};
use crate::error::SessionError;

//
// ─── PER-QUESTION STATE ────────────────────────────────────────────────────────
//

/// Where the active question stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    /// Shown, timer running, no answer yet.
    Pending,
    Answered {
        selected: usize,
        correct: bool,
        time_bonus: u32,
    },
    /// The countdown ran out before an answer came in.
    TimedOut,
}

impl QuestionState {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, QuestionState::Answered { correct: true, .. })
    }
}

/// Immediate feedback for an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct: bool,
    pub correct_index: usize,
    pub time_bonus: u32,
}

/// Result of moving past the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Next(TimerToken),
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One playthrough of a chapter/level question set.
///
/// Steps through the questions in order with a fresh countdown for each one.
/// Only `SessionLoopService` can advance or finish a session, since both may
/// persist state.
pub struct QuizSession {
    chapter: ChapterIndex,
    level: LevelNumber,
    questions: Vec<Question>,
    current: usize,
    state: QuestionState,
    results: Vec<QuestionState>,
    score: ScoreCard,
    timer: QuestionTimer,
    started_at: DateTime<Utc>,
    /// Set once the unlock transition for this session has been persisted.
    unlock: Option<Option<Unlock>>,
    outcome: Option<SessionOutcome>,
}

impl QuizSession {
    pub(crate) fn new(
        chapter: ChapterIndex,
        level: LevelNumber,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        let mut timer = QuestionTimer::new(SECONDS_PER_QUESTION);
        if !questions.is_empty() {
            timer.start();
        }

        Self {
            chapter,
            level,
            questions,
            current: 0,
            state: QuestionState::Pending,
            results: Vec::new(),
            score: ScoreCard::new(total),
            timer,
            started_at,
            unlock: None,
            outcome: None,
        }
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
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based position of the active question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn question_state(&self) -> QuestionState {
        self.state
    }

    /// Outcomes of the questions already moved past.
    #[must_use]
    pub fn results(&self) -> &[QuestionState] {
        &self.results
    }

    #[must_use]
    pub fn seconds_left(&self) -> u32 {
        self.timer.seconds_left()
    }

    /// Token for the running countdown; `None` once the question is settled.
    #[must_use]
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.score.correct()
    }

    #[must_use]
    pub fn time_bonus(&self) -> u32 {
        self.score.time_bonus()
    }

    #[must_use]
    pub fn score(&self) -> ScoreCard {
        self.score
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total_questions();
        let answered = self.results.len().min(total);
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Register an answer for the active question.
    ///
    /// A correct answer scores one point plus the whole seconds still on the
    /// clock. The question accepts exactly one answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` or `NoActiveQuestion` when nothing is
    /// on screen, `AlreadyAnswered` / `TimeExpired` when the question is
    /// settled, and `InvalidOption` for an index outside the option list.
    /// Rejections leave the session untouched.
    pub fn answer(&mut self, selected: usize) -> Result<AnswerFeedback, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::NoActiveQuestion);
        };

        match self.state {
            QuestionState::Answered { .. } => return Err(SessionError::AlreadyAnswered),
            QuestionState::TimedOut => return Err(SessionError::TimeExpired),
            QuestionState::Pending => {}
        }

        let options = question.options().len();
        if selected >= options {
            return Err(SessionError::InvalidOption { selected, options });
        }

        self.timer.cancel();
        let correct = question.is_correct(selected);
        let correct_index = question.answer_index();
        let time_bonus = if correct {
            self.score
                .record_correct(i64::from(self.timer.seconds_left()))
        } else {
            0
        };

        self.state = QuestionState::Answered {
            selected,
            correct,
            time_bonus,
        };

        Ok(AnswerFeedback {
            selected,
            correct,
            correct_index,
            time_bonus,
        })
    }

    /// Feed one second of countdown. Ticks with a stale token are ignored.
    ///
    /// Expiry settles the question as `TimedOut`: incorrect, no bonus.
    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        if self.is_complete() {
            return TickOutcome::Stale;
        }

        let outcome = self.timer.tick(token);
        if outcome == TickOutcome::Expired && self.state == QuestionState::Pending {
            log::debug!(
                "question {} of {} timed out",
                self.current + 1,
                self.total_questions()
            );
            self.state = QuestionState::TimedOut;
        }
        outcome
    }

    /// Settle the active question and move on.
    pub(crate) fn step(&mut self) -> Step {
        self.timer.cancel();
        if self.current < self.questions.len() {
            self.results.push(self.state);
            self.current += 1;
        }
        self.state = QuestionState::Pending;

        if self.current < self.questions.len() {
            Step::Next(self.timer.start())
        } else {
            Step::Finished
        }
    }

    pub(crate) fn applied_unlock(&self) -> Option<Option<Unlock>> {
        self.unlock
    }

    pub(crate) fn mark_unlock_applied(&mut self, unlock: Option<Unlock>) {
        self.unlock = Some(unlock);
    }

    pub(crate) fn finish(&mut self, outcome: SessionOutcome) {
        self.timer.cancel();
        self.outcome = Some(outcome);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("chapter", &self.chapter)
            .field("level", &self.level)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("state", &self.state)
            .field("score", &self.score)
            .field("started_at", &self.started_at)
            .field("complete", &self.is_complete())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;
    use quiz_core::time::fixed_now;

    fn build_question(i: usize) -> Question {
        QuestionDraft {
            chapter_index: ChapterIndex::new(0),
            chapter: None,
            level: 1,
            question: format!("Q{i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer: 1,
        }
        .validate()
        .unwrap()
    }

    fn build_session(len: usize) -> QuizSession {
        let questions = (0..len).map(build_question).collect();
        QuizSession::new(ChapterIndex::new(0), LevelNumber::FIRST, questions, fixed_now())
    }

    fn run_ticks(session: &mut QuizSession, n: u32) {
        let token = session.timer_token().unwrap();
        for _ in 0..n {
            session.tick(token);
        }
    }

    #[test]
    fn correct_answer_scores_remaining_seconds() {
        let mut session = build_session(2);
        run_ticks(&mut session, 5);

        let feedback = session.answer(1).unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.time_bonus, 10);
        assert_eq!(session.correct_count(), 1);
        assert_eq!(session.time_bonus(), 10);
        assert!(session.timer_token().is_none());
    }

    #[test]
    fn wrong_answer_scores_nothing() {
        let mut session = build_session(1);
        let feedback = session.answer(3).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_index, 1);
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.time_bonus(), 0);
    }

    #[test]
    fn second_answer_is_rejected_without_double_count() {
        let mut session = build_session(1);
        session.answer(1).unwrap();
        let err = session.answer(1).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyAnswered));
        assert_eq!(session.correct_count(), 1);
        assert_eq!(session.time_bonus(), 15);
    }

    #[test]
    fn expiry_counts_as_incorrect_and_blocks_answers() {
        let mut session = build_session(1);
        let token = session.timer_token().unwrap();
        for _ in 0..14 {
            assert!(matches!(session.tick(token), TickOutcome::Running { .. }));
        }
        assert_eq!(session.tick(token), TickOutcome::Expired);
        assert_eq!(session.question_state(), QuestionState::TimedOut);

        let err = session.answer(1).unwrap_err();
        assert!(matches!(err, SessionError::TimeExpired));
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.time_bonus(), 0);
    }

    #[test]
    fn tick_after_answer_is_stale() {
        let mut session = build_session(2);
        let token = session.timer_token().unwrap();
        session.answer(0).unwrap();
        assert_eq!(session.tick(token), TickOutcome::Stale);
        assert_eq!(session.seconds_left(), 15);
    }

    #[test]
    fn old_token_cannot_touch_next_question() {
        let mut session = build_session(2);
        let first = session.timer_token().unwrap();
        let Step::Next(second) = session.step() else {
            panic!("expected another question");
        };
        assert_eq!(session.tick(first), TickOutcome::Stale);
        assert_eq!(session.seconds_left(), 15);
        assert_eq!(session.tick(second), TickOutcome::Running { seconds_left: 14 });
    }

    #[test]
    fn invalid_option_leaves_question_open() {
        let mut session = build_session(1);
        let err = session.answer(9).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidOption {
                selected: 9,
                options: 4
            }
        ));
        assert!(session.timer_token().is_some());
        assert!(session.answer(1).is_ok());
    }

    #[test]
    fn step_records_results_and_finishes() {
        let mut session = build_session(2);
        session.answer(1).unwrap();
        assert!(matches!(session.step(), Step::Next(_)));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.question_state(), QuestionState::Pending);

        // skipped without answering
        assert_eq!(session.step(), Step::Finished);
        assert_eq!(session.results().len(), 2);
        assert!(session.results()[0].is_correct());
        assert!(!session.results()[1].is_correct());

        let progress = session.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.remaining, 0);
    }

    #[test]
    fn empty_session_has_no_question_or_timer() {
        let mut session = build_session(0);
        assert!(session.current_question().is_none());
        assert!(session.timer_token().is_none());
        assert!(matches!(
            session.answer(0).unwrap_err(),
            SessionError::NoActiveQuestion
        ));
        assert_eq!(session.step(), Step::Finished);
    }
}
