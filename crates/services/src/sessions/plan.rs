use rand::Rng;

use quiz_core::model::{ChapterIndex, LevelNumber, QUESTIONS_PER_LEVEL, Question};
use quiz_core::shuffle;

use crate::question_bank::QuestionBank;

/// Selection result for a level session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    /// How many questions the bank holds for this chapter/level.
    pub pool_size: usize,
}

impl SessionPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Draws the question set for one chapter/level.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    limit: usize,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self {
            bank,
            limit: QUESTIONS_PER_LEVEL,
        }
    }

    /// Cap the set size below `QUESTIONS_PER_LEVEL`.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(QUESTIONS_PER_LEVEL);
        self
    }

    /// Shuffle the matching pool and keep the first `limit` questions.
    ///
    /// Pools smaller than the limit are used whole; an empty pool yields an
    /// empty plan.
    pub fn build<R: Rng + ?Sized>(
        self,
        chapter: ChapterIndex,
        level: LevelNumber,
        rng: &mut R,
    ) -> SessionPlan {
        let pool = self.bank.pool(chapter, level);
        let pool_size = pool.len();
        let questions = shuffle::sample(&pool, self.limit, rng);
        SessionPlan {
            questions,
            pool_size,
        }
    }
}
