use std::path::Path;

use quiz_core::model::{ChapterIndex, LevelNumber, Question};
use storage::question_file;

use crate::error::QuestionBankError;

/// A chapter as listed on the chapter screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterInfo {
    pub index: ChapterIndex,
    pub title: String,
}

/// Read-only question collection, grouped by chapter and level on demand.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    chapters: Vec<ChapterInfo>,
}

impl QuestionBank {
    /// Build a bank from already validated questions.
    ///
    /// Chapters run from index 0 to the highest index any question uses. A
    /// chapter's title is the first title found among its questions.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        let count = questions
            .iter()
            .map(|q| q.chapter_index().value().saturating_add(1))
            .max()
            .unwrap_or(0);

        let chapters = (0..count)
            .map(ChapterIndex::new)
            .map(|index| {
                let title = questions
                    .iter()
                    .filter(|q| q.chapter_index() == index)
                    .find_map(Question::chapter_title)
                    .map_or_else(
                        || format!("Chapter {}", index.display_number()),
                        str::to_owned,
                    );
                ChapterInfo { index, title }
            })
            .collect();

        Self {
            questions,
            chapters,
        }
    }

    /// Load a bank from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::File` if the file is unreadable or any record is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let questions = question_file::load_questions(path)?;
        Ok(Self::new(questions))
    }

    #[must_use]
    pub fn chapter_count(&self) -> u32 {
        u32::try_from(self.chapters.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn chapters(&self) -> &[ChapterInfo] {
        &self.chapters
    }

    #[must_use]
    pub fn chapter(&self, index: ChapterIndex) -> Option<&ChapterInfo> {
        usize::try_from(index.value())
            .ok()
            .and_then(|idx| self.chapters.get(idx))
    }

    /// Every question for one chapter/level, in bank order.
    #[must_use]
    pub fn pool(&self, chapter: ChapterIndex, level: LevelNumber) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.matches(chapter, level))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;

    fn question(chapter: u32, title: Option<&str>, level: u8, text: &str) -> Question {
        QuestionDraft {
            chapter_index: ChapterIndex::new(chapter),
            chapter: title.map(str::to_owned),
            level,
            question: text.into(),
            options: vec!["a".into(), "b".into()],
            answer: 0,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn chapters_cover_highest_index() {
        let bank = QuestionBank::new(vec![
            question(0, Some("Basics"), 1, "q1"),
            question(2, None, 1, "q2"),
        ]);
        assert_eq!(bank.chapter_count(), 3);
        assert_eq!(bank.chapters()[0].title, "Basics");
        assert_eq!(bank.chapters()[1].title, "Chapter 2");
        assert_eq!(bank.chapter(ChapterIndex::new(2)).unwrap().title, "Chapter 3");
        assert!(bank.chapter(ChapterIndex::new(3)).is_none());
    }

    #[test]
    fn pool_filters_by_chapter_and_level() {
        let bank = QuestionBank::new(vec![
            question(0, None, 1, "a"),
            question(0, None, 2, "b"),
            question(1, None, 1, "c"),
            question(0, None, 1, "d"),
        ]);
        let pool = bank.pool(ChapterIndex::new(0), LevelNumber::FIRST);
        let texts: Vec<&str> = pool.iter().map(Question::text).collect();
        assert_eq!(texts, vec!["a", "d"]);
    }

    #[test]
    fn empty_bank_has_no_chapters() {
        let bank = QuestionBank::new(Vec::new());
        assert!(bank.is_empty());
        assert_eq!(bank.chapter_count(), 0);
    }
}
