use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterIndex, LevelError, LevelNumber};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("option {index} is blank")]
    BlankOption { index: usize },

    #[error("answer index {answer} is outside the {options} options")]
    AnswerOutOfRange { answer: usize, options: usize },

    #[error(transparent)]
    Level(#[from] LevelError),
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw question record as it appears in a question bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub chapter_index: ChapterIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    pub level: u8,
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
}

impl QuestionDraft {
    /// Validate the raw record into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is blank, there are no options,
    /// an option is blank, the answer index does not point at an option, or
    /// the level is outside `1..=10`.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let level = LevelNumber::new(self.level)?;

        let question = self.question.trim().to_string();
        if question.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if let Some(index) = self.options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuestionError::BlankOption { index });
        }
        if self.answer >= self.options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                answer: self.answer,
                options: self.options.len(),
            });
        }

        let chapter = self
            .chapter
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty());

        Ok(Question {
            chapter_index: self.chapter_index,
            chapter,
            level,
            question,
            options: self.options,
            answer: self.answer,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "QuestionDraft")]
pub struct Question {
    chapter_index: ChapterIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    chapter: Option<String>,
    level: LevelNumber,
    question: String,
    options: Vec<String>,
    answer: usize,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Question {
    #[must_use]
    pub fn chapter_index(&self) -> ChapterIndex {
        self.chapter_index
    }

    /// Chapter title carried by the record, if the bank provides one.
    #[must_use]
    pub fn chapter_title(&self) -> Option<&str> {
        self.chapter.as_deref()
    }

    #[must_use]
    pub fn level(&self) -> LevelNumber {
        self.level
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.answer
    }

    #[must_use]
    pub fn matches(&self, chapter: ChapterIndex, level: LevelNumber) -> bool {
        self.chapter_index == chapter && self.level == level
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            chapter_index: ChapterIndex::new(0),
            chapter: Some("Pointers".into()),
            level: 1,
            question: "What does * do?".into(),
            options: vec!["deref".into(), "add".into(), "xor".into(), "nothing".into()],
            answer: 0,
        }
    }

    #[test]
    fn valid_draft_builds_question() {
        let q = draft().validate().unwrap();
        assert_eq!(q.chapter_index(), ChapterIndex::new(0));
        assert_eq!(q.chapter_title(), Some("Pointers"));
        assert_eq!(q.level(), LevelNumber::FIRST);
        assert!(q.is_correct(0));
        assert!(!q.is_correct(2));
    }

    #[test]
    fn answer_must_point_at_option() {
        let mut d = draft();
        d.answer = 4;
        let err = d.validate().unwrap_err();
        assert_eq!(
            err,
            QuestionError::AnswerOutOfRange {
                answer: 4,
                options: 4
            }
        );
    }

    #[test]
    fn blank_text_and_options_are_rejected() {
        let mut d = draft();
        d.question = "  ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyText);

        let mut d = draft();
        d.options.clear();
        assert_eq!(d.validate().unwrap_err(), QuestionError::NoOptions);

        let mut d = draft();
        d.options[2] = " ".into();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::BlankOption { index: 2 }
        );
    }

    #[test]
    fn level_outside_range_is_rejected() {
        let mut d = draft();
        d.level = 11;
        assert!(matches!(d.validate().unwrap_err(), QuestionError::Level(_)));
    }

    #[test]
    fn parses_bank_record_json() {
        let json = r#"{
            "chapterIndex": 2,
            "chapter": "Structs",
            "level": 7,
            "question": "Size of an empty struct?",
            "options": ["0", "1", "4", "8"],
            "answer": 0
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.matches(ChapterIndex::new(2), LevelNumber::new(7).unwrap()));
        assert_eq!(q.options().len(), 4);
    }

    #[test]
    fn invalid_bank_record_fails_to_parse() {
        let json = r#"{"chapterIndex":0,"level":1,"question":"Q","options":["a"],"answer":3}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }
}
