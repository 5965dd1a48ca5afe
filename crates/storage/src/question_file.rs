//! Reading question banks from JSON files.
//!
//! A bank is a JSON array of question records:
//! `[{"chapterIndex": 0, "chapter": "Basics", "level": 1, "question": "...",
//! "options": ["a", "b", "c", "d"], "answer": 2}, ...]`.

use std::path::{Path, PathBuf};

use quiz_core::model::{Question, QuestionDraft, QuestionError};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionFileError {
    #[error("cannot read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("question bank is not a valid JSON array of questions: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question #{index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Parse a bank from JSON text, validating every record.
///
/// # Errors
///
/// Returns `QuestionFileError::Parse` for malformed JSON and
/// `QuestionFileError::InvalidQuestion` for the first record that fails validation.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, QuestionFileError> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(json)?;
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            draft
                .validate()
                .map_err(|source| QuestionFileError::InvalidQuestion { index, source })
        })
        .collect()
}

/// Read and parse a bank from disk.
///
/// # Errors
///
/// Returns `QuestionFileError::Io` if the file cannot be read, or any parse error.
pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<Question>, QuestionFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| QuestionFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let questions = parse_questions(&text)?;
    log::info!(
        "loaded {} questions from {}",
        questions.len(),
        path.display()
    );
    Ok(questions)
}
