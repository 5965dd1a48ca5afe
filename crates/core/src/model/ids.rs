use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of levels every chapter is divided into.
pub const LEVELS_PER_CHAPTER: u8 = 10;

/// Zero-based index of a chapter in the question bank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterIndex(u32);

impl ChapterIndex {
    pub const FIRST: Self = Self(0);

    /// Creates a new `ChapterIndex`
    #[must_use]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying zero-based value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// One-based number shown to players ("Chapter 1" is index 0).
    #[must_use]
    pub fn display_number(&self) -> u32 {
        self.0.saturating_add(1)
    }

    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

//
// ─── LEVELS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level must be between 1 and {LEVELS_PER_CHAPTER}, got {0}")]
    OutOfRange(u8),
}

/// A level within a chapter, always in `1..=LEVELS_PER_CHAPTER`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LevelNumber(u8);

impl LevelNumber {
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(LEVELS_PER_CHAPTER);

    /// Creates a validated level number.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` for 0 or anything above `LEVELS_PER_CHAPTER`.
    pub fn new(value: u8) -> Result<Self, LevelError> {
        if (1..=LEVELS_PER_CHAPTER).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LevelError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.0 == LEVELS_PER_CHAPTER
    }

    /// The following level in the same chapter, if any.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        if self.is_last() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        match self.0 {
            1..=3 => Difficulty::Easy,
            4..=7 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    /// Every level of a chapter, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=LEVELS_PER_CHAPTER).map(Self)
    }
}

impl TryFrom<u8> for LevelNumber {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LevelNumber> for u8 {
    fn from(level: LevelNumber) -> Self {
        level.0
    }
}

/// Difficulty label attached to level bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

impl fmt::Debug for ChapterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChapterIndex({})", self.0)
    }
}

impl fmt::Debug for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelNumber({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ChapterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing a chapter or level from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ChapterIndex {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ChapterIndex::new)
            .map_err(|_| ParseIdError {
                kind: "ChapterIndex".to_string(),
            })
    }
}

impl FromStr for LevelNumber {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|value| LevelNumber::new(value).ok())
            .ok_or_else(|| ParseIdError {
                kind: "LevelNumber".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
