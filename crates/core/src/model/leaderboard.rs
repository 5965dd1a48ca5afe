use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use crate::model::ids::{ChapterIndex, LevelNumber};

/// Maximum number of entries kept on the leaderboard.
pub const LEADERBOARD_CAP: usize = 200;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LeaderboardEntryError {
    #[error("percent must be at most 100, got {0}")]
    PercentOutOfRange(u8),

    #[error("correct answers ({correct}) exceed question count ({total})")]
    CountMismatch { correct: u32, total: u32 },
}

/// Result of one completed session as shown on the leaderboard.
///
/// Stored and imported entries are checked on the way in: percent stays in
/// `0..=100` and `correct` never exceeds `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeaderboardEntryRecord")]
pub struct LeaderboardEntry {
    pub chapter: ChapterIndex,
    pub level: LevelNumber,
    pub correct: u32,
    pub total: u32,
    pub percent: u8,
    #[serde(rename = "time", alias = "timestamp")]
    pub recorded_at: DateTime<Utc>,
}

/// Unchecked wire shape of a `LeaderboardEntry`.
#[derive(Deserialize)]
struct LeaderboardEntryRecord {
    chapter: ChapterIndex,
    level: LevelNumber,
    correct: u32,
    total: u32,
    percent: u8,
    #[serde(rename = "time", alias = "timestamp")]
    recorded_at: DateTime<Utc>,
}

impl TryFrom<LeaderboardEntryRecord> for LeaderboardEntry {
    type Error = LeaderboardEntryError;

    fn try_from(record: LeaderboardEntryRecord) -> Result<Self, Self::Error> {
        if record.percent > 100 {
            return Err(LeaderboardEntryError::PercentOutOfRange(record.percent));
        }
        if record.correct > record.total {
            return Err(LeaderboardEntryError::CountMismatch {
                correct: record.correct,
                total: record.total,
            });
        }

        Ok(Self {
            chapter: record.chapter,
            level: record.level,
            correct: record.correct,
            total: record.total,
            percent: record.percent,
            recorded_at: record.recorded_at,
        })
    }
}

/// Ranked session results: best percent first, newest first among ties.
///
/// Every constructor and mutation keeps the list ordered and capped at
/// `LEADERBOARD_CAP`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a leaderboard from entries in any order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(rank);
        entries.truncate(LEADERBOARD_CAP);
        Self { entries }
    }

    /// Add an entry, re-rank, and drop whatever falls past the cap.
    pub fn record(&mut self, entry: LeaderboardEntry) {
        self.entries.push(entry);
        self.entries.sort_by(rank);
        self.entries.truncate(LEADERBOARD_CAP);
    }

    /// The best `n` entries (fewer if the board is shorter).
    #[must_use]
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(board: Leaderboard) -> Self {
        board.entries
    }
}

fn rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.percent
        .cmp(&a.percent)
        .then_with(|| b.recorded_at.cmp(&a.recorded_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn entry(percent: u8, minutes: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            chapter: ChapterIndex::new(0),
            level: LevelNumber::FIRST,
            correct: u32::from(percent) * 12 / 100,
            total: 12,
            percent,
            recorded_at: fixed_now() + Duration::minutes(minutes),
        }
    }

    fn is_ranked(board: &Leaderboard) -> bool {
        board
            .entries()
            .windows(2)
            .all(|pair| rank(&pair[0], &pair[1]) != Ordering::Greater)
    }

    #[test]
    fn record_orders_by_percent_then_recency() {
        let mut board = Leaderboard::new();
        board.record(entry(50, 0));
        board.record(entry(90, 1));
        board.record(entry(50, 5));

        let percents: Vec<u8> = board.entries().iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![90, 50, 50]);
        assert_eq!(board.entries()[1].recorded_at, fixed_now() + Duration::minutes(5));
    }

    #[test]
    fn record_caps_the_board() {
        let mut board = Leaderboard::new();
        for i in 0..(LEADERBOARD_CAP as i64 + 25) {
            board.record(entry(u8::try_from(i % 101).unwrap(), i));
            assert!(board.len() <= LEADERBOARD_CAP);
            assert!(is_ranked(&board));
        }
        assert_eq!(board.len(), LEADERBOARD_CAP);
    }

    #[test]
    fn full_board_drops_lowest_scores() {
        let entries = (0..LEADERBOARD_CAP as i64).map(|i| entry(60, i)).collect();
        let mut board = Leaderboard::from_entries(entries);
        board.record(entry(10, 999));
        assert!(board.entries().iter().all(|e| e.percent == 60));

        board.record(entry(100, 1000));
        assert_eq!(board.top(1)[0].percent, 100);
        assert_eq!(board.len(), LEADERBOARD_CAP);
    }

    #[test]
    fn top_is_bounded_by_length() {
        let mut board = Leaderboard::new();
        board.record(entry(70, 0));
        assert_eq!(board.top(5).len(), 1);
        assert!(Leaderboard::new().top(3).is_empty());
    }

    #[test]
    fn deserializing_unsorted_list_ranks_it() {
        let json = r#"[
            {"chapter":0,"level":1,"correct":3,"total":12,"percent":25,"time":"2023-11-14T22:13:20Z"},
            {"chapter":1,"level":4,"correct":12,"total":12,"percent":100,"time":"2023-11-14T22:13:20Z"}
        ]"#;
        let board: Leaderboard = serde_json::from_str(json).unwrap();
        assert_eq!(board.top(1)[0].percent, 100);
        assert_eq!(board.top(1)[0].chapter, ChapterIndex::new(1));
    }

    #[test]
    fn out_of_range_entries_are_rejected() {
        let too_high = r#"{"chapter":0,"level":1,"correct":12,"total":12,"percent":150,"time":"2023-11-14T22:13:20Z"}"#;
        let err = serde_json::from_str::<LeaderboardEntry>(too_high).unwrap_err();
        assert!(err.to_string().contains("percent must be at most 100"));

        let overcounted = r#"{"chapter":0,"level":1,"correct":13,"total":12,"percent":100,"time":"2023-11-14T22:13:20Z"}"#;
        let err = serde_json::from_str::<LeaderboardEntry>(overcounted).unwrap_err();
        assert!(err.to_string().contains("exceed question count"));
    }

    #[test]
    fn serialized_entry_reads_back() {
        let original = entry(75, 3);
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"time\""));
        let back: LeaderboardEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
