use std::sync::Arc;

use quiz_core::model::{Leaderboard, LeaderboardEntry};
use storage::repository::{DocumentKey, DocumentStore, load_document, save_document};

use crate::error::LeaderboardServiceError;

#[derive(Clone)]
pub struct LeaderboardService {
    documents: Arc<dyn DocumentStore>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Load the ranked board (empty when missing or malformed).
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardServiceError` on storage failures.
    pub async fn load(&self) -> Result<Leaderboard, LeaderboardServiceError> {
        Ok(load_document(self.documents.as_ref(), DocumentKey::Leaderboard).await?)
    }

    /// Append an entry, re-rank, cap, and persist.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardServiceError` on storage failures.
    pub async fn record(
        &self,
        entry: LeaderboardEntry,
    ) -> Result<Leaderboard, LeaderboardServiceError> {
        let mut board = self.load().await?;
        board.record(entry);
        save_document(self.documents.as_ref(), DocumentKey::Leaderboard, &board).await?;
        Ok(board)
    }

    /// The best `n` entries.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardServiceError` on storage failures.
    pub async fn top_n(
        &self,
        n: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardServiceError> {
        Ok(self.load().await?.top(n).to_vec())
    }

    /// Replace the stored board wholesale (import).
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardServiceError` on storage failures.
    pub async fn replace(&self, board: &Leaderboard) -> Result<(), LeaderboardServiceError> {
        save_document(self.documents.as_ref(), DocumentKey::Leaderboard, board).await?;
        Ok(())
    }
}
