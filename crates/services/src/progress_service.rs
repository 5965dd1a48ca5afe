use std::sync::Arc;

use quiz_core::model::{ChapterIndex, LevelNumber, ProgressMap, Unlock};
use storage::repository::{DocumentKey, DocumentStore, load_document, save_document};

use crate::error::ProgressServiceError;

/// Tracks which chapter/levels the player may start.
///
/// Every call reads the stored map and writes it back when it changes, so
/// there is no cached copy to go stale.
#[derive(Clone)]
pub struct ProgressService {
    documents: Arc<dyn DocumentStore>,
    chapter_count: u32,
}

impl ProgressService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, chapter_count: u32) -> Self {
        Self {
            documents,
            chapter_count,
        }
    }

    #[must_use]
    pub fn chapter_count(&self) -> u32 {
        self.chapter_count
    }

    /// Load the stored map, initializing (and persisting) it when empty.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn load(&self) -> Result<ProgressMap, ProgressServiceError> {
        let progress: ProgressMap =
            load_document(self.documents.as_ref(), DocumentKey::Progress).await?;
        if !progress.is_empty() {
            return Ok(progress);
        }

        let progress = ProgressMap::initialized(self.chapter_count);
        save_document(self.documents.as_ref(), DocumentKey::Progress, &progress).await?;
        log::info!("initialized progress for {} chapters", self.chapter_count);
        Ok(progress)
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn is_unlocked(
        &self,
        chapter: ChapterIndex,
        level: LevelNumber,
    ) -> Result<bool, ProgressServiceError> {
        Ok(self.load().await?.is_unlocked(chapter, level))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn is_chapter_unlocked(
        &self,
        chapter: ChapterIndex,
    ) -> Result<bool, ProgressServiceError> {
        Ok(self.load().await?.is_chapter_unlocked(chapter))
    }

    /// Apply the unlock transition for a completed chapter/level.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn record_completion(
        &self,
        chapter: ChapterIndex,
        level: LevelNumber,
    ) -> Result<Option<Unlock>, ProgressServiceError> {
        let mut progress = self.load().await?;
        let unlock = progress.complete_level(chapter, level, self.chapter_count);
        save_document(self.documents.as_ref(), DocumentKey::Progress, &progress).await?;

        if let Some(unlock) = unlock.filter(|u| u.newly_unlocked) {
            log::info!(
                "unlocked chapter {} level {}",
                unlock.chapter.display_number(),
                unlock.level
            );
        }
        Ok(unlock)
    }

    /// Unlock a level regardless of prior progress. Returns true if it was locked.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn force_unlock(
        &self,
        chapter: ChapterIndex,
        level: LevelNumber,
    ) -> Result<bool, ProgressServiceError> {
        let mut progress = self.load().await?;
        let newly = progress.unlock(chapter, level);
        if newly {
            save_document(self.documents.as_ref(), DocumentKey::Progress, &progress).await?;
            log::info!(
                "force-unlocked chapter {} level {level}",
                chapter.display_number()
            );
        }
        Ok(newly)
    }

    /// Replace the stored map wholesale (import).
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn replace(&self, progress: &ProgressMap) -> Result<(), ProgressServiceError> {
        save_document(self.documents.as_ref(), DocumentKey::Progress, progress).await?;
        Ok(())
    }

    /// Drop all progress and start over from the initial unlocks.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn reset(&self) -> Result<ProgressMap, ProgressServiceError> {
        self.documents.delete_document(DocumentKey::Progress).await?;
        log::info!("progress cleared");
        self.load().await
    }
}
