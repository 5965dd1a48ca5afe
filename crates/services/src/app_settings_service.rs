use std::sync::Arc;

use quiz_core::model::Settings;
use storage::repository::{DocumentKey, DocumentStore, load_document, save_document};

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct SettingsService {
    documents: Arc<dyn DocumentStore>,
}

impl SettingsService {
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<Settings, SettingsServiceError> {
        Ok(load_document(self.documents.as_ref(), DocumentKey::Settings).await?)
    }

    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn save(&self, settings: Settings) -> Result<Settings, SettingsServiceError> {
        save_document(self.documents.as_ref(), DocumentKey::Settings, &settings).await?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn set_sound(&self, enabled: bool) -> Result<Settings, SettingsServiceError> {
        let settings = self.load().await?.with_sound(enabled);
        self.save(settings).await
    }

    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn set_confirm_destructive(
        &self,
        enabled: bool,
    ) -> Result<Settings, SettingsServiceError> {
        let settings = self.load().await?.with_confirm_destructive(enabled);
        self.save(settings).await
    }
}
