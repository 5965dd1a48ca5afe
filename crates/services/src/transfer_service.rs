use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use quiz_core::model::{Leaderboard, ProgressMap, Settings};

use crate::app_settings_service::SettingsService;
use crate::error::TransferError;
use crate::leaderboard_service::LeaderboardService;
use crate::progress_service::ProgressService;

/// Everything a player can carry to another install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub progress: ProgressMap,
    pub leaderboard: Leaderboard,
    pub settings: Settings,
}

/// Which documents an import replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub progress: bool,
    pub leaderboard: bool,
    pub settings: bool,
}

impl ImportReport {
    /// Number of documents replaced.
    #[must_use]
    pub fn applied(&self) -> usize {
        [self.progress, self.leaderboard, self.settings]
            .into_iter()
            .filter(|applied| *applied)
            .count()
    }
}

/// Export/import of the persisted player state as one JSON document.
#[derive(Clone)]
pub struct TransferService {
    progress: Arc<ProgressService>,
    leaderboard: Arc<LeaderboardService>,
    settings: Arc<SettingsService>,
}

impl TransferService {
    #[must_use]
    pub fn new(
        progress: Arc<ProgressService>,
        leaderboard: Arc<LeaderboardService>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            progress,
            leaderboard,
            settings,
        }
    }

    /// Snapshot of the current stored state.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` on storage failures.
    pub async fn export_bundle(&self) -> Result<ExportBundle, TransferError> {
        Ok(ExportBundle {
            progress: self.progress.load().await?,
            leaderboard: self.leaderboard.load().await?,
            settings: self.settings.load().await?,
        })
    }

    /// Pretty-printed export document.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` on storage or encoding failures.
    pub async fn export_state(&self) -> Result<String, TransferError> {
        let bundle = self.export_bundle().await?;
        serde_json::to_string_pretty(&bundle).map_err(TransferError::Encode)
    }

    /// Apply an export document.
    ///
    /// All present fields are decoded before anything is written, so a bad
    /// document leaves the store untouched. Absent (or null) fields keep their
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Parse` for invalid JSON, `InvalidDocument` when
    /// the top level is not an object with a known field, `Field` when a field
    /// does not decode, or a storage error while saving.
    pub async fn import_state(&self, text: &str) -> Result<ImportReport, TransferError> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            log::warn!("rejected import: {err}");
            TransferError::Parse(err)
        })?;
        let Value::Object(fields) = value else {
            log::warn!("rejected import: top level is not an object");
            return Err(TransferError::InvalidDocument("expected a JSON object"));
        };

        let progress: Option<ProgressMap> = decode_field(&fields, "progress")?;
        let leaderboard: Option<Leaderboard> = decode_field(&fields, "leaderboard")?;
        let settings: Option<Settings> = decode_field(&fields, "settings")?;

        if progress.is_none() && leaderboard.is_none() && settings.is_none() {
            log::warn!("rejected import: no known fields");
            return Err(TransferError::InvalidDocument(
                "expected at least one of `progress`, `leaderboard`, `settings`",
            ));
        }

        let mut report = ImportReport::default();
        if let Some(progress) = progress {
            self.progress.replace(&progress).await?;
            report.progress = true;
        }
        if let Some(leaderboard) = leaderboard {
            self.leaderboard.replace(&leaderboard).await?;
            report.leaderboard = true;
        }
        if let Some(settings) = settings {
            self.settings.save(settings).await?;
            report.settings = true;
        }

        log::info!(
            "imported state (progress: {}, leaderboard: {}, settings: {})",
            report.progress,
            report.leaderboard,
            report.settings
        );
        Ok(report)
    }
}

fn decode_field<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, TransferError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|source| {
                log::warn!("rejected import: invalid `{field}`: {source}");
                TransferError::Field { field, source }
            }),
    }
}
