use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::app_settings_service::SettingsService;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::progress_service::ProgressService;
use crate::question_bank::QuestionBank;
use crate::sessions::SessionLoopService;
use crate::transfer_service::TransferService;

/// Assembles app-facing services over one storage backend and question bank.
#[derive(Clone)]
pub struct AppServices {
    bank: Arc<QuestionBank>,
    progress: Arc<ProgressService>,
    leaderboard: Arc<LeaderboardService>,
    settings: Arc<SettingsService>,
    transfer: Arc<TransferService>,
    session_loop: Arc<SessionLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the first
    /// progress load fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        bank: QuestionBank,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, bank, seed).await
    }

    /// Build services over an already opened backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the first progress load fails.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        bank: QuestionBank,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let bank = Arc::new(bank);
        let progress = Arc::new(ProgressService::new(
            Arc::clone(&storage.documents),
            bank.chapter_count(),
        ));
        // first run writes the initial unlocks
        progress.load().await?;

        let leaderboard = Arc::new(LeaderboardService::new(Arc::clone(&storage.documents)));
        let settings = Arc::new(SettingsService::new(Arc::clone(&storage.documents)));
        let transfer = Arc::new(TransferService::new(
            Arc::clone(&progress),
            Arc::clone(&leaderboard),
            Arc::clone(&settings),
        ));

        let session_loop = SessionLoopService::new(
            clock,
            Arc::clone(&bank),
            Arc::clone(&progress),
            Arc::clone(&leaderboard),
        );
        let session_loop = Arc::new(match seed {
            Some(seed) => session_loop.with_seed(seed),
            None => session_loop,
        });

        Ok(Self {
            bank,
            progress,
            leaderboard,
            settings,
            transfer,
            session_loop,
        })
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }

    #[must_use]
    pub fn transfer(&self) -> Arc<TransferService> {
        Arc::clone(&self.transfer)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }
}
