use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;
use vote_core::model::{LanguageSpec, Respondent};

use crate::Clock;
use crate::error::AppServicesError;
use crate::export::ExportService;
use crate::leaderboard::LeaderboardService;
use crate::pairs::PairCache;
use crate::sessions::{ClientSession, SessionLoopService};

/// Inputs needed to assemble [`AppServices`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub csv_path: PathBuf,
    pub languages: Vec<LanguageSpec>,
    /// Identity supplied by the host; skips the email gate when set.
    pub respondent: Option<Respondent>,
}

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    respondent: Option<Respondent>,
    session_loop: Arc<SessionLoopService>,
    leaderboard: Arc<LeaderboardService>,
    exports: Arc<ExportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if no language is configured or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: ServiceSettings,
    ) -> Result<Self, AppServicesError> {
        if settings.languages.is_empty() {
            return Err(AppServicesError::NoLanguages);
        }
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(&storage, clock, settings)
    }

    /// Build services over an existing storage aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::NoLanguages` if no language is configured.
    pub fn with_storage(
        storage: &Storage,
        clock: Clock,
        settings: ServiceSettings,
    ) -> Result<Self, AppServicesError> {
        if settings.languages.is_empty() {
            return Err(AppServicesError::NoLanguages);
        }
        let session_loop = Arc::new(SessionLoopService::new(
            clock,
            storage,
            Arc::new(PairCache::new()),
            settings.csv_path,
            settings.languages,
        ));
        let leaderboard = Arc::new(LeaderboardService::new(Arc::clone(&storage.votes)));
        let exports = Arc::new(ExportService::new(Arc::clone(&storage.votes)));

        Ok(Self {
            respondent: settings.respondent,
            session_loop,
            leaderboard,
            exports,
        })
    }

    /// A fresh client, signed in when a preset respondent is configured.
    #[must_use]
    pub fn new_client(&self) -> ClientSession {
        self.respondent
            .clone()
            .map_or_else(ClientSession::new, ClientSession::signed_in)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn exports(&self) -> Arc<ExportService> {
        Arc::clone(&self.exports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::Stage;

    fn settings(respondent: Option<Respondent>) -> ServiceSettings {
        ServiceSettings {
            csv_path: PathBuf::from("pairs.csv"),
            languages: LanguageSpec::defaults(),
            respondent,
        }
    }

    #[test]
    fn rejects_empty_language_list() {
        let mut settings = settings(None);
        settings.languages.clear();
        let result = AppServices::with_storage(&Storage::in_memory(), Clock::system(), settings);
        assert!(matches!(result, Err(AppServicesError::NoLanguages)));
    }

    #[test]
    fn preset_respondent_skips_login() {
        let alice = Respondent::parse("alice@example.com").unwrap();
        let services = AppServices::with_storage(
            &Storage::in_memory(),
            Clock::system(),
            settings(Some(alice.clone())),
        )
        .unwrap();
        assert_eq!(
            services.new_client().stage(),
            &Stage::LanguageUnselected { respondent: alice }
        );
    }

    #[test]
    fn without_preset_client_starts_unauthenticated() {
        let services =
            AppServices::with_storage(&Storage::in_memory(), Clock::system(), settings(None))
                .unwrap();
        assert_eq!(services.new_client().stage(), &Stage::Unauthenticated);
    }
}
