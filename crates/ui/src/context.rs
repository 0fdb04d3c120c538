use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::prelude::*;
use services::{ClientSession, ExportService, LeaderboardService, Screen, SessionLoopService};

use crate::views::ViewError;

pub trait UiApp: Send + Sync {
    fn session_loop(&self) -> Arc<SessionLoopService>;
    fn leaderboard(&self) -> Arc<LeaderboardService>;
    fn exports(&self) -> Arc<ExportService>;

    /// Client state for a newly opened window.
    fn new_client(&self) -> ClientSession;

    /// Directory that CSV exports are saved into.
    fn export_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    session_loop: Arc<SessionLoopService>,
    leaderboard: Arc<LeaderboardService>,
    exports: Arc<ExportService>,
    initial_client: ClientSession,
    export_dir: Arc<Path>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session_loop: app.session_loop(),
            leaderboard: app.leaderboard(),
            exports: app.exports(),
            initial_client: app.new_client(),
            export_dir: app.export_dir().into(),
        }
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

    #[must_use]
    pub fn initial_client(&self) -> ClientSession {
        self.initial_client.clone()
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Per-window client state shared by the layout and the pages.
#[derive(Clone, Copy)]
pub struct ClientState {
    pub client: Signal<ClientSession>,
    /// Latest screen returned by the session loop; `None` until the first request.
    pub screen: Signal<Option<Result<Screen, ViewError>>>,
}

impl ClientState {
    /// Send a request to the session loop and store the resulting client and screen.
    pub fn dispatch(self, ctx: &AppContext, request: services::SessionRequest) {
        let session_loop = ctx.session_loop();
        let mut state = self;
        spawn(async move {
            let mut next = state.client.peek().clone();
            match session_loop.handle(&mut next, request).await {
                Ok(screen) => {
                    state.client.set(next);
                    state.screen.set(Some(Ok(screen)));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "session request failed");
                    state.screen.set(Some(Err(ViewError::from(&err))));
                }
            }
        });
    }
}
