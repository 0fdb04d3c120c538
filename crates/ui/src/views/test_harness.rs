use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    ClientSession, Clock, ExportService, LeaderboardService, PairCache, SessionLoopService,
};
use storage::repository::Storage;
use tempfile::{NamedTempFile, TempDir};
use vote_core::model::LanguageSpec;
use vote_core::time::fixed_now;

use crate::context::{ClientState, UiApp, build_app_context};
use crate::views::{AnnotateView, LeaderboardView};

pub const PAIRS_CSV: &str = "\
normal_conversation_history_en,personalized_conversation_history_en,normal_conversation_history_zh,personalized_conversation_history_zh
**first** left,first right,左一,右一
second left,second right,左二,右二
third left,,左三,右三
fourth left,fourth right,左四,右四
";

struct TestApp {
    session_loop: Arc<SessionLoopService>,
    leaderboard: Arc<LeaderboardService>,
    exports: Arc<ExportService>,
    export_dir: PathBuf,
}

impl UiApp for TestApp {
    fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    fn exports(&self) -> Arc<ExportService> {
        Arc::clone(&self.exports)
    }

    fn new_client(&self) -> ClientSession {
        ClientSession::new()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Annotate,
    Leaderboard,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    client: ClientSession,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| ClientState {
        client: Signal::new(props.client.clone()),
        screen: Signal::new(None),
    });
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Annotate => rsx! { AnnotateView {} },
        ViewKind::Leaderboard => rsx! { LeaderboardView {} },
    }
}

/// Services and storage shared by a harness, built before the DOM so tests
/// can drive the session loop directly.
pub struct HarnessServices {
    pub storage: Storage,
    pub session_loop: Arc<SessionLoopService>,
    pub source: NamedTempFile,
    pub export_dir: TempDir,
}

impl HarnessServices {
    pub fn new(csv: &str) -> Self {
        let mut source = NamedTempFile::new().expect("temp csv");
        source.write_all(csv.as_bytes()).expect("write csv");
        let storage = Storage::in_memory();
        let session_loop = Arc::new(SessionLoopService::new(
            Clock::fixed(fixed_now()),
            &storage,
            Arc::new(PairCache::seeded(3)),
            source.path(),
            LanguageSpec::defaults(),
        ));
        Self {
            storage,
            session_loop,
            source,
            export_dir: tempfile::tempdir().expect("temp dir"),
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: HarnessServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(
    view: ViewKind,
    services: HarnessServices,
    client: ClientSession,
) -> ViewHarness {
    let app = Arc::new(TestApp {
        session_loop: Arc::clone(&services.session_loop),
        leaderboard: Arc::new(LeaderboardService::new(Arc::clone(&services.storage.votes))),
        exports: Arc::new(ExportService::new(Arc::clone(&services.storage.votes))),
        export_dir: services.export_dir.path().to_path_buf(),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view, client });
    ViewHarness { dom, services }
}
