use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::EngineTimings;
use quiz_core::model::GameId;
use quiz_core::time::fixed_now;
use services::{Clock, CompletionHistoryService, GameCatalog, QuizLoopService};
use storage::repository::{CompletionRepository, Storage};

use super::game::GameTestHandles;
use crate::context::{UiApp, build_app_context};
use crate::views::{GameView, HistoryView, HomeView};

#[derive(Clone)]
struct TestApp {
    catalog: GameCatalog,
    launch_game: Option<GameId>,
    quiz_loop: Arc<QuizLoopService>,
    history: Arc<CompletionHistoryService>,
}

impl UiApp for TestApp {
    fn catalog(&self) -> GameCatalog {
        self.catalog.clone()
    }

    fn launch_game(&self) -> Option<GameId> {
        self.launch_game.clone()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn history(&self) -> Arc<CompletionHistoryService> {
        Arc::clone(&self.history)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    History,
    Game(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    game_handles: Option<GameTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.game_handles.clone() {
        use_context_provider(|| handles);
    }
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
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Game(game_id) => rsx! { GameView { game_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub game_handles: Option<GameTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Send an intent to the mounted game view.
    pub fn dispatch(&mut self, intent: crate::vm::GameIntent) {
        let handles = self.game_handles.clone().expect("game view mounted");
        self.dom.in_runtime(|| handles.dispatch().call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn game_handles(&self) -> &GameTestHandles {
        self.game_handles.as_ref().expect("game view mounted")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory())
}

pub fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let completions = Arc::clone(&storage.completions);
    setup_view_harness_with_ledger(view, storage, completions)
}

pub fn setup_view_harness_with_ledger(
    view: ViewKind,
    storage: Storage,
    completions: Arc<dyn CompletionRepository>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let catalog = GameCatalog::builtin().expect("builtin catalog");
    let quiz_loop = Arc::new(
        QuizLoopService::new(
            clock,
            catalog.clone(),
            Arc::clone(&completions),
            Arc::clone(&storage.snapshots),
        )
        .with_timings(EngineTimings::immediate()),
    );
    let history = Arc::new(CompletionHistoryService::new(completions));

    let game_handles = match view {
        ViewKind::Game(_) => Some(GameTestHandles::default()),
        _ => None,
    };

    let app = Arc::new(TestApp {
        catalog,
        launch_game: None,
        quiz_loop,
        history,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            game_handles: game_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        game_handles,
    }
}
