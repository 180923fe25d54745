use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use quiz_core::model::GameId;
use services::{CompletionHistoryService, GameCatalog, QuizLoopService};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> GameCatalog;
    fn launch_game(&self) -> Option<GameId>;

    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn history(&self) -> Arc<CompletionHistoryService>;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: GameCatalog,
    launch_game: Option<GameId>,
    launch_game_pending: Arc<AtomicBool>,

    quiz_loop: Arc<QuizLoopService>,
    history: Arc<CompletionHistoryService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let launch_game = app.launch_game();
        Self {
            catalog: app.catalog(),
            launch_game_pending: Arc::new(AtomicBool::new(launch_game.is_some())),
            launch_game,
            quiz_loop: app.quiz_loop(),
            history: app.history(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// The game to open on launch. Returns it once, then `None`.
    #[must_use]
    pub fn take_launch_game(&self) -> Option<GameId> {
        if self.launch_game_pending.swap(false, Ordering::AcqRel) {
            self.launch_game.clone()
        } else {
            None
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn history(&self) -> Arc<CompletionHistoryService> {
        Arc::clone(&self.history)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
