use std::sync::Arc;

use quiz_core::model::GameId;
use storage::repository::Storage;

use crate::Clock;
use crate::catalog::GameCatalog;
use crate::error::AppServicesError;
use crate::sessions::{CompletionHistoryService, QuizLoopService};

/// Assembles app-facing services and picks the game opened on launch.
#[derive(Clone)]
pub struct AppServices {
    catalog: GameCatalog,
    launch_game: Option<GameId>,
    quiz_loop: Arc<QuizLoopService>,
    history: Arc<CompletionHistoryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or catalog
    /// loading fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        preferred_game: Option<GameId>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, preferred_game)
    }

    /// Build services on an in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if catalog loading fails.
    pub fn in_memory(clock: Clock, preferred_game: Option<GameId>) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock, preferred_game)
    }

    fn from_storage(
        storage: Storage,
        clock: Clock,
        preferred_game: Option<GameId>,
    ) -> Result<Self, AppServicesError> {
        let catalog = GameCatalog::builtin()?;
        let launch_game = resolve_launch_game(&catalog, preferred_game);

        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            catalog.clone(),
            Arc::clone(&storage.completions),
            Arc::clone(&storage.snapshots),
        ));
        let history = Arc::new(CompletionHistoryService::new(Arc::clone(
            &storage.completions,
        )));

        Ok(Self {
            catalog,
            launch_game,
            quiz_loop,
            history,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Game to open directly on launch, if one was requested and exists.
    #[must_use]
    pub fn launch_game(&self) -> Option<&GameId> {
        self.launch_game.as_ref()
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

fn resolve_launch_game(catalog: &GameCatalog, preferred: Option<GameId>) -> Option<GameId> {
    let preferred = preferred?;
    if catalog.get(&preferred).is_some() {
        return Some(preferred);
    }
    tracing::warn!(game = %preferred, "requested launch game is not in the catalog");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;

    #[test]
    fn unknown_launch_game_is_dropped() {
        let services =
            AppServices::in_memory(fixed_clock(), Some(GameId::new("not-a-game").unwrap()))
                .unwrap();
        assert!(services.launch_game().is_none());

        let services = AppServices::in_memory(
            fixed_clock(),
            Some(GameId::new("needs-vs-wants").unwrap()),
        )
        .unwrap();
        assert_eq!(services.launch_game().unwrap().as_str(), "needs-vs-wants");
        assert_eq!(services.catalog().list().len(), 5);
    }
}
