//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::EngineError;
use quiz_core::model::GameId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading the built-in game catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("content file {file} is not valid game JSON: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("game {0} is defined twice")]
    DuplicateGame(GameId),
}

/// Errors emitted by the play-through services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("unknown game: {0}")]
    UnknownGame(GameId),
    #[error("play-through is not finished")]
    NotFinished,
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
