use thiserror::Error;

use crate::engine::EngineError;
use crate::model::{GameError, GameIdError, StageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    GameId(#[from] GameIdError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
