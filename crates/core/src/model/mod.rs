mod config;
mod game;
mod ids;
mod session;
mod stage;

pub use config::{ConfigDefaults, GameConfig, NavigationOverrides, resolve_config};
pub use game::{GameDefinition, GameDraft, GameError, GameMetadata, GameTrack};
pub use ids::{GameId, GameIdError, OptionId, ParseIdError, PlaythroughId, StageId};
pub use session::{AnswerRecord, CompletionReport, PendingSelection, SessionSnapshot};
pub use stage::{Stage, StageDraft, StageError, StageOption};
