mod progress;
mod service;
mod view;
mod workflow;

// Public API of the play-through subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use service::QuizSession;
pub use view::{CompletionHistoryService, CompletionId, CompletionListItem};
pub use workflow::QuizLoopService;
