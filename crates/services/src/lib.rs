#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod sessions;
pub mod shell;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog::GameCatalog;
pub use error::{AppServicesError, CatalogError, QuizError};
pub use shell::ShellView;

pub use sessions::{
    CompletionHistoryService, CompletionId, CompletionListItem, QuizLoopService, QuizProgress,
    QuizSession,
};
