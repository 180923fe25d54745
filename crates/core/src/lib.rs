#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;
pub mod time;

pub use engine::{
    EngineError, EngineTimings, FEEDBACK_DELAY_MS, FINALIZE_DELAY_MS, ProceedOutcome, QuizEngine,
    RevealPhase, SelectOutcome,
};
pub use error::Error;
pub use time::Clock;
