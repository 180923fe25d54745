use chrono::{DateTime, Utc};

use quiz_core::model::{
    CompletionReport, GameConfig, GameDefinition, GameId, PlaythroughId, SessionSnapshot, Stage,
    StageOption,
};
use quiz_core::{QuizEngine, RevealPhase};

use super::progress::QuizProgress;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of a game: the static content, the engine state, and
/// whether the result has reached the ledger yet.
///
/// Sessions are plain values owned by the caller. `QuizLoopService` drives
/// them with its clock and persists completions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    game: GameDefinition,
    engine: QuizEngine,
    completion_id: Option<i64>,
}

impl QuizSession {
    pub(crate) fn new(game: GameDefinition, engine: QuizEngine) -> Self {
        Self {
            game,
            engine,
            completion_id: None,
        }
    }

    #[must_use]
    pub fn game(&self) -> &GameDefinition {
        &self.game
    }

    #[must_use]
    pub fn game_id(&self) -> &GameId {
        self.game.id()
    }

    #[must_use]
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut QuizEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    #[must_use]
    pub fn playthrough_id(&self) -> PlaythroughId {
        self.engine.playthrough_id()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.engine.started_at()
    }

    /// Ledger id of the completion, once recorded.
    #[must_use]
    pub fn completion_id(&self) -> Option<i64> {
        self.completion_id
    }

    pub(crate) fn set_completion_id(&mut self, id: Option<i64>) {
        self.completion_id = id;
    }

    /// Finished and not yet written to the ledger.
    #[must_use]
    pub fn needs_recording(&self) -> bool {
        self.engine.is_finished() && self.completion_id.is_none()
    }

    #[must_use]
    pub fn current_stage(&self) -> &Stage {
        self.engine.current_stage()
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&StageOption> {
        self.engine.selected_option()
    }

    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.engine.phase()
    }

    #[must_use]
    pub fn can_proceed(&self) -> bool {
        self.engine.can_proceed()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    #[must_use]
    pub fn report(&self) -> Option<&CompletionReport> {
        self.engine.report()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.engine.next_deadline()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.engine.total_stages();
        let answered = self.engine.history().len();
        QuizProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current_level: self.engine.stage_index() + 1,
            is_complete: self.engine.is_finished(),
        }
    }
}
