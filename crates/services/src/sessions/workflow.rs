use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{
    ConfigDefaults, GameDefinition, GameId, NavigationOverrides, OptionId, Stage, resolve_config,
};
use quiz_core::{EngineTimings, ProceedOutcome, QuizEngine, RevealPhase, SelectOutcome};
use storage::repository::{CompletionRecord, CompletionRepository, SnapshotRepository, StorageError};

use super::service::QuizSession;
use crate::Clock;
use crate::catalog::GameCatalog;
use crate::error::QuizError;

/// Orchestrates play-throughs: config resolution at start, engine calls
/// stamped with the service clock, and the ledger append once a
/// play-through finishes.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    catalog: GameCatalog,
    completions: Arc<dyn CompletionRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    timings: EngineTimings,
    defaults: ConfigDefaults,
    shuffle_options: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: GameCatalog,
        completions: Arc<dyn CompletionRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            completions,
            snapshots,
            timings: EngineTimings::default(),
            defaults: ConfigDefaults::default(),
            shuffle_options: false,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_timings(mut self, timings: EngineTimings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Start a fresh play-through. The reward config is resolved here, once.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownGame` if the id is not in the catalog.
    pub fn start_game(
        &self,
        game_id: &GameId,
        navigation: Option<&NavigationOverrides>,
    ) -> Result<QuizSession, QuizError> {
        let game = self.game(game_id)?;
        let stages = if self.shuffle_options {
            shuffled(game.stages())
        } else {
            game.stages().to_vec()
        };
        let engine = QuizEngine::new(
            stages,
            self.config_for(&game, navigation),
            self.timings,
            self.clock.now(),
        )?;
        let session = QuizSession::new(game, engine);
        tracing::info!(
            game = %game_id,
            playthrough = %session.playthrough_id(),
            stages = session.engine().total_stages(),
            "game started"
        );
        Ok(session)
    }

    /// Resume the play-through saved for a game, if there is one.
    ///
    /// Snapshots that no longer fit the game content are discarded. A
    /// finished snapshot only exists when its ledger append failed; resuming
    /// records it and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` for unknown games or storage failures.
    pub async fn resume_game(
        &self,
        game_id: &GameId,
        navigation: Option<&NavigationOverrides>,
    ) -> Result<Option<QuizSession>, QuizError> {
        let game = self.game(game_id)?;
        let Some(snapshot) = self.snapshots.load_snapshot(game_id).await? else {
            return Ok(None);
        };

        // Shuffled option order is not part of the snapshot; ids still match.
        let stages = game.stages().to_vec();
        let config = self.config_for(&game, navigation);
        let engine = match QuizEngine::restore(stages, config, self.timings, snapshot) {
            Ok(engine) => engine,
            Err(err) => {
                tracing::warn!(game = %game_id, error = %err, "discarding stale snapshot");
                self.snapshots.clear_snapshot(game_id).await?;
                return Ok(None);
            }
        };

        let mut session = QuizSession::new(game, engine);
        if session.is_finished() {
            match self.finalize_completion(&mut session).await {
                Ok(_) | Err(QuizError::Storage(StorageError::Conflict)) => {
                    self.snapshots.clear_snapshot(game_id).await?;
                }
                Err(err) => return Err(err),
            }
            return Ok(None);
        }

        tracing::info!(
            game = %game_id,
            playthrough = %session.playthrough_id(),
            stage_index = session.engine().stage_index(),
            "game resumed"
        );
        Ok(Some(session))
    }

    /// Pick an option on the current stage.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Engine` for unknown options or finished sessions.
    pub fn select_option(
        &self,
        session: &mut QuizSession,
        option_id: &OptionId,
    ) -> Result<SelectOutcome, QuizError> {
        let stage = session.current_stage().id();
        let outcome = session
            .engine_mut()
            .select_option(option_id, self.clock.now())?;
        match &outcome {
            SelectOutcome::Recorded { is_correct, .. } => tracing::debug!(
                game = %session.game_id(),
                stage = %stage,
                option = %option_id,
                is_correct,
                "option selected"
            ),
            SelectOutcome::Ignored => tracing::debug!(
                game = %session.game_id(),
                stage = %stage,
                "second selection ignored"
            ),
        }
        Ok(outcome)
    }

    /// Apply due timer transitions and record the result if the play-through
    /// just finished.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the ledger append fails. The session
    /// stays finished; `finalize_completion` retries the append.
    pub async fn tick(&self, session: &mut QuizSession) -> Result<RevealPhase, QuizError> {
        let before = session.phase();
        let phase = session.engine_mut().tick(self.clock.now());
        if phase != before {
            tracing::debug!(game = %session.game_id(), ?before, ?phase, "phase changed");
        }
        self.record_if_finished(session).await?;
        Ok(phase)
    }

    /// Continue to the next stage, or to the results after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Engine` while the feedback delay is running or
    /// before an answer, and `QuizError::Storage` if the ledger append fails.
    pub async fn proceed(&self, session: &mut QuizSession) -> Result<ProceedOutcome, QuizError> {
        let outcome = session.engine_mut().proceed(self.clock.now())?;
        if let ProceedOutcome::Advanced { stage_index } = outcome {
            tracing::debug!(game = %session.game_id(), stage_index, "advanced");
        }
        self.record_if_finished(session).await?;
        Ok(outcome)
    }

    /// Start the same game over with a new play-through id. A finished
    /// result that is not in the ledger yet is recorded first.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the pending result cannot be recorded
    /// (the session is left untouched) or the saved snapshot cannot be
    /// cleared.
    pub async fn retry(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        if session.needs_recording() {
            match self.finalize_completion(session).await {
                Ok(_) | Err(QuizError::Storage(StorageError::Conflict)) => {}
                Err(err) => {
                    tracing::warn!(
                        game = %session.game_id(),
                        error = %err,
                        "retry refused; result not recorded"
                    );
                    return Err(err);
                }
            }
        }
        session.engine_mut().retry(self.clock.now());
        session.set_completion_id(None);
        self.snapshots.clear_snapshot(session.game_id()).await?;
        tracing::info!(
            game = %session.game_id(),
            playthrough = %session.playthrough_id(),
            "game restarted"
        );
        Ok(())
    }

    /// Save the session so it can be resumed later. Finished sessions have
    /// nothing to resume and are not saved.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the snapshot cannot be stored.
    pub async fn save_snapshot(&self, session: &QuizSession) -> Result<(), QuizError> {
        if session.is_finished() && !session.needs_recording() {
            return Ok(());
        }
        self.snapshots
            .save_snapshot(session.game_id(), &session.snapshot(), self.clock.now())
            .await?;
        tracing::debug!(game = %session.game_id(), "snapshot saved");
        Ok(())
    }

    /// Write the finished play-through to the ledger. Returns the existing
    /// id when it was already recorded.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFinished` for a running play-through and
    /// `QuizError::Storage` if the append fails.
    pub async fn finalize_completion(&self, session: &mut QuizSession) -> Result<i64, QuizError> {
        if let Some(id) = session.completion_id() {
            return Ok(id);
        }
        let report = session.report().ok_or(QuizError::NotFinished)?;
        let record = CompletionRecord::from_report(
            session.playthrough_id(),
            session.game_id().clone(),
            session.game().track(),
            session.started_at(),
            report,
        );

        let id = self.completions.append_completion(&record).await?;
        session.set_completion_id(Some(id));
        tracing::info!(
            game = %record.game_id,
            playthrough = %record.playthrough_id,
            completion_id = id,
            passed = record.passed,
            coins = record.coins_awarded,
            xp = record.xp_awarded,
            "completion recorded"
        );

        if let Err(err) = self.snapshots.clear_snapshot(session.game_id()).await {
            tracing::warn!(game = %session.game_id(), error = %err, "failed to clear snapshot");
        }
        Ok(id)
    }

    async fn record_if_finished(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        if !session.needs_recording() {
            return Ok(());
        }
        if let Err(err) = self.finalize_completion(session).await {
            tracing::warn!(game = %session.game_id(), error = %err, "completion not recorded");
            return Err(err);
        }
        Ok(())
    }

    fn game(&self, game_id: &GameId) -> Result<GameDefinition, QuizError> {
        self.catalog
            .get(game_id)
            .cloned()
            .ok_or_else(|| QuizError::UnknownGame(game_id.clone()))
    }

    fn config_for(
        &self,
        game: &GameDefinition,
        navigation: Option<&NavigationOverrides>,
    ) -> quiz_core::model::GameConfig {
        let total_levels = u32::try_from(game.stage_count()).unwrap_or(u32::MAX);
        resolve_config(
            self.catalog.metadata_for(game),
            navigation,
            &self.defaults,
            game.title(),
            total_levels,
        )
    }
}

fn shuffled(stages: &[Stage]) -> Vec<Stage> {
    let mut rng = rng();
    stages
        .iter()
        .map(|stage| {
            let mut order: Vec<usize> = (0..stage.options().len()).collect();
            order.shuffle(&mut rng);
            stage.with_option_order(&order)
        })
        .collect()
}
