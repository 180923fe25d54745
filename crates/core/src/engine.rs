//! Shared play-through engine for every scenario game.
//!
//! A play-through walks an ordered stage list. Each stage moves through
//! `Unanswered -> Answered -> Proceedable` and then either on to the next
//! stage or to `Finished`. Time never comes from a clock here: every
//! time-dependent call takes `now`, and `tick` applies whatever transitions
//! are due.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::{
    AnswerRecord, CompletionReport, GameConfig, OptionId, PendingSelection, PlaythroughId,
    SessionSnapshot, Stage, StageId, StageOption,
};
use crate::time::millis_until;

/// Delay between picking an option and being allowed to continue.
pub const FEEDBACK_DELAY_MS: i64 = 1500;
/// Delay after the last answer before results are computed automatically.
pub const FINALIZE_DELAY_MS: i64 = 2500;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("a play-through needs at least one stage")]
    NoStages,

    #[error("option {option} does not exist on stage {stage}")]
    UnknownOption { stage: StageId, option: OptionId },

    #[error("current stage has not been answered")]
    Unanswered,

    #[error("feedback still showing for {remaining_ms}ms")]
    NotProceedable { remaining_ms: u64 },

    #[error("play-through already finished")]
    Finished,

    #[error("snapshot does not match game content: {0}")]
    SnapshotMismatch(&'static str),
}

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

/// Reveal delays. Not configurable per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTimings {
    pub feedback_delay: Duration,
    pub finalize_delay: Duration,
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::milliseconds(FEEDBACK_DELAY_MS),
            finalize_delay: Duration::milliseconds(FINALIZE_DELAY_MS),
        }
    }
}

impl EngineTimings {
    /// No delays at all; handy for previews and tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            feedback_delay: Duration::zero(),
            finalize_delay: Duration::zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Waiting for a pick.
    Unanswered,
    /// Feedback visible, continue disabled.
    Answered,
    /// Feedback visible, continue enabled.
    Proceedable,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Recorded { is_correct: bool, reflection: String },
    /// A pick already exists for this stage.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProceedOutcome {
    Advanced { stage_index: usize },
    Finished(CompletionReport),
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// State machine for one play-through over a fixed stage list.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    stages: Vec<Stage>,
    config: GameConfig,
    timings: EngineTimings,
    playthrough_id: PlaythroughId,
    started_at: DateTime<Utc>,
    stage_index: usize,
    selection: Option<PendingSelection>,
    phase: RevealPhase,
    coins: u32,
    history: Vec<AnswerRecord>,
    report: Option<CompletionReport>,
}

impl QuizEngine {
    /// # Errors
    ///
    /// Returns `EngineError::NoStages` for an empty stage list.
    pub fn new(
        stages: Vec<Stage>,
        config: GameConfig,
        timings: EngineTimings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if stages.is_empty() {
            return Err(EngineError::NoStages);
        }
        Ok(Self {
            stages,
            config,
            timings,
            playthrough_id: PlaythroughId::generate(),
            started_at,
            stage_index: 0,
            selection: None,
            phase: RevealPhase::Unanswered,
            coins: 0,
            history: Vec::new(),
            report: None,
        })
    }

    /// Rebuild an engine from a snapshot taken over the same stage list.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SnapshotMismatch` when the snapshot cannot
    /// belong to `stages`.
    pub fn restore(
        stages: Vec<Stage>,
        config: GameConfig,
        timings: EngineTimings,
        snapshot: SessionSnapshot,
    ) -> Result<Self, EngineError> {
        if stages.is_empty() {
            return Err(EngineError::NoStages);
        }
        if usize::try_from(snapshot.total_stages).ok() != Some(stages.len()) {
            return Err(EngineError::SnapshotMismatch("stage count"));
        }
        if snapshot.stage_index >= stages.len() {
            return Err(EngineError::SnapshotMismatch("stage index"));
        }
        let answered = snapshot.stage_index + usize::from(snapshot.selection.is_some());
        if snapshot.history.len() != answered {
            return Err(EngineError::SnapshotMismatch("history length"));
        }
        let ids_match = snapshot
            .history
            .iter()
            .zip(&stages)
            .all(|(record, stage)| record.stage_id == stage.id());
        if !ids_match {
            return Err(EngineError::SnapshotMismatch("stage ids"));
        }
        let answers_match = snapshot.history.iter().zip(&stages).all(|(record, stage)| {
            stage
                .option(&record.option_id)
                .is_some_and(|option| option.is_correct == record.is_correct)
        });
        if !answers_match {
            return Err(EngineError::SnapshotMismatch("answers"));
        }
        // The pending selection is always the newest history entry.
        if let Some(selection) = &snapshot.selection {
            let matches_last = snapshot.history.last().is_some_and(|record| {
                record.option_id == selection.option_id && record.is_correct == selection.is_correct
            });
            if !matches_last {
                return Err(EngineError::SnapshotMismatch("selection"));
            }
        }
        if snapshot.report.is_some() && snapshot.selection.is_none() {
            return Err(EngineError::SnapshotMismatch("finished without answer"));
        }

        let phase = if snapshot.report.is_some() {
            RevealPhase::Finished
        } else if snapshot.selection.is_some() {
            RevealPhase::Answered
        } else {
            RevealPhase::Unanswered
        };

        Ok(Self {
            stages,
            config,
            timings,
            playthrough_id: snapshot.playthrough_id,
            started_at: snapshot.started_at,
            stage_index: snapshot.stage_index,
            selection: snapshot.selection,
            phase,
            coins: snapshot.coins,
            history: snapshot.history,
            report: snapshot.report,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            playthrough_id: self.playthrough_id,
            total_stages: self.total_stages_u32(),
            stage_index: self.stage_index,
            selection: self.selection.clone(),
            coins: self.coins,
            history: self.history.clone(),
            report: self.report.clone(),
            started_at: self.started_at,
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn playthrough_id(&self) -> PlaythroughId {
        self.playthrough_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn timings(&self) -> EngineTimings {
        self.timings
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    #[must_use]
    pub fn total_stages(&self) -> usize {
        self.stages.len()
    }

    fn total_stages_u32(&self) -> u32 {
        u32::try_from(self.stages.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn current_stage(&self) -> &Stage {
        &self.stages[self.stage_index]
    }

    #[must_use]
    pub fn is_last_stage(&self) -> bool {
        self.stage_index + 1 == self.stages.len()
    }

    /// Phase as of the last `tick`.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    #[must_use]
    pub fn can_proceed(&self) -> bool {
        self.phase == RevealPhase::Proceedable
    }

    #[must_use]
    pub fn selection(&self) -> Option<&PendingSelection> {
        self.selection.as_ref()
    }

    /// The option picked on the current stage, if any.
    #[must_use]
    pub fn selected_option(&self) -> Option<&StageOption> {
        let selection = self.selection.as_ref()?;
        self.current_stage().option(&selection.option_id)
    }

    /// Coins shown to the player: the running tally during play, the awarded
    /// amount once finished.
    #[must_use]
    pub fn coins(&self) -> u32 {
        self.coins
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|record| record.is_correct).count()
    }

    #[must_use]
    pub fn report(&self) -> Option<&CompletionReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.report.as_ref().map_or(0, |report| report.final_score)
    }

    #[must_use]
    pub fn has_passed(&self) -> bool {
        self.report.as_ref().is_some_and(|report| report.has_passed)
    }

    /// When the next automatic transition is due, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        let selection = self.selection.as_ref()?;
        match self.phase {
            RevealPhase::Answered => Some(selection.answered_at + self.timings.feedback_delay),
            RevealPhase::Proceedable if self.is_last_stage() => {
                Some(selection.answered_at + self.timings.finalize_delay)
            }
            _ => None,
        }
    }

    // ─── Transitions ───────────────────────────────────────────────────────────

    /// Pick an option on the current stage.
    ///
    /// A second pick on the same stage is ignored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Finished` after the play-through ended and
    /// `EngineError::UnknownOption` when the id is not on this stage.
    pub fn select_option(
        &mut self,
        option_id: &OptionId,
        now: DateTime<Utc>,
    ) -> Result<SelectOutcome, EngineError> {
        if self.is_finished() {
            return Err(EngineError::Finished);
        }
        if self.selection.is_some() {
            return Ok(SelectOutcome::Ignored);
        }

        let stage = &self.stages[self.stage_index];
        let option = stage
            .option(option_id)
            .ok_or_else(|| EngineError::UnknownOption {
                stage: stage.id(),
                option: option_id.clone(),
            })?;
        let is_correct = option.is_correct;
        let reflection = option.reflection.clone();
        let stage_id = stage.id();
        let reward = stage.reward();

        self.history.push(AnswerRecord {
            stage_id,
            option_id: option_id.clone(),
            is_correct,
            answered_at: now,
        });
        if is_correct {
            self.coins = self.coins.saturating_add(reward);
        }
        self.selection = Some(PendingSelection {
            option_id: option_id.clone(),
            is_correct,
            answered_at: now,
        });
        self.phase = RevealPhase::Answered;

        Ok(SelectOutcome::Recorded {
            is_correct,
            reflection,
        })
    }

    /// Apply every automatic transition due at `now` and return the phase.
    pub fn tick(&mut self, now: DateTime<Utc>) -> RevealPhase {
        if self.phase == RevealPhase::Finished {
            return self.phase;
        }
        let Some(answered_at) = self.selection.as_ref().map(|s| s.answered_at) else {
            return self.phase;
        };

        if self.phase == RevealPhase::Answered && now >= answered_at + self.timings.feedback_delay
        {
            self.phase = RevealPhase::Proceedable;
        }

        let finalize_at = answered_at + self.timings.finalize_delay;
        if self.is_last_stage() && now >= finalize_at {
            self.finalize(finalize_at);
        }

        self.phase
    }

    /// Continue past the current stage: the next stage on success, or the
    /// results once the last stage is done.
    ///
    /// On a finished play-through this returns the stored report again, so
    /// a late "Finish" click cannot recompute or double-award.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Unanswered` before a pick, and
    /// `EngineError::NotProceedable` while the feedback delay is running.
    pub fn proceed(&mut self, now: DateTime<Utc>) -> Result<ProceedOutcome, EngineError> {
        self.tick(now);
        if let Some(report) = &self.report {
            return Ok(ProceedOutcome::Finished(report.clone()));
        }
        match self.phase {
            RevealPhase::Unanswered => Err(EngineError::Unanswered),
            RevealPhase::Answered => {
                let remaining_ms = self.next_deadline().map_or(0, |at| millis_until(at, now));
                Err(EngineError::NotProceedable { remaining_ms })
            }
            RevealPhase::Proceedable if self.is_last_stage() => {
                Ok(ProceedOutcome::Finished(self.finalize(now).clone()))
            }
            RevealPhase::Proceedable => {
                self.stage_index += 1;
                self.selection = None;
                self.phase = RevealPhase::Unanswered;
                Ok(ProceedOutcome::Advanced {
                    stage_index: self.stage_index,
                })
            }
            RevealPhase::Finished => Err(EngineError::Finished),
        }
    }

    /// Start over with a fresh play-through id.
    pub fn retry(&mut self, now: DateTime<Utc>) {
        self.playthrough_id = PlaythroughId::generate();
        self.started_at = now;
        self.stage_index = 0;
        self.selection = None;
        self.phase = RevealPhase::Unanswered;
        self.coins = 0;
        self.history.clear();
        self.report = None;
    }

    /// Sole place results are computed. Idempotent.
    fn finalize(&mut self, finished_at: DateTime<Utc>) -> &CompletionReport {
        let created = self.report.is_none();
        let total_stages = self.total_stages_u32();
        let report = self.report.get_or_insert_with(|| {
            CompletionReport::from_history(&self.history, total_stages, &self.config, finished_at)
        });
        if created {
            self.coins = report.coins_awarded;
            self.phase = RevealPhase::Finished;
        }
        report
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfigDefaults, StageOption, resolve_config};
    use crate::time::fixed_now;
    use proptest::prelude::*;

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    fn stages(count: u32) -> Vec<Stage> {
        (1..=count)
            .map(|id| {
                Stage::new(
                    StageId::new(id),
                    format!("Scenario {id}"),
                    vec![
                        StageOption::new("a", "Wrong", "Not quite.", false),
                        StageOption::new("b", "Right", "Nice work.", true),
                    ],
                    1,
                )
                .unwrap()
            })
            .collect()
    }

    fn engine(count: u32) -> QuizEngine {
        let config = resolve_config(None, None, &ConfigDefaults::default(), "Test", count);
        QuizEngine::new(stages(count), config, EngineTimings::default(), fixed_now()).unwrap()
    }

    fn right() -> OptionId {
        OptionId::new("b")
    }

    fn wrong() -> OptionId {
        OptionId::new("a")
    }

    /// Answer the current stage and proceed once the feedback delay passed.
    fn answer_and_proceed(
        engine: &mut QuizEngine,
        pick: &OptionId,
        at: DateTime<Utc>,
    ) -> ProceedOutcome {
        engine.select_option(pick, at).unwrap();
        engine.proceed(at + ms(FEEDBACK_DELAY_MS)).unwrap()
    }

    #[test]
    fn empty_stage_list_is_rejected() {
        let config = resolve_config(None, None, &ConfigDefaults::default(), "Test", 0);
        let err =
            QuizEngine::new(Vec::new(), config, EngineTimings::default(), fixed_now()).unwrap_err();
        assert_eq!(err, EngineError::NoStages);
    }

    #[test]
    fn selection_is_recorded_once() {
        let mut engine = engine(3);
        let now = fixed_now();

        let first = engine.select_option(&right(), now).unwrap();
        assert_eq!(
            first,
            SelectOutcome::Recorded {
                is_correct: true,
                reflection: "Nice work.".into()
            }
        );
        assert_eq!(engine.phase(), RevealPhase::Answered);
        assert_eq!(engine.coins(), 1);

        let second = engine.select_option(&wrong(), now + ms(10)).unwrap();
        assert_eq!(second, SelectOutcome::Ignored);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.coins(), 1);
        assert_eq!(engine.selected_option().unwrap().id, right());
    }

    #[test]
    fn unknown_option_is_an_error() {
        let mut engine = engine(2);
        let err = engine
            .select_option(&OptionId::new("zz"), fixed_now())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption { .. }));
        assert_eq!(engine.phase(), RevealPhase::Unanswered);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn proceed_waits_for_feedback_delay() {
        let mut engine = engine(2);
        let now = fixed_now();
        assert_eq!(engine.proceed(now), Err(EngineError::Unanswered));

        engine.select_option(&wrong(), now).unwrap();
        assert_eq!(engine.tick(now + ms(1499)), RevealPhase::Answered);
        assert!(!engine.can_proceed());
        assert_eq!(
            engine.proceed(now + ms(1000)),
            Err(EngineError::NotProceedable { remaining_ms: 500 })
        );

        assert_eq!(engine.tick(now + ms(1500)), RevealPhase::Proceedable);
        assert!(engine.can_proceed());
        assert_eq!(
            engine.proceed(now + ms(1600)).unwrap(),
            ProceedOutcome::Advanced { stage_index: 1 }
        );
        assert_eq!(engine.phase(), RevealPhase::Unanswered);
        assert!(engine.selection().is_none());
    }

    #[test]
    fn all_correct_passes_with_full_reward() {
        let mut engine = engine(5);
        let mut at = fixed_now();
        for _ in 0..4 {
            answer_and_proceed(&mut engine, &right(), at);
            at += ms(2000);
        }
        let outcome = answer_and_proceed(&mut engine, &right(), at);
        let ProceedOutcome::Finished(report) = outcome else {
            panic!("expected finished outcome");
        };
        assert_eq!(report.final_score, 5);
        assert!(report.has_passed);
        assert_eq!(engine.coins(), 5);
        assert_eq!(engine.final_score(), 5);
        assert!(engine.has_passed());
        assert_eq!(engine.phase(), RevealPhase::Finished);
    }

    #[test]
    fn one_wrong_answer_zeroes_coins() {
        let mut engine = engine(5);
        let mut at = fixed_now();
        for idx in 0..5 {
            let pick = if idx == 2 { wrong() } else { right() };
            answer_and_proceed(&mut engine, &pick, at);
            at += ms(2000);
        }
        assert!(engine.is_finished());
        assert!(!engine.has_passed());
        assert_eq!(engine.final_score(), 4);
        assert_eq!(engine.coins(), 0);
    }

    #[test]
    fn last_stage_finalizes_automatically() {
        let mut engine = engine(1);
        let now = fixed_now();
        engine.select_option(&right(), now).unwrap();

        assert_eq!(engine.tick(now + ms(2000)), RevealPhase::Proceedable);
        assert_eq!(engine.next_deadline(), Some(now + ms(FINALIZE_DELAY_MS)));
        assert_eq!(engine.tick(now + ms(2500)), RevealPhase::Finished);
        assert_eq!(engine.report().unwrap().finished_at, now + ms(2500));
        assert_eq!(engine.next_deadline(), None);
    }

    #[test]
    fn finishing_twice_returns_same_report() {
        let mut engine = engine(1);
        let now = fixed_now();
        engine.select_option(&right(), now).unwrap();
        let ProceedOutcome::Finished(first) = engine.proceed(now + ms(1600)).unwrap() else {
            panic!("expected finished outcome");
        };
        engine.tick(now + ms(5000));
        let ProceedOutcome::Finished(second) = engine.proceed(now + ms(9000)).unwrap() else {
            panic!("expected finished outcome");
        };
        assert_eq!(first, second);
        assert_eq!(engine.coins(), 5);
        assert_eq!(
            engine.select_option(&right(), now + ms(9001)),
            Err(EngineError::Finished)
        );
    }

    #[test]
    fn retry_resets_everything() {
        let mut engine = engine(2);
        let now = fixed_now();
        let first_id = engine.playthrough_id();
        answer_and_proceed(&mut engine, &right(), now);
        answer_and_proceed(&mut engine, &wrong(), now + ms(2000));
        assert!(engine.is_finished());

        engine.retry(now + ms(10_000));
        assert_eq!(engine.stage_index(), 0);
        assert_eq!(engine.coins(), 0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.final_score(), 0);
        assert!(!engine.is_finished());
        assert_eq!(engine.phase(), RevealPhase::Unanswered);
        assert_ne!(engine.playthrough_id(), first_id);
        assert_eq!(engine.started_at(), now + ms(10_000));
    }

    #[test]
    fn snapshot_restores_mid_stage() {
        let mut engine = engine(3);
        let now = fixed_now();
        answer_and_proceed(&mut engine, &right(), now);
        engine.select_option(&wrong(), now + ms(2000)).unwrap();

        let snapshot = engine.snapshot();
        let restored = QuizEngine::restore(
            stages(3),
            engine.config().clone(),
            EngineTimings::default(),
            snapshot,
        )
        .unwrap();
        assert_eq!(restored.stage_index(), 1);
        assert_eq!(restored.phase(), RevealPhase::Answered);
        assert_eq!(restored.history().len(), 2);
        assert_eq!(restored.coins(), 1);
        assert_eq!(restored.playthrough_id(), engine.playthrough_id());
    }

    #[test]
    fn snapshot_from_other_game_is_rejected() {
        let engine = engine(3);
        let err = QuizEngine::restore(
            stages(4),
            engine.config().clone(),
            EngineTimings::default(),
            engine.snapshot(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::SnapshotMismatch("stage count"));
    }

    #[test]
    fn snapshot_with_unknown_option_is_rejected() {
        let mut engine = engine(3);
        engine.select_option(&right(), fixed_now()).unwrap();

        let mut snapshot = engine.snapshot();
        let unknown = OptionId::new("zz");
        snapshot.history[0].option_id = unknown.clone();
        if let Some(selection) = snapshot.selection.as_mut() {
            selection.option_id = unknown;
        }
        let err = QuizEngine::restore(
            stages(3),
            engine.config().clone(),
            EngineTimings::default(),
            snapshot,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::SnapshotMismatch("answers"));
    }

    #[test]
    fn snapshot_with_flipped_correctness_is_rejected() {
        let mut engine = engine(3);
        answer_and_proceed(&mut engine, &right(), fixed_now());

        let mut snapshot = engine.snapshot();
        snapshot.history[0].is_correct = false;
        let err = QuizEngine::restore(
            stages(3),
            engine.config().clone(),
            EngineTimings::default(),
            snapshot,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::SnapshotMismatch("answers"));
    }

    #[test]
    fn snapshot_selection_must_match_last_answer() {
        let mut engine = engine(3);
        engine.select_option(&right(), fixed_now()).unwrap();

        let mut snapshot = engine.snapshot();
        if let Some(selection) = snapshot.selection.as_mut() {
            selection.option_id = wrong();
            selection.is_correct = false;
        }
        let err = QuizEngine::restore(
            stages(3),
            engine.config().clone(),
            EngineTimings::default(),
            snapshot,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::SnapshotMismatch("selection"));
    }

    #[test]
    fn immediate_timings_allow_instant_proceed() {
        let config = resolve_config(None, None, &ConfigDefaults::default(), "Test", 2);
        let mut engine =
            QuizEngine::new(stages(2), config, EngineTimings::immediate(), fixed_now()).unwrap();
        engine.select_option(&right(), fixed_now()).unwrap();
        assert_eq!(
            engine.proceed(fixed_now()).unwrap(),
            ProceedOutcome::Advanced { stage_index: 1 }
        );
    }

    proptest! {
        #[test]
        fn history_and_score_track_answers(
            picks in proptest::collection::vec(any::<bool>(), 1..8),
            extra_delay in 0_i64..3000,
        ) {
            let count = u32::try_from(picks.len()).unwrap();
            let mut engine = engine(count);
            let mut at = fixed_now();

            for (idx, correct) in picks.iter().enumerate() {
                let pick = if *correct { right() } else { wrong() };
                engine.select_option(&pick, at).unwrap();
                prop_assert_eq!(engine.history().len(), idx + 1);
                prop_assert_eq!(
                    engine.tick(at + ms(FEEDBACK_DELAY_MS - 1)),
                    RevealPhase::Answered
                );
                let outcome = engine.proceed(at + ms(FEEDBACK_DELAY_MS + extra_delay));
                prop_assert!(outcome.is_ok());
                at += ms(FEEDBACK_DELAY_MS + extra_delay + 1);
            }

            let correct = picks.iter().filter(|c| **c).count();
            prop_assert!(engine.is_finished());
            prop_assert_eq!(engine.correct_count(), correct);
            prop_assert_eq!(engine.final_score() as usize, correct);
            prop_assert_eq!(engine.has_passed(), correct == picks.len());
            prop_assert_eq!(engine.coins(), if correct == picks.len() { 5 } else { 0 });
        }
    }
}
