use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::config::GameConfig;
use crate::model::ids::{OptionId, PlaythroughId, StageId};

/// One answered stage in a play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub stage_id: StageId,
    pub option_id: OptionId,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Aggregate result computed once when a play-through finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub correct_count: u32,
    pub total_stages: u32,
    pub pass_threshold: u32,
    pub final_score: u32,
    pub has_passed: bool,
    pub coins_awarded: u32,
    pub xp_awarded: u32,
    pub finished_at: DateTime<Utc>,
}

impl CompletionReport {
    /// Build the report from the answer history.
    ///
    /// A pass awards the full configured coins and XP; anything less awards
    /// nothing, whatever was collected during play.
    #[must_use]
    pub fn from_history(
        history: &[AnswerRecord],
        total_stages: u32,
        config: &GameConfig,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let correct = history.iter().filter(|record| record.is_correct).count();
        let correct_count = u32::try_from(correct).unwrap_or(u32::MAX);
        let pass_threshold = if config.pass_threshold == 0 {
            total_stages
        } else {
            config.pass_threshold
        };
        let has_passed = correct_count >= pass_threshold;

        Self {
            correct_count,
            total_stages,
            pass_threshold,
            final_score: correct_count,
            has_passed,
            coins_awarded: if has_passed { config.total_coins } else { 0 },
            xp_awarded: if has_passed { config.total_xp } else { 0 },
            finished_at,
        }
    }

    #[must_use]
    pub fn all_answers_correct(&self) -> bool {
        self.correct_count == self.total_stages
    }

    #[must_use]
    pub fn show_confetti(&self) -> bool {
        self.has_passed
    }

    #[must_use]
    pub fn should_submit_game_completion(&self) -> bool {
        self.has_passed
    }
}

/// Selection made on the current stage, waiting for the reveal delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub option_id: OptionId,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Serializable image of a play-through, for save/restore at the shell
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub playthrough_id: PlaythroughId,
    pub total_stages: u32,
    pub stage_index: usize,
    pub selection: Option<PendingSelection>,
    pub coins: u32,
    pub history: Vec<AnswerRecord>,
    pub report: Option<CompletionReport>,
    pub started_at: DateTime<Utc>,
}
