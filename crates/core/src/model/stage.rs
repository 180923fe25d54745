use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, StageId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StageError {
    #[error("stage {0} has an empty prompt")]
    EmptyPrompt(StageId),

    #[error("stage {0} has no options")]
    NoOptions(StageId),

    #[error("stage {stage} has an option with an empty label ({option})")]
    EmptyLabel { stage: StageId, option: OptionId },

    #[error("stage {stage} repeats option id {option}")]
    DuplicateOption { stage: StageId, option: OptionId },
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// A selectable answer with its correctness flag and the reflection text
/// shown after it is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOption {
    pub id: OptionId,
    pub label: String,
    pub reflection: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl StageOption {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        reflection: impl Into<String>,
        is_correct: bool,
    ) -> Self {
        Self {
            id: OptionId::new(id),
            label: label.into(),
            reflection: reflection.into(),
            is_correct,
        }
    }
}

//
// ─── STAGE ─────────────────────────────────────────────────────────────────────
//

const fn default_reward() -> u32 {
    1
}

/// Unvalidated stage as it appears in content documents.
#[derive(Debug, Clone, Deserialize)]
pub struct StageDraft {
    pub id: StageId,
    pub prompt: String,
    pub options: Vec<StageOption>,
    #[serde(default = "default_reward")]
    pub reward: u32,
}

/// One scenario: a prompt, a closed set of options, and the coins a correct
/// pick is worth during play.
///
/// Content normally marks exactly one option correct; this is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StageDraft")]
pub struct Stage {
    id: StageId,
    prompt: String,
    options: Vec<StageOption>,
    reward: u32,
}

impl Stage {
    /// Build a stage, validating prompt and options.
    ///
    /// # Errors
    ///
    /// Returns `StageError` when the prompt is blank, there are no options,
    /// an option label is blank, or option ids repeat.
    pub fn new(
        id: StageId,
        prompt: impl Into<String>,
        options: Vec<StageOption>,
        reward: u32,
    ) -> Result<Self, StageError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StageError::EmptyPrompt(id));
        }
        if options.is_empty() {
            return Err(StageError::NoOptions(id));
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if option.label.trim().is_empty() {
                return Err(StageError::EmptyLabel {
                    stage: id,
                    option: option.id.clone(),
                });
            }
            if !seen.insert(&option.id) {
                return Err(StageError::DuplicateOption {
                    stage: id,
                    option: option.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            prompt,
            options,
            reward,
        })
    }

    #[must_use]
    pub fn id(&self) -> StageId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[StageOption] {
        &self.options
    }

    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&StageOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    /// The first option flagged correct, if any.
    #[must_use]
    pub fn correct_option(&self) -> Option<&StageOption> {
        self.options.iter().find(|option| option.is_correct)
    }

    /// Returns a copy with options reordered by `order` (indices into the
    /// current option list). Indices that are out of range or repeated are
    /// ignored; options not mentioned keep their relative order at the end.
    #[must_use]
    pub fn with_option_order(&self, order: &[usize]) -> Self {
        let mut used = vec![false; self.options.len()];
        let mut options = Vec::with_capacity(self.options.len());
        for &idx in order {
            if let Some(slot) = used.get_mut(idx) {
                if !*slot {
                    *slot = true;
                    options.push(self.options[idx].clone());
                }
            }
        }
        for (idx, option) in self.options.iter().enumerate() {
            if !used[idx] {
                options.push(option.clone());
            }
        }
        Self {
            options,
            ..self.clone()
        }
    }
}

impl TryFrom<StageDraft> for Stage {
    type Error = StageError;

    fn try_from(draft: StageDraft) -> Result<Self, Self::Error> {
        Stage::new(draft.id, draft.prompt, draft.options, draft.reward)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
