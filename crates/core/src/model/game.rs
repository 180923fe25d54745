use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{GameId, StageId};
use crate::model::stage::Stage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("game {0} has an empty title")]
    EmptyTitle(GameId),

    #[error("game {0} has no stages")]
    NoStages(GameId),

    #[error("game {game} repeats stage id {stage}")]
    DuplicateStage { game: GameId, stage: StageId },
}

/// Which shell hosts the game. Finance quizzes and parenting scenario
/// pickers share the engine but render in different chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameTrack {
    Finance,
    Parenting,
}

impl GameTrack {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameTrack::Finance => "finance",
            GameTrack::Parenting => "parenting",
        }
    }
}

impl fmt::Display for GameTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reward metadata returned by the game lookup. Every field may be absent;
/// `resolve_config` supplies fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    #[serde(default)]
    pub coins: Option<u32>,
    #[serde(default)]
    pub xp: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameDraft {
    pub id: GameId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub track: GameTrack,
    #[serde(default)]
    pub metadata: GameMetadata,
    pub stages: Vec<Stage>,
}

/// Static content for one game: its identity, shell flavour, reward
/// metadata and the ordered stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameDraft")]
pub struct GameDefinition {
    id: GameId,
    title: String,
    subtitle: String,
    track: GameTrack,
    metadata: GameMetadata,
    stages: Vec<Stage>,
}

impl GameDefinition {
    /// # Errors
    ///
    /// Returns `GameError` if the title is blank, there are no stages, or
    /// stage ids repeat.
    pub fn new(
        id: GameId,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        track: GameTrack,
        metadata: GameMetadata,
        stages: Vec<Stage>,
    ) -> Result<Self, GameError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GameError::EmptyTitle(id));
        }
        if stages.is_empty() {
            return Err(GameError::NoStages(id));
        }
        let mut seen = HashSet::with_capacity(stages.len());
        for stage in &stages {
            if !seen.insert(stage.id()) {
                return Err(GameError::DuplicateStage {
                    game: id,
                    stage: stage.id(),
                });
            }
        }

        Ok(Self {
            id,
            title,
            subtitle: subtitle.into(),
            track,
            metadata,
            stages,
        })
    }

    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    #[must_use]
    pub fn track(&self) -> GameTrack {
        self.track
    }

    #[must_use]
    pub fn metadata(&self) -> &GameMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl TryFrom<GameDraft> for GameDefinition {
    type Error = GameError;

    fn try_from(draft: GameDraft) -> Result<Self, Self::Error> {
        GameDefinition::new(
            draft.id,
            draft.title,
            draft.subtitle,
            draft.track,
            draft.metadata,
            draft.stages,
        )
    }
}
