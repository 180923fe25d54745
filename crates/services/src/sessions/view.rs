use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{GameId, GameTrack};
use storage::repository::{CompletionRepository, CompletionRow};

use crate::error::QuizError;

/// Storage identifier for a ledger entry (`SQLite` row id).
pub type CompletionId = i64;

/// Presentation-agnostic list item for one finished play-through.
///
/// No pre-formatted strings; the UI formats timestamps as it likes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionListItem {
    pub id: CompletionId,
    pub game_id: GameId,
    pub track: GameTrack,
    pub completed_at: DateTime<Utc>,
    pub correct_count: u32,
    pub total_stages: u32,
    pub coins_awarded: u32,
    pub xp_awarded: u32,
    pub passed: bool,
}

impl CompletionListItem {
    #[must_use]
    pub fn from_row(row: &CompletionRow) -> Self {
        let record = &row.record;
        Self {
            id: row.id,
            game_id: record.game_id.clone(),
            track: record.track,
            completed_at: record.completed_at,
            correct_count: record.correct_count,
            total_stages: record.total_stages,
            coins_awarded: record.coins_awarded,
            xp_awarded: record.xp_awarded,
            passed: record.passed,
        }
    }
}

/// Read side of the completion ledger for history screens.
#[derive(Clone)]
pub struct CompletionHistoryService {
    completions: Arc<dyn CompletionRepository>,
}

impl CompletionHistoryService {
    #[must_use]
    pub fn new(completions: Arc<dyn CompletionRepository>) -> Self {
        Self { completions }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(storage::repository::InMemoryRepository::new()))
    }

    /// Newest completions first, optionally for one game.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on repository failures.
    pub async fn list_completions(
        &self,
        game_id: Option<&GameId>,
        limit: u32,
    ) -> Result<Vec<CompletionListItem>, QuizError> {
        let rows = self.completions.list_completions(game_id, limit).await?;
        Ok(rows.iter().map(CompletionListItem::from_row).collect())
    }

    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the entry is missing or unreadable.
    pub async fn get_completion(&self, id: CompletionId) -> Result<CompletionListItem, QuizError> {
        let row = self.completions.get_completion(id).await?;
        Ok(CompletionListItem::from_row(&row))
    }

    /// Total coins earned across every recorded play-through.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on repository failures.
    pub async fn coin_balance(&self) -> Result<u64, QuizError> {
        Ok(self.completions.coin_balance().await?)
    }
}
