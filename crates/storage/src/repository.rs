use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{CompletionReport, GameId, GameTrack, PlaythroughId, SessionSnapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Ledger entry for one finished play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub playthrough_id: PlaythroughId,
    pub game_id: GameId,
    pub track: GameTrack,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub correct_count: u32,
    pub total_stages: u32,
    pub coins_awarded: u32,
    pub xp_awarded: u32,
    pub passed: bool,
}

impl CompletionRecord {
    #[must_use]
    pub fn from_report(
        playthrough_id: PlaythroughId,
        game_id: GameId,
        track: GameTrack,
        started_at: DateTime<Utc>,
        report: &CompletionReport,
    ) -> Self {
        Self {
            playthrough_id,
            game_id,
            track,
            started_at,
            completed_at: report.finished_at,
            correct_count: report.correct_count,
            total_stages: report.total_stages,
            coins_awarded: report.coins_awarded,
            xp_awarded: report.xp_awarded,
            passed: report.has_passed,
        }
    }
}

/// A ledger entry with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRow {
    pub id: i64,
    pub record: CompletionRecord,
}

impl CompletionRow {
    #[must_use]
    pub fn new(id: i64, record: CompletionRecord) -> Self {
        Self { id, record }
    }
}

/// Append-only coin/XP ledger written when a play-through finishes.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Append a completion.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the play-through was already
    /// recorded, or other storage errors.
    async fn append_completion(&self, record: &CompletionRecord) -> Result<i64, StorageError>;

    /// Fetch one completion by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_completion(&self, id: i64) -> Result<CompletionRow, StorageError>;

    /// List completions newest first, optionally for a single game.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_completions(
        &self,
        game_id: Option<&GameId>,
        limit: u32,
    ) -> Result<Vec<CompletionRow>, StorageError>;

    /// Sum of all coins awarded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn coin_balance(&self) -> Result<u64, StorageError>;
}

/// Save/restore hook for in-progress play-throughs, one slot per game.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Store (or replace) the snapshot for a game.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(
        &self,
        game_id: &GameId,
        snapshot: &SessionSnapshot,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Load the snapshot for a game, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be read or decoded.
    async fn load_snapshot(&self, game_id: &GameId)
    -> Result<Option<SessionSnapshot>, StorageError>;

    /// Drop the snapshot for a game. Missing snapshots are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_snapshot(&self, game_id: &GameId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    completions: Arc<Mutex<Vec<CompletionRow>>>,
    snapshots: Arc<Mutex<HashMap<GameId, SessionSnapshot>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completions: Arc::new(Mutex::new(Vec::new())),
            snapshots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl CompletionRepository for InMemoryRepository {
    async fn append_completion(&self, record: &CompletionRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard
            .iter()
            .any(|row| row.record.playthrough_id == record.playthrough_id)
        {
            return Err(StorageError::Conflict);
        }
        let id = i64::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("completion id overflow".into()))?
            + 1;
        guard.push(CompletionRow::new(id, record.clone()));
        Ok(id)
    }

    async fn get_completion(&self, id: i64) -> Result<CompletionRow, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_completions(
        &self,
        game_id: Option<&GameId>,
        limit: u32,
    ) -> Result<Vec<CompletionRow>, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<_> = guard
            .iter()
            .filter(|row| game_id.is_none_or(|id| &row.record.game_id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.record
                .completed_at
                .cmp(&a.record.completed_at)
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn coin_balance(&self) -> Result<u64, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .map(|row| u64::from(row.record.coins_awarded))
            .sum())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn save_snapshot(
        &self,
        game_id: &GameId,
        snapshot: &SessionSnapshot,
        _saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(game_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn load_snapshot(
        &self,
        game_id: &GameId,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(game_id).cloned())
    }

    async fn clear_snapshot(&self, game_id: &GameId) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(game_id);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub completions: Arc<dyn CompletionRepository>,
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let completions: Arc<dyn CompletionRepository> = Arc::new(repo.clone());
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(repo);
        Self {
            completions,
            snapshots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;

    fn record(game: &str, coins: u32, offset_min: i64) -> CompletionRecord {
        let at = fixed_now() + Duration::minutes(offset_min);
        CompletionRecord {
            playthrough_id: PlaythroughId::generate(),
            game_id: GameId::new(game).unwrap(),
            track: GameTrack::Finance,
            started_at: at,
            completed_at: at,
            correct_count: 5,
            total_stages: 5,
            coins_awarded: coins,
            xp_awarded: 10,
            passed: coins > 0,
        }
    }

    #[tokio::test]
    async fn completions_list_newest_first_and_filter() {
        let repo = InMemoryRepository::new();
        repo.append_completion(&record("a-game", 5, 0)).await.unwrap();
        repo.append_completion(&record("b-game", 0, 1)).await.unwrap();
        repo.append_completion(&record("a-game", 7, 2)).await.unwrap();

        let all = repo.list_completions(None, 10).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        let game = GameId::new("a-game").unwrap();
        let only_a = repo.list_completions(Some(&game), 1).await.unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].record.coins_awarded, 7);

        assert_eq!(repo.coin_balance().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn duplicate_playthrough_conflicts() {
        let repo = InMemoryRepository::new();
        let rec = record("a-game", 5, 0);
        repo.append_completion(&rec).await.unwrap();
        let err = repo.append_completion(&rec).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn missing_completion_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.get_completion(42).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
