use chrono::{DateTime, Utc};
use quiz_core::model::{GameId, SessionSnapshot};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{SnapshotRepository, StorageError};

#[async_trait::async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn save_snapshot(
        &self,
        game_id: &GameId,
        snapshot: &SessionSnapshot,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(snapshot).map_err(ser)?;
        sqlx::query(
            r"
                INSERT INTO session_snapshots (game_id, payload, saved_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(game_id) DO UPDATE SET
                    payload = excluded.payload,
                    saved_at = excluded.saved_at
            ",
        )
        .bind(game_id.as_str())
        .bind(payload)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn load_snapshot(
        &self,
        game_id: &GameId,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        let row = sqlx::query("SELECT payload FROM session_snapshots WHERE game_id = ?1")
            .bind(game_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(ser)?;
        serde_json::from_str(&payload).map(Some).map_err(ser)
    }

    async fn clear_snapshot(&self, game_id: &GameId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_snapshots WHERE game_id = ?1")
            .bind(game_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
