use quiz_core::model::GameId;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, map_completion_row, ser};
use crate::repository::{CompletionRecord, CompletionRepository, CompletionRow, StorageError};

const SELECT_COLUMNS: &str = r"
    SELECT
        id, playthrough_id, game_id, track, started_at, completed_at,
        correct_count, total_stages, coins_awarded, xp_awarded, passed
    FROM completions
";

fn map_insert_error(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    conn(e)
}

#[async_trait::async_trait]
impl CompletionRepository for SqliteRepository {
    async fn append_completion(&self, record: &CompletionRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO completions (
                    playthrough_id, game_id, track, started_at, completed_at,
                    correct_count, total_stages, coins_awarded, xp_awarded, passed
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(record.playthrough_id.to_string())
        .bind(record.game_id.as_str())
        .bind(record.track.as_str())
        .bind(record.started_at)
        .bind(record.completed_at)
        .bind(i64::from(record.correct_count))
        .bind(i64::from(record.total_stages))
        .bind(i64::from(record.coins_awarded))
        .bind(i64::from(record.xp_awarded))
        .bind(i64::from(record.passed))
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(res.last_insert_rowid())
    }

    async fn get_completion(&self, id: i64) -> Result<CompletionRow, StorageError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?
            .ok_or(StorageError::NotFound)?;

        map_completion_row(&row)
    }

    async fn list_completions(
        &self,
        game_id: Option<&GameId>,
        limit: u32,
    ) -> Result<Vec<CompletionRow>, StorageError> {
        let mut sql = String::from(SELECT_COLUMNS);
        if game_id.is_some() {
            sql.push_str(" WHERE game_id = ?1 ORDER BY completed_at DESC, id DESC LIMIT ?2");
        } else {
            sql.push_str(" ORDER BY completed_at DESC, id DESC LIMIT ?1");
        }

        let mut query = sqlx::query(&sql);
        if let Some(game_id) = game_id {
            query = query.bind(game_id.as_str());
        }
        query = query.bind(i64::from(limit));

        let rows = query.fetch_all(&self.pool).await.map_err(conn)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_completion_row(&row)?);
        }
        Ok(out)
    }

    async fn coin_balance(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COALESCE(SUM(coins_awarded), 0) AS total FROM completions")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        let total: i64 = row.try_get("total").map_err(ser)?;
        u64::try_from(total)
            .map_err(|_| StorageError::Serialization(format!("invalid coin balance: {total}")))
    }
}
