use quiz_core::model::{GameId, GameTrack, PlaythroughId};
use sqlx::Row;

use crate::repository::{CompletionRecord, CompletionRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn parse_track(s: &str) -> Result<GameTrack, StorageError> {
    match s {
        "finance" => Ok(GameTrack::Finance),
        "parenting" => Ok(GameTrack::Parenting),
        _ => Err(StorageError::Serialization(format!("invalid track: {s}"))),
    }
}

pub(crate) fn game_id_from_str(s: &str) -> Result<GameId, StorageError> {
    GameId::new(s).map_err(ser)
}

pub(crate) fn map_completion_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<CompletionRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let playthrough_id: PlaythroughId = row
        .try_get::<String, _>("playthrough_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let game_id = game_id_from_str(&row.try_get::<String, _>("game_id").map_err(ser)?)?;
    let track = parse_track(&row.try_get::<String, _>("track").map_err(ser)?)?;
    let passed: i64 = row.try_get("passed").map_err(ser)?;

    let record = CompletionRecord {
        playthrough_id,
        game_id,
        track,
        started_at: row.try_get("started_at").map_err(ser)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
        correct_count: u32_from_i64(
            "correct_count",
            row.try_get::<i64, _>("correct_count").map_err(ser)?,
        )?,
        total_stages: u32_from_i64(
            "total_stages",
            row.try_get::<i64, _>("total_stages").map_err(ser)?,
        )?,
        coins_awarded: u32_from_i64(
            "coins_awarded",
            row.try_get::<i64, _>("coins_awarded").map_err(ser)?,
        )?,
        xp_awarded: u32_from_i64(
            "xp_awarded",
            row.try_get::<i64, _>("xp_awarded").map_err(ser)?,
        )?,
        passed: passed != 0,
    };

    Ok(CompletionRow::new(id, record))
}
