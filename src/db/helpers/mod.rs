use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::db::models::GameCode;

pub fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_game_code(value: &str) -> Result<GameCode> {
    match value {
        "NBACK" => Ok(GameCode::Nback),
        "RPS" => Ok(GameCode::Rps),
        "COUNT_COMPARISON" => Ok(GameCode::CountComparison),
        "NUMBER_PRESSING" => Ok(GameCode::NumberPressing),
        "SHAPE_ROTATION" => Ok(GameCode::ShapeRotation),
        "CAT_CHASER" => Ok(GameCode::CatChaser),
        other => Err(anyhow!("unknown game code {other}")),
    }
}

pub fn parse_json(value: &str, field: &str) -> Result<serde_json::Value> {
    serde_json::from_str(value).with_context(|| format!("failed to parse {field} as JSON"))
}
