//! Game session records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque session handle assigned by the store when a game starts.
///
/// Values are monotonic per store but carry no meaning beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i64);

impl SessionId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameCode {
    Nback,
    Rps,
    CountComparison,
    NumberPressing,
    ShapeRotation,
    CatChaser,
}

impl GameCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCode::Nback => "NBACK",
            GameCode::Rps => "RPS",
            GameCode::CountComparison => "COUNT_COMPARISON",
            GameCode::NumberPressing => "NUMBER_PRESSING",
            GameCode::ShapeRotation => "SHAPE_ROTATION",
            GameCode::CatChaser => "CAT_CHASER",
        }
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: SessionId,
    pub game_code: GameCode,
    pub play_datetime: DateTime<Utc>,
    /// Settings used to generate the session, as submitted by the player.
    pub settings: serde_json::Value,
}
