use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::session::{GameCode, SessionId};

/// One result row on its way into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub session_id: SessionId,
    pub game_code: GameCode,
    pub payload: serde_json::Value,
}

impl ResultRecord {
    pub fn from_result<T: Serialize>(
        session_id: SessionId,
        game_code: GameCode,
        result: &T,
    ) -> Result<Self> {
        let payload = serde_json::to_value(result)
            .with_context(|| format!("failed to serialize {game_code} result"))?;
        Ok(Self {
            session_id,
            game_code,
            payload,
        })
    }
}

/// A result row read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub id: i64,
    pub session_id: SessionId,
    pub game_code: GameCode,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    /// Decode the payload back into the game's result type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone())
            .with_context(|| format!("failed to decode {} result {}", self.game_code, self.id))
    }
}
