use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_game_code, parse_json, to_i64},
    models::{GameCode, GameSession, SessionId},
};

fn row_to_session(row: &Row) -> Result<GameSession> {
    let game_code: String = row.get("game_code")?;
    let play_datetime: String = row.get("play_datetime")?;
    let settings: String = row.get("settings")?;

    Ok(GameSession {
        id: SessionId::new(row.get("id")?),
        game_code: parse_game_code(&game_code)?,
        play_datetime: parse_datetime(&play_datetime, "play_datetime")?,
        settings: parse_json(&settings, "settings")?,
    })
}

/// One page of sessions plus the total for the game, for paginated listings.
#[derive(Debug, Clone)]
pub struct SessionPage {
    pub sessions: Vec<GameSession>,
    pub total_count: usize,
}

impl Database {
    pub async fn insert_session(
        &self,
        game_code: GameCode,
        settings: serde_json::Value,
        play_datetime: DateTime<Utc>,
    ) -> Result<SessionId> {
        self.execute(move |conn| {
            let settings_json =
                serde_json::to_string(&settings).context("failed to serialize settings")?;
            conn.execute(
                "INSERT INTO game_sessions (game_code, play_datetime, settings)
                 VALUES (?1, ?2, ?3)",
                params![game_code.as_str(), play_datetime.to_rfc3339(), settings_json],
            )
            .with_context(|| "failed to insert game session")?;
            Ok(SessionId::new(conn.last_insert_rowid()))
        })
        .await
    }

    pub async fn get_session(&self, session_id: SessionId) -> Result<Option<GameSession>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, game_code, play_datetime, settings
                 FROM game_sessions
                 WHERE id = ?1",
            )?;

            let session = stmt
                .query_row(params![session_id.get()], |row| Ok(row_to_session(row)))
                .optional()?
                .transpose()?;
            Ok(session)
        })
        .await
    }

    pub async fn list_sessions_by_game(
        &self,
        game_code: GameCode,
        limit: usize,
        offset: usize,
    ) -> Result<SessionPage> {
        let limit = to_i64(limit)?;
        let offset = to_i64(offset)?;
        self.execute(move |conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM game_sessions WHERE game_code = ?1",
                params![game_code.as_str()],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(
                "SELECT id, game_code, play_datetime, settings
                 FROM game_sessions
                 WHERE game_code = ?1
                 ORDER BY play_datetime DESC, id DESC
                 LIMIT ?2 OFFSET ?3",
            )?;

            let mut rows = stmt.query(params![game_code.as_str(), limit, offset])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(SessionPage {
                sessions,
                total_count: usize::try_from(total).unwrap_or_default(),
            })
        })
        .await
    }

    /// Delete a session together with its results (cascade).
    pub async fn delete_session(&self, session_id: SessionId) -> Result<()> {
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM game_sessions WHERE id = ?1",
                params![session_id.get()],
            )?;
            Ok(())
        })
        .await
    }
}
