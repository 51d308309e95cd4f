use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_game_code, parse_json},
    models::{ResultRecord, SessionId, StoredResult},
};

fn row_to_result(row: &Row) -> Result<StoredResult> {
    let game_code: String = row.get("game_code")?;
    let payload: String = row.get("payload")?;
    let created_at: String = row.get("created_at")?;

    Ok(StoredResult {
        id: row.get("id")?,
        session_id: SessionId::new(row.get("session_id")?),
        game_code: parse_game_code(&game_code)?,
        payload: parse_json(&payload, "payload")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_result(&self, record: ResultRecord) -> Result<i64> {
        self.execute(move |conn| {
            let payload =
                serde_json::to_string(&record.payload).context("failed to serialize result")?;
            conn.execute(
                "INSERT INTO game_results (session_id, game_code, payload, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.session_id.get(),
                    record.game_code.as_str(),
                    payload,
                    Utc::now().to_rfc3339(),
                ],
            )
            .with_context(|| format!("failed to insert result for session {}", record.session_id))?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Results of one session in insertion order.
    pub async fn get_results_for_session(&self, session_id: SessionId) -> Result<Vec<StoredResult>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, game_code, payload, created_at
                 FROM game_results
                 WHERE session_id = ?1
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query(params![session_id.get()])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_result(row)?);
            }
            Ok(results)
        })
        .await
    }
}
