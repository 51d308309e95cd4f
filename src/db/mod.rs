mod connection;
pub mod helpers;
mod migrations;
pub mod models;
mod repositories;

use std::future::Future;

use anyhow::Result;
use chrono::Utc;

pub use connection::Database;
pub use models::{GameCode, GameSession, ResultRecord, SessionId, StoredResult};
pub use repositories::sessions::SessionPage;

use crate::store::GameStore;

impl GameStore for Database {
    fn create_session(
        &self,
        game_code: GameCode,
        settings: serde_json::Value,
    ) -> impl Future<Output = Result<SessionId>> + Send {
        let db = self.clone();
        async move { db.insert_session(game_code, settings, Utc::now()).await }
    }

    fn save_result(&self, record: ResultRecord) -> impl Future<Output = Result<()>> + Send {
        let db = self.clone();
        async move { db.insert_result(record).await.map(|_| ()) }
    }

    fn results_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Vec<StoredResult>>> + Send {
        let db = self.clone();
        async move { db.get_results_for_session(session_id).await }
    }
}
