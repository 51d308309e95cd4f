//! Persistence seam used by every game service.
//!
//! The services only ever create sessions, append results and (in tests or
//! review screens) read results back. [`Database`](crate::db::Database) is
//! the durable implementation; [`MemoryStore`] keeps everything in process.

use std::future::Future;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use anyhow::{anyhow, bail, Result};
use chrono::Utc;

use crate::db::models::{GameCode, GameSession, ResultRecord, SessionId, StoredResult};

pub trait GameStore: Clone + Send + Sync + 'static {
    /// Register a new session and hand back its identifier.
    fn create_session(
        &self,
        game_code: GameCode,
        settings: serde_json::Value,
    ) -> impl Future<Output = Result<SessionId>> + Send;

    /// Durably append one result row.
    fn save_result(&self, record: ResultRecord) -> impl Future<Output = Result<()>> + Send;

    fn results_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Vec<StoredResult>>> + Send;
}

#[derive(Default)]
struct MemoryInner {
    sessions: Vec<GameSession>,
    results: Vec<StoredResult>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, to exercise error propagation.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn sessions(&self) -> Vec<GameSession> {
        self.lock().map(|inner| inner.sessions.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("memory store configured to reject writes");
        }
        Ok(())
    }
}

impl GameStore for MemoryStore {
    fn create_session(
        &self,
        game_code: GameCode,
        settings: serde_json::Value,
    ) -> impl Future<Output = Result<SessionId>> + Send {
        let outcome = self.check_writable().and_then(|()| {
            let mut inner = self.lock()?;
            let id = SessionId::new(inner.sessions.len() as i64 + 1);
            inner.sessions.push(GameSession {
                id,
                game_code,
                play_datetime: Utc::now(),
                settings,
            });
            Ok(id)
        });
        async move { outcome }
    }

    fn save_result(&self, record: ResultRecord) -> impl Future<Output = Result<()>> + Send {
        let outcome = self.check_writable().and_then(|()| {
            let mut inner = self.lock()?;
            if !inner.sessions.iter().any(|s| s.id == record.session_id) {
                bail!("session {} does not exist", record.session_id);
            }
            let id = inner.results.len() as i64 + 1;
            inner.results.push(StoredResult {
                id,
                session_id: record.session_id,
                game_code: record.game_code,
                payload: record.payload,
                created_at: Utc::now(),
            });
            Ok(())
        });
        async move { outcome }
    }

    fn results_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Vec<StoredResult>>> + Send {
        let outcome = self.lock().map(|inner| {
            inner
                .results
                .iter()
                .filter(|r| r.session_id == session_id)
                .cloned()
                .collect()
        });
        async move { outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn ids_are_monotonic() {
        let store = MemoryStore::new();
        let a = store.create_session(GameCode::Rps, json!({})).await.unwrap();
        let b = store.create_session(GameCode::Rps, json!({})).await.unwrap();
        assert!(b > a);
        assert_eq!(store.sessions().len(), 2);
    }

    #[tokio::test]
    async fn failing_writes_are_reported() {
        let store = MemoryStore::new();
        let session = store.create_session(GameCode::Nback, json!({})).await.unwrap();
        store.set_fail_writes(true);

        let record = ResultRecord {
            session_id: session,
            game_code: GameCode::Nback,
            payload: json!({}),
        };
        assert!(store.save_result(record).await.is_err());
        assert!(store.results_for_session(session).await.unwrap().is_empty());
    }
}
