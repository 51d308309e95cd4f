pub mod cat_chaser;
pub mod count_comparison;
pub mod nback;
pub mod number_pressing;
pub mod rps;
pub mod shape_rotation;

use anyhow::Context;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::models::{GameCode, ResultRecord, SessionId};
use crate::error::{GameError, GameResult};
use crate::log_warn;
use crate::session::{SessionRegistry, TrialSet};
use crate::store::GameStore;

const ENABLE_LOGS: bool = true;

/// Register a session for `settings` with the store.
pub(crate) async fn open_session<S: GameStore>(
    store: &S,
    game_code: GameCode,
    settings: serde_json::Value,
) -> GameResult<SessionId> {
    store
        .create_session(game_code, settings)
        .await
        .with_context(|| format!("failed to create {game_code} session"))
        .map_err(GameError::PersistenceFailure)
}

pub(crate) fn settings_value<T: Serialize>(settings: &T) -> GameResult<serde_json::Value> {
    serde_json::to_value(settings)
        .context("failed to serialize settings")
        .map_err(GameError::PersistenceFailure)
}

pub(crate) fn result_record<T: Serialize>(
    session_id: SessionId,
    game_code: GameCode,
    result: &T,
) -> GameResult<ResultRecord> {
    ResultRecord::from_result(session_id, game_code, result).map_err(GameError::PersistenceFailure)
}

pub(crate) async fn persist<S: GameStore>(store: &S, record: ResultRecord) -> GameResult<()> {
    let game_code = record.game_code;
    store
        .save_result(record)
        .await
        .with_context(|| format!("failed to save {game_code} result"))
        .map_err(GameError::PersistenceFailure)
}

/// Mark `index` answered once its result is stored. A session retired while
/// the save was in flight keeps no record of it.
pub(crate) async fn mark_answered<G: TrialSet>(
    state: &Mutex<SessionRegistry<G>>,
    session_id: SessionId,
    index: usize,
) {
    if let Err(e) = state.lock().await.record_answer(session_id, index) {
        log_warn!("Stored answer {index} for session {session_id} but could not track it: {e}");
    }
}
