use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::sequence::{correct_choice, generate_sequence, resolve_group, NBackChoice, NBackLevel};
use crate::db::models::{GameCode, SessionId};
use crate::error::{GameError, GameResult};
use crate::games::{mark_answered, open_session, persist, result_record, settings_value};
use crate::rng::GameRng;
use crate::session::{GamePhase, SessionRegistry, TrialSet};
use crate::store::GameStore;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NBackSettings {
    pub num_trials: usize,
    /// Milliseconds each shape stays on screen.
    pub presentation_time: u32,
    pub n_back_level: NBackLevel,
    pub shape_group: String,
    pub is_real_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NBackGame {
    /// Settings with `shape_group` resolved to the group actually used.
    pub settings: NBackSettings,
    pub shape_sequence: Vec<String>,
    pub session_id: SessionId,
}

impl TrialSet for NBackGame {
    fn trial_count(&self) -> usize {
        self.shape_sequence.len()
    }
}

impl NBackGame {
    pub fn correct_choice(&self, trial: usize) -> NBackChoice {
        correct_choice(&self.shape_sequence, self.settings.n_back_level, trial)
    }

    fn check_answer(&self, player_choice: NBackChoice, response_time_ms: u32, trial: usize) -> NBackResult {
        let correct = self.correct_choice(trial);
        NBackResult {
            session_id: self.session_id,
            round: self.settings.n_back_level.into(),
            question_num: trial + 1,
            is_correct: player_choice == correct,
            response_time_ms,
            player_choice,
            correct_choice: correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NBackResult {
    pub session_id: SessionId,
    pub round: u8,
    /// 1-based.
    pub question_num: usize,
    pub is_correct: bool,
    pub response_time_ms: u32,
    pub player_choice: NBackChoice,
    pub correct_choice: NBackChoice,
}

#[derive(Clone)]
pub struct NBackService<S: GameStore> {
    state: Arc<Mutex<SessionRegistry<NBackGame>>>,
    rng: Arc<Mutex<GameRng>>,
    store: S,
}

impl<S: GameStore> NBackService<S> {
    pub fn new(store: S, rng: GameRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionRegistry::new())),
            rng: Arc::new(Mutex::new(rng)),
            store,
        }
    }

    pub async fn start_game(&self, settings: NBackSettings) -> GameResult<NBackGame> {
        let (settings, sequence) = {
            let mut rng = self.rng.lock().await;
            let (group_key, shapes) = resolve_group(&settings.shape_group, &mut rng);
            let sequence = generate_sequence(settings.num_trials, shapes, &mut rng);
            let resolved = NBackSettings {
                shape_group: group_key.to_string(),
                ..settings
            };
            (resolved, sequence)
        };
        self.begin(settings, sequence).await
    }

    /// Start a game over a known sequence, e.g. to replay a stored session.
    pub async fn start_game_with_sequence(
        &self,
        settings: NBackSettings,
        sequence: Vec<String>,
    ) -> GameResult<NBackGame> {
        let settings = NBackSettings {
            num_trials: sequence.len(),
            ..settings
        };
        self.begin(settings, sequence).await
    }

    async fn begin(&self, settings: NBackSettings, sequence: Vec<String>) -> GameResult<NBackGame> {
        let session_id =
            open_session(&self.store, GameCode::Nback, settings_value(&settings)?).await?;

        let game = NBackGame {
            settings,
            shape_sequence: sequence,
            session_id,
        };

        let retired = self.state.lock().await.activate(session_id, game.clone());
        if let Some(previous) = retired {
            log_warn!("n-back session {previous} replaced by {session_id} before completion");
        }
        log_info!(
            "Started n-back game with session ID: {} ({} trials, group {})",
            session_id,
            game.shape_sequence.len(),
            game.settings.shape_group
        );
        Ok(game)
    }

    /// Grade the answer for `trial` (0-based) and persist it.
    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        player_choice: &str,
        response_time_ms: u32,
        trial: usize,
    ) -> GameResult<NBackResult> {
        let result = {
            let state = self.state.lock().await;
            let game = state.check_trial(session_id, trial)?;
            let choice: NBackChoice = player_choice.parse()?;
            game.check_answer(choice, response_time_ms, trial)
        };

        let record = result_record(session_id, GameCode::Nback, &result)?;
        persist(&self.store, record).await?;
        mark_answered(&self.state, session_id, trial).await;
        log_info!("Saved n-back result for trial: {}", result.question_num);
        Ok(result)
    }

    pub async fn phase(&self, session_id: SessionId) -> GamePhase {
        self.state.lock().await.phase(session_id)
    }

    pub async fn current_game(&self) -> Option<NBackGame> {
        let state = self.state.lock().await;
        let session_id = state.current()?;
        state.get(session_id).ok().cloned()
    }

    pub async fn end_game(&self, session_id: SessionId) -> GameResult<()> {
        if self.state.lock().await.finish(session_id) {
            Ok(())
        } else {
            Err(GameError::GameNotStarted)
        }
    }
}
