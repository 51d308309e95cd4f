use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::problem::{
    check_digit, generate_round1, generate_round2, NumberPressingSettings, ProblemR1, ProblemR2,
};
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
pub struct NumberPressingGame {
    pub session_id: SessionId,
    pub settings: NumberPressingSettings,
    #[serde(rename = "problemsR1")]
    pub problems_r1: Vec<ProblemR1>,
    #[serde(rename = "problemsR2")]
    pub problems_r2: Vec<ProblemR2>,
}

/// Round-two answers are tracked after every round-one problem.
impl TrialSet for NumberPressingGame {
    fn trial_count(&self) -> usize {
        self.problems_r1.len() + self.problems_r2.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPressingResultR1 {
    pub session_id: SessionId,
    pub problem: ProblemR1,
    pub pressed: u8,
    /// Seconds.
    pub time_taken: f64,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPressingResultR2 {
    pub session_id: SessionId,
    pub problem: ProblemR2,
    pub player_clicks: Vec<u8>,
    pub correct_clicks: Vec<u8>,
    /// Seconds.
    pub time_taken: f64,
    pub is_correct: bool,
}

fn round_index(index: usize, len: usize) -> GameResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(GameError::InvalidTrialIndex { index, len })
    }
}

#[derive(Clone)]
pub struct NumberPressingService<S: GameStore> {
    state: Arc<Mutex<SessionRegistry<NumberPressingGame>>>,
    rng: Arc<Mutex<GameRng>>,
    store: S,
}

impl<S: GameStore> NumberPressingService<S> {
    pub fn new(store: S, rng: GameRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionRegistry::new())),
            rng: Arc::new(Mutex::new(rng)),
            store,
        }
    }

    /// Generate problems for every round listed in `settings.rounds`.
    pub async fn start_game(&self, settings: NumberPressingSettings) -> GameResult<NumberPressingGame> {
        let (problems_r1, problems_r2) = {
            let mut rng = self.rng.lock().await;
            let count = settings.problems_per_round;
            let r1 = if settings.rounds.contains(&1) {
                generate_round1(count, &mut rng)
            } else {
                Vec::new()
            };
            let r2 = if settings.rounds.contains(&2) {
                generate_round2(count, &mut rng)
            } else {
                Vec::new()
            };
            (r1, r2)
        };

        let session_id =
            open_session(&self.store, GameCode::NumberPressing, settings_value(&settings)?).await?;
        let game = NumberPressingGame {
            session_id,
            settings,
            problems_r1,
            problems_r2,
        };

        if let Some(previous) = self.state.lock().await.activate(session_id, game.clone()) {
            log_warn!("number pressing session {previous} replaced by {session_id}");
        }
        log_info!(
            "Started number pressing game with session ID: {} (R1: {}, R2: {})",
            session_id,
            game.problems_r1.len(),
            game.problems_r2.len()
        );
        Ok(game)
    }

    pub async fn submit_round1(
        &self,
        session_id: SessionId,
        index: usize,
        pressed: u8,
        time_taken: f64,
    ) -> GameResult<NumberPressingResultR1> {
        let result = {
            let state = self.state.lock().await;
            let game = state.get(session_id)?;
            let index = round_index(index, game.problems_r1.len())?;
            let pressed = check_digit(pressed)?;

            let problem = game.problems_r1[index];
            NumberPressingResultR1 {
                session_id,
                problem,
                pressed,
                time_taken,
                is_correct: pressed == problem.target_number,
            }
        };

        let record = result_record(session_id, GameCode::NumberPressing, &result)?;
        persist(&self.store, record).await?;
        mark_answered(&self.state, session_id, index).await;
        log_info!("Saved number pressing R1 result (correct: {})", result.is_correct);
        Ok(result)
    }

    pub async fn submit_round2(
        &self,
        session_id: SessionId,
        index: usize,
        player_clicks: Vec<u8>,
        time_taken: f64,
    ) -> GameResult<NumberPressingResultR2> {
        let (slot, result) = {
            let state = self.state.lock().await;
            let game = state.get(session_id)?;
            let index = round_index(index, game.problems_r2.len())?;
            for click in &player_clicks {
                check_digit(*click)?;
            }

            // Round two answers sit after every round one trial.
            let slot = game.problems_r1.len() + index;
            let problem = game.problems_r2[index].clone();
            let correct_clicks = problem.correct_clicks();
            let result = NumberPressingResultR2 {
                session_id,
                is_correct: player_clicks == correct_clicks,
                problem,
                player_clicks,
                correct_clicks,
                time_taken,
            };
            (slot, result)
        };

        let record = result_record(session_id, GameCode::NumberPressing, &result)?;
        persist(&self.store, record).await?;
        mark_answered(&self.state, session_id, slot).await;
        log_info!("Saved number pressing R2 result (correct: {})", result.is_correct);
        Ok(result)
    }

    pub async fn phase(&self, session_id: SessionId) -> GamePhase {
        self.state.lock().await.phase(session_id)
    }

    pub async fn end_game(&self, session_id: SessionId) -> GameResult<()> {
        if self.state.lock().await.finish(session_id) {
            Ok(())
        } else {
            Err(GameError::GameNotStarted)
        }
    }
}
