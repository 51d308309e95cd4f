use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::cloud::{
    count_words, generate_problems, load_word_pairs, AppliedTrap, CountComparisonProblem,
    CountComparisonSettings, Side,
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
pub struct CountComparisonGame {
    pub session_id: SessionId,
    pub settings: CountComparisonSettings,
    pub problems: Vec<CountComparisonProblem>,
    /// Problems already handed out by `next_problem`.
    #[serde(default)]
    pub served: usize,
}

impl TrialSet for CountComparisonGame {
    fn trial_count(&self) -> usize {
        self.problems.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountComparisonSubmission {
    /// 1-based.
    pub problem_number: usize,
    pub player_choice: String,
    pub response_time_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountComparisonResult {
    pub session_id: SessionId,
    pub problem_number: usize,
    pub is_correct: bool,
    pub response_time_ms: u32,
    pub player_choice: Side,
    pub correct_choice: Side,
    pub left_word: String,
    pub right_word: String,
    pub left_word_count: usize,
    pub right_word_count: usize,
    pub applied_traps: Vec<AppliedTrap>,
}

impl CountComparisonResult {
    fn grade(
        session_id: SessionId,
        problem: &CountComparisonProblem,
        player_choice: Side,
        response_time_ms: u32,
    ) -> Self {
        Self {
            session_id,
            problem_number: problem.problem_number,
            is_correct: player_choice == problem.correct_side,
            response_time_ms,
            player_choice,
            correct_choice: problem.correct_side,
            left_word: problem.left_word_text.clone(),
            right_word: problem.right_word_text.clone(),
            left_word_count: count_words(&problem.left_words),
            right_word_count: count_words(&problem.right_words),
            applied_traps: problem.applied_traps.clone(),
        }
    }
}

#[derive(Clone)]
pub struct CountComparisonService<S: GameStore> {
    state: Arc<Mutex<SessionRegistry<CountComparisonGame>>>,
    rng: Arc<Mutex<GameRng>>,
    store: S,
}

impl<S: GameStore> CountComparisonService<S> {
    pub fn new(store: S, rng: GameRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionRegistry::new())),
            rng: Arc::new(Mutex::new(rng)),
            store,
        }
    }

    pub async fn start_game(&self, settings: CountComparisonSettings) -> GameResult<SessionId> {
        let mut pairs = load_word_pairs()?;
        let problems = {
            let mut rng = self.rng.lock().await;
            generate_problems(&settings, &mut pairs, &mut rng)
        };

        let session_id =
            open_session(&self.store, GameCode::CountComparison, settings_value(&settings)?).await?;
        let game = CountComparisonGame {
            session_id,
            settings,
            problems,
            served: 0,
        };

        if let Some(previous) = self.state.lock().await.activate(session_id, game) {
            log_warn!("count comparison session {previous} replaced by {session_id}");
        }
        log_info!("Started count comparison game with session ID: {}", session_id);
        Ok(session_id)
    }

    /// Hand out problems in order. Once they run out the game ends and
    /// `None` is returned.
    pub async fn next_problem(&self, session_id: SessionId) -> GameResult<Option<CountComparisonProblem>> {
        let mut state = self.state.lock().await;
        let game = state.get_mut(session_id)?;

        match game.problems.get(game.served).cloned() {
            Some(problem) => {
                game.served += 1;
                Ok(Some(problem))
            }
            None => {
                state.finish(session_id);
                log_info!("Count comparison session {} has no problems left", session_id);
                Ok(None)
            }
        }
    }

    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        submission: CountComparisonSubmission,
    ) -> GameResult<CountComparisonResult> {
        let (index, result) = {
            let state = self.state.lock().await;
            let len = state.get(session_id)?.problems.len();
            let index = submission
                .problem_number
                .checked_sub(1)
                .ok_or(GameError::InvalidTrialIndex {
                    index: submission.problem_number,
                    len,
                })?;
            let game = state.check_trial(session_id, index).map_err(|e| match e {
                GameError::InvalidTrialIndex { .. } => GameError::InvalidTrialIndex {
                    index: submission.problem_number,
                    len,
                },
                other => other,
            })?;

            let choice: Side = submission.player_choice.parse()?;
            let result = CountComparisonResult::grade(
                session_id,
                &game.problems[index],
                choice,
                submission.response_time_ms,
            );
            (index, result)
        };

        let record = result_record(session_id, GameCode::CountComparison, &result)?;
        persist(&self.store, record).await?;
        mark_answered(&self.state, session_id, index).await;
        log_info!("Saved count comparison result for problem: {}", result.problem_number);
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
