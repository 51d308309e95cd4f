use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::problem::{generate_problems, Card, CardHolder, RpsChoice, RpsProblem, RpsSettings};
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
pub struct RpsGame {
    pub session_id: SessionId,
    pub settings: RpsSettings,
    pub problems: Vec<RpsProblem>,
}

impl TrialSet for RpsGame {
    fn trial_count(&self) -> usize {
        self.problems.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpsResult {
    pub session_id: SessionId,
    pub round: u8,
    /// 0-based position in the game.
    pub question_num: usize,
    pub problem_card_holder: CardHolder,
    pub given_card: Card,
    pub is_correct: bool,
    pub response_time_ms: u32,
    pub player_choice: RpsChoice,
    pub correct_choice: Card,
}

#[derive(Clone)]
pub struct RpsService<S: GameStore> {
    state: Arc<Mutex<SessionRegistry<RpsGame>>>,
    rng: Arc<Mutex<GameRng>>,
    store: S,
}

impl<S: GameStore> RpsService<S> {
    pub fn new(store: S, rng: GameRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionRegistry::new())),
            rng: Arc::new(Mutex::new(rng)),
            store,
        }
    }

    pub async fn start_game(&self, settings: RpsSettings) -> GameResult<RpsGame> {
        let problems = {
            let mut rng = self.rng.lock().await;
            generate_problems(&settings, &mut rng)
        };

        let session_id = open_session(&self.store, GameCode::Rps, settings_value(&settings)?).await?;
        let game = RpsGame {
            session_id,
            settings,
            problems,
        };

        if let Some(previous) = self.state.lock().await.activate(session_id, game.clone()) {
            log_warn!("rps session {previous} replaced by {session_id}");
        }
        log_info!(
            "Started rps game with session ID: {} ({} questions)",
            session_id,
            game.problems.len()
        );
        Ok(game)
    }

    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        player_choice: &str,
        response_time_ms: u32,
        question_num: usize,
    ) -> GameResult<RpsResult> {
        let result = {
            let state = self.state.lock().await;
            let game = state.check_trial(session_id, question_num)?;
            let choice: RpsChoice = player_choice.parse()?;
            let problem = game.problems[question_num];
            let correct_choice = problem.correct_card();

            RpsResult {
                session_id,
                round: problem.round,
                question_num,
                problem_card_holder: problem.problem_card_holder,
                given_card: problem.given_card,
                is_correct: choice.card() == Some(correct_choice),
                response_time_ms,
                player_choice: choice,
                correct_choice,
            }
        };

        let record = result_record(session_id, GameCode::Rps, &result)?;
        persist(&self.store, record).await?;
        mark_answered(&self.state, session_id, question_num).await;
        log_info!("Saved rps result for question: {}", question_num);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn settings(rounds: Vec<u8>, questions_per_round: usize) -> RpsSettings {
        RpsSettings {
            rounds,
            questions_per_round,
            time_limit_ms: 2000,
            is_real_mode: false,
        }
    }

    #[tokio::test]
    async fn start_builds_every_listed_round() {
        let store = MemoryStore::new();
        let service = RpsService::new(store.clone(), GameRng::new(5));
        let game = service.start_game(settings(vec![1, 3], 5)).await.unwrap();
        assert_eq!(game.problems.len(), 10);
        assert_eq!(store.sessions()[0].game_code, GameCode::Rps);
    }

    #[tokio::test]
    async fn correct_card_wins_and_miss_loses() {
        let service = RpsService::new(MemoryStore::new(), GameRng::new(5));
        let game = service.start_game(settings(vec![1, 2], 2)).await.unwrap();

        for (index, problem) in game.problems.iter().enumerate() {
            let expected = problem.correct_card();
            let result = service
                .submit_answer(game.session_id, expected.as_str(), 400, index)
                .await
                .unwrap();
            assert!(result.is_correct);
            assert_eq!(result.question_num, index);

            let missed = service
                .submit_answer(game.session_id, "MISS", 2000, index)
                .await
                .unwrap();
            assert!(!missed.is_correct);
            assert_eq!(missed.correct_choice, expected);
        }
        assert_eq!(service.phase(game.session_id).await, GamePhase::Complete);
    }

    #[tokio::test]
    async fn out_of_range_and_unknown_choices() {
        let service = RpsService::new(MemoryStore::new(), GameRng::new(5));
        let game = service.start_game(settings(vec![1], 2)).await.unwrap();

        assert!(matches!(
            service.submit_answer(game.session_id, "ROCK", 100, 2).await,
            Err(GameError::InvalidTrialIndex { index: 2, len: 2 })
        ));
        assert!(matches!(
            service.submit_answer(game.session_id, "rock", 100, 0).await,
            Err(GameError::InvalidChoice { .. })
        ));
    }
}
