use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::problem::{
    generate_problems, score_answer, CatAnswer, CatChaserProblem, CatChaserSettings, CaughtStatus,
    TargetColor,
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
pub struct CatChaserGame {
    pub session_id: SessionId,
    pub settings: CatChaserSettings,
    pub problems: Vec<CatChaserProblem>,
}

impl TrialSet for CatChaserGame {
    fn trial_count(&self) -> usize {
        self.problems.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatChaserResult {
    pub session_id: SessionId,
    pub round: usize,
    pub target_color: TargetColor,
    pub player_choice: CatAnswer,
    pub confidence: u8,
    pub correct_choice: CaughtStatus,
    pub is_correct: bool,
    pub score: f64,
    pub response_time_ms: u32,
}

#[derive(Clone)]
pub struct CatChaserService<S: GameStore> {
    state: Arc<Mutex<SessionRegistry<CatChaserGame>>>,
    rng: Arc<Mutex<GameRng>>,
    store: S,
}

impl<S: GameStore> CatChaserService<S> {
    pub fn new(store: S, rng: GameRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionRegistry::new())),
            rng: Arc::new(Mutex::new(rng)),
            store,
        }
    }

    pub async fn start_game(&self, settings: CatChaserSettings) -> GameResult<CatChaserGame> {
        let problems = {
            let mut rng = self.rng.lock().await;
            generate_problems(&settings, &mut rng)
        };

        let session_id =
            open_session(&self.store, GameCode::CatChaser, settings_value(&settings)?).await?;
        let game = CatChaserGame {
            session_id,
            settings,
            problems,
        };

        if let Some(previous) = self.state.lock().await.activate(session_id, game.clone()) {
            log_warn!("cat chaser session {previous} replaced by {session_id}");
        }
        log_info!(
            "Started cat chaser game with session ID: {} (difficulty {})",
            session_id,
            game.settings.difficulty
        );
        Ok(game)
    }

    /// Grade the answer about one highlighted cat in `round` (1-based).
    /// `confidence` is ignored for `TIMEOUT`.
    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        round: usize,
        target_color: &str,
        player_choice: &str,
        confidence: u8,
        response_time_ms: u32,
    ) -> GameResult<CatChaserResult> {
        let (index, result) = {
            let state = self.state.lock().await;
            let len = state.get(session_id)?.problems.len();
            let index = round
                .checked_sub(1)
                .filter(|index| *index < len)
                .ok_or(GameError::InvalidTrialIndex { index: round, len })?;
            let game = state.check_trial(session_id, index)?;

            let color: TargetColor = target_color.parse()?;
            let answer: CatAnswer = player_choice.parse()?;
            let status = game.problems[index].status(color);
            let (is_correct, score) = score_answer(status, answer, confidence)?;

            let result = CatChaserResult {
                session_id,
                round,
                target_color: color,
                player_choice: answer,
                confidence,
                correct_choice: status,
                is_correct,
                score,
                response_time_ms,
            };
            (index, result)
        };

        let record = result_record(session_id, GameCode::CatChaser, &result)?;
        persist(&self.store, record).await?;
        mark_answered(&self.state, session_id, index).await;
        log_info!(
            "Saved cat chaser result for round {} (score {:.1})",
            result.round,
            result.score
        );
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

    fn settings(num_trials: usize, difficulty: &str) -> CatChaserSettings {
        CatChaserSettings {
            num_trials,
            difficulty: difficulty.to_string(),
            show_time: 1.5,
            response_time_limit: 5.0,
            is_real_mode: false,
        }
    }

    #[tokio::test]
    async fn truthful_answer_scores_by_confidence() {
        let store = MemoryStore::new();
        let service = CatChaserService::new(store.clone(), GameRng::new(8));
        let game = service.start_game(settings(3, "8")).await.unwrap();
        let truth = game.problems[0].status(TargetColor::Red);

        let result = service
            .submit_answer(game.session_id, 1, "RED", truth.as_str(), 3, 900)
            .await
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.correct_choice, truth);
        assert_eq!(store.results_for_session(game.session_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timeout_ignores_confidence() {
        let service = CatChaserService::new(MemoryStore::new(), GameRng::new(8));
        let game = service.start_game(settings(2, "auto")).await.unwrap();
        let result = service
            .submit_answer(game.session_id, 2, "BLUE", "TIMEOUT", 0, 5000)
            .await
            .unwrap();
        assert!(!result.is_correct);
        assert_eq!(result.score, -1.0);
    }

    #[tokio::test]
    async fn rounds_are_one_based() {
        let service = CatChaserService::new(MemoryStore::new(), GameRng::new(8));
        let game = service.start_game(settings(2, "auto")).await.unwrap();
        for bad in [0, 3] {
            let err = service
                .submit_answer(game.session_id, bad, "RED", "CAUGHT", 2, 100)
                .await
                .unwrap_err();
            assert!(matches!(err, GameError::InvalidTrialIndex { index, len: 2 } if index == bad));
        }
    }

    #[tokio::test]
    async fn bad_inputs_are_invalid_choices() {
        let service = CatChaserService::new(MemoryStore::new(), GameRng::new(8));
        let game = service.start_game(settings(1, "auto")).await.unwrap();
        let id = game.session_id;

        for (color, choice, confidence) in [("GREEN", "CAUGHT", 2), ("RED", "MAYBE", 2), ("RED", "CAUGHT", 0)] {
            let err = service
                .submit_answer(id, 1, color, choice, confidence, 100)
                .await
                .unwrap_err();
            assert!(matches!(err, GameError::InvalidChoice { .. }), "{color}/{choice}/{confidence}");
        }
        assert_eq!(service.phase(id).await, GamePhase::InProgress);
    }
}
