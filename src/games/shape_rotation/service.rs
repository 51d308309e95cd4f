use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::geometry::Transform;
use super::problem::{generate_problems, verify_solution, ShapeRotationProblem, ShapeRound};
use crate::db::models::{GameCode, SessionId};
use crate::error::{GameError, GameResult};
use crate::games::{open_session, persist, result_record, settings_value};
use crate::rng::GameRng;
use crate::session::{GamePhase, SessionRegistry, TrialSet};
use crate::store::GameStore;
use crate::{log_error, log_info, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRotationSettings {
    pub num_problems: usize,
    /// Seconds per problem.
    pub time_limit: u32,
    pub round: ShapeRound,
    pub is_real_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRotationGame {
    pub session_id: SessionId,
    pub settings: ShapeRotationSettings,
    pub problems: Vec<ShapeRotationProblem>,
}

impl TrialSet for ShapeRotationGame {
    fn trial_count(&self) -> usize {
        self.problems.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRotationResult {
    pub session_id: SessionId,
    pub problem_id: u32,
    pub user_solution: Vec<Transform>,
    pub is_correct: bool,
    pub solve_time_ms: u32,
    pub click_count: u32,
}

/// Background save of one result. Await it to learn whether the write
/// succeeded; dropping it leaves the save running.
pub struct PendingSave {
    handle: JoinHandle<GameResult<()>>,
}

impl Future for PendingSave {
    type Output = GameResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| {
            joined.unwrap_or_else(|e| {
                Err(GameError::PersistenceFailure(anyhow!(
                    "shape rotation save task failed: {e}"
                )))
            })
        })
    }
}

pub struct SubmittedSolution {
    pub result: ShapeRotationResult,
    pub save: PendingSave,
}

#[derive(Clone)]
pub struct ShapeRotationService<S: GameStore> {
    state: Arc<Mutex<SessionRegistry<ShapeRotationGame>>>,
    rng: Arc<Mutex<GameRng>>,
    store: S,
}

impl<S: GameStore> ShapeRotationService<S> {
    pub fn new(store: S, rng: GameRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionRegistry::new())),
            rng: Arc::new(Mutex::new(rng)),
            store,
        }
    }

    pub async fn start_game(&self, settings: ShapeRotationSettings) -> GameResult<ShapeRotationGame> {
        let problems = {
            let mut rng = self.rng.lock().await;
            generate_problems(settings.round, settings.num_problems, &mut rng)?
        };

        let session_id =
            open_session(&self.store, GameCode::ShapeRotation, settings_value(&settings)?).await?;
        let game = ShapeRotationGame {
            session_id,
            settings,
            problems,
        };

        if let Some(previous) = self.state.lock().await.activate(session_id, game.clone()) {
            log_warn!("shape rotation session {previous} replaced by {session_id}");
        }
        log_info!(
            "Started shape rotation game with session ID: {} (round {}, {} problems)",
            session_id,
            u8::from(game.settings.round),
            game.problems.len()
        );
        Ok(game)
    }

    /// Verify a solution for the problem at `index` (0-based).
    ///
    /// The verdict is returned immediately; the save runs on its own task
    /// and is handed back as [`PendingSave`]. The problem counts as answered
    /// as soon as the verdict exists, so a save that later fails still leaves
    /// it marked.
    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        index: usize,
        user_solution: &[String],
        solve_time_ms: u32,
        click_count: u32,
    ) -> GameResult<SubmittedSolution> {
        let (result, record) = {
            let mut state = self.state.lock().await;
            let game = state.check_trial(session_id, index)?;
            let problem = &game.problems[index];

            let moves = user_solution
                .iter()
                .map(|name| name.parse::<Transform>())
                .collect::<GameResult<Vec<_>>>()?;
            let is_correct = verify_solution(problem, &moves)?;

            let result = ShapeRotationResult {
                session_id,
                problem_id: problem.id,
                user_solution: moves,
                is_correct,
                solve_time_ms,
                click_count,
            };
            let record = result_record(session_id, GameCode::ShapeRotation, &result)?;
            state.record_answer(session_id, index)?;
            (result, record)
        };

        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            let outcome = persist(&store, record).await;
            if let Err(e) = &outcome {
                log_error!("Failed to save shape rotation result: {}", e);
            }
            outcome
        });

        Ok(SubmittedSolution {
            result,
            save: PendingSave { handle },
        })
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

    fn settings(round: u8, num_problems: usize) -> ShapeRotationSettings {
        ShapeRotationSettings {
            num_problems,
            time_limit: 180,
            round: ShapeRound::from(round),
            is_real_mode: false,
        }
    }

    fn names(moves: &[Transform]) -> Vec<String> {
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[tokio::test]
    async fn canonical_solution_is_correct_and_saved() {
        let store = MemoryStore::new();
        let service = ShapeRotationService::new(store.clone(), GameRng::new(3));
        let game = service.start_game(settings(2, 3)).await.unwrap();
        let problem = &game.problems[1];

        let submitted = service
            .submit_answer(game.session_id, 1, &names(&problem.solution), 5400, 6)
            .await
            .unwrap();
        assert!(submitted.result.is_correct);
        assert_eq!(submitted.result.problem_id, problem.id);

        submitted.save.await.unwrap();
        let stored = store.results_for_session(game.session_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        let saved: ShapeRotationResult = stored[0].decode().unwrap();
        assert_eq!(saved, submitted.result);
    }

    #[tokio::test]
    async fn verdict_is_returned_even_when_save_fails() {
        let store = MemoryStore::new();
        let service = ShapeRotationService::new(store.clone(), GameRng::new(3));
        let game = service.start_game(settings(1, 1)).await.unwrap();
        store.set_fail_writes(true);

        let solution = names(&game.problems[0].solution);
        let submitted = service
            .submit_answer(game.session_id, 0, &solution, 1000, 2)
            .await
            .unwrap();
        assert!(submitted.result.is_correct);

        let err = submitted.save.await.unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(service.phase(game.session_id).await, GamePhase::Complete);
    }

    #[tokio::test]
    async fn unknown_transform_is_rejected() {
        let service = ShapeRotationService::new(MemoryStore::new(), GameRng::new(3));
        let game = service.start_game(settings(1, 1)).await.unwrap();

        let result = service
            .submit_answer(game.session_id, 0, &["spin_360".to_string()], 1000, 1)
            .await;
        assert!(matches!(result, Err(GameError::InvalidChoice { .. })));
        assert_eq!(service.phase(game.session_id).await, GamePhase::InProgress);
    }

    #[tokio::test]
    async fn round_other_than_two_generates_letters() {
        let service = ShapeRotationService::new(MemoryStore::new(), GameRng::new(3));
        let game = service.start_game(settings(9, 4)).await.unwrap();
        assert!(game.problems.iter().all(|p| p.round == ShapeRound::Letters));
        let ids: Vec<u32> = game.problems.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn index_past_last_problem_is_rejected() {
        let service = ShapeRotationService::new(MemoryStore::new(), GameRng::new(3));
        let game = service.start_game(settings(1, 2)).await.unwrap();
        let result = service.submit_answer(game.session_id, 2, &[], 10, 0).await;
        assert!(matches!(result, Err(GameError::InvalidTrialIndex { index: 2, len: 2 })));
    }

    #[tokio::test]
    async fn empty_solution_is_wrong() {
        let service = ShapeRotationService::new(MemoryStore::new(), GameRng::new(12));
        let game = service.start_game(settings(1, 1)).await.unwrap();
        let submitted = service.submit_answer(game.session_id, 0, &[], 10, 0).await.unwrap();
        assert!(!submitted.result.is_correct);
        submitted.save.await.unwrap();
    }
}
