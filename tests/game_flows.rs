use acca_games::games::cat_chaser::{CatChaserSettings, TargetColor};
use acca_games::games::count_comparison::{CountComparisonSettings, CountComparisonSubmission};
use acca_games::games::number_pressing::NumberPressingSettings;
use acca_games::games::shape_rotation::{ShapeRotationResult, ShapeRotationSettings, ShapeRound};
use acca_games::stats::count_comparison_stats;
use acca_games::{GameError, GamePhase, GameRng, GameStore, Games, MemoryStore};

fn games(seed: u64) -> (Games<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    (Games::new(store.clone(), GameRng::new(seed)), store)
}

#[tokio::test]
async fn count_comparison_plays_to_exhaustion() {
    let (games, store) = games(21);
    let service = &games.count_comparison;
    let session = service
        .start_game(CountComparisonSettings {
            num_problems: 4,
            presentation_time: 1000,
            input_time: 3000,
            is_real_mode: true,
        })
        .await
        .unwrap();

    let mut answered = 0;
    while let Some(problem) = service.next_problem(session).await.unwrap() {
        let result = service
            .submit_answer(
                session,
                CountComparisonSubmission {
                    problem_number: problem.problem_number,
                    player_choice: problem.correct_side.as_str().to_string(),
                    response_time_ms: 700,
                },
            )
            .await
            .unwrap();
        assert!(result.is_correct);
        assert_ne!(result.left_word_count, result.right_word_count);
        answered += 1;
    }

    assert_eq!(answered, 4);
    assert_eq!(service.phase(session).await, GamePhase::NotStarted);
    let stored = store.results_for_session(session).await.unwrap();
    assert_eq!(stored.len(), 4);

    let stats = count_comparison_stats(session, &stored).unwrap();
    assert_eq!(stats.total_questions, 4);
    assert_eq!(stats.overall_accuracy, 100.0);
    let per_trap: usize = stats.trap_stats.iter().map(|t| t.total_questions).sum();
    assert!(per_trap >= 4);
}

#[tokio::test]
async fn number_pressing_round_two_example() {
    let (games, _) = games(4);
    let game = games
        .number_pressing
        .start_game(NumberPressingSettings {
            is_real_mode: false,
            rounds: vec![2],
            problems_per_round: 1,
            time_limit_r1: 5,
            time_limit_r2: 10,
        })
        .await
        .unwrap();
    assert!(game.problems_r1.is_empty());

    let expected = game.problems_r2[0].correct_clicks();
    let result = games
        .number_pressing
        .submit_round2(game.session_id, 0, expected.clone(), 3.5)
        .await
        .unwrap();
    assert!(result.is_correct);
    assert_eq!(result.correct_clicks, expected);

    assert!(matches!(
        games.number_pressing.submit_round1(game.session_id, 0, 5, 1.0).await,
        Err(GameError::InvalidTrialIndex { index: 0, len: 0 })
    ));
}

#[tokio::test]
async fn cat_chaser_wrong_answer_costs_its_confidence() {
    let (games, _) = games(13);
    let game = games
        .cat_chaser
        .start_game(CatChaserSettings {
            num_trials: 6,
            difficulty: "auto".to_string(),
            show_time: 1.0,
            response_time_limit: 4.0,
            is_real_mode: true,
        })
        .await
        .unwrap();

    let truth = game.problems[5].status(TargetColor::Blue);
    let wrong = match truth.as_str() {
        "CAUGHT" => "MISSED",
        _ => "CAUGHT",
    };
    let result = games
        .cat_chaser
        .submit_answer(game.session_id, 6, "BLUE", wrong, 4, 1200)
        .await
        .unwrap();
    assert!(!result.is_correct);
    assert_eq!(result.score, -2.0);
}

#[tokio::test]
async fn failing_store_surfaces_persistence_failure() {
    let (games, store) = games(8);
    let game = games
        .cat_chaser
        .start_game(CatChaserSettings {
            num_trials: 1,
            difficulty: "4".to_string(),
            show_time: 1.0,
            response_time_limit: 4.0,
            is_real_mode: false,
        })
        .await
        .unwrap();

    store.set_fail_writes(true);
    let err = games
        .cat_chaser
        .submit_answer(game.session_id, 1, "RED", "TIMEOUT", 1, 4000)
        .await
        .unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(games.cat_chaser.phase(game.session_id).await, GamePhase::InProgress);
}

#[tokio::test]
async fn shape_rotation_save_can_be_awaited() {
    let (games, store) = games(30);
    let game = games
        .shape_rotation
        .start_game(ShapeRotationSettings {
            num_problems: 2,
            time_limit: 60,
            round: ShapeRound::Grid,
            is_real_mode: true,
        })
        .await
        .unwrap();

    let problem = &game.problems[1];
    let moves: Vec<String> = problem.solution.iter().map(|t| t.to_string()).collect();
    let submitted = games
        .shape_rotation
        .submit_answer(game.session_id, 1, &moves, 8000, moves.len() as u32)
        .await
        .unwrap();
    assert!(submitted.result.is_correct);
    submitted.save.await.unwrap();

    let stored = store.results_for_session(game.session_id).await.unwrap();
    let decoded: ShapeRotationResult = stored[0].decode().unwrap();
    assert_eq!(decoded, submitted.result);
    assert_eq!(decoded.problem_id, problem.id);
}
