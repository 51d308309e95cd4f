//! Per-session summaries computed from stored results.
//!
//! Every function takes whatever a store returned (typically
//! [`GameStore::results_for_session`](crate::store::GameStore::results_for_session)),
//! keeps the rows that belong to the session and game, decodes them, and
//! aggregates. Accuracy is a percentage. An empty session yields zeroed
//! stats.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::models::{GameCode, SessionId, StoredResult};
use crate::games::cat_chaser::CatChaserResult;
use crate::games::count_comparison::CountComparisonResult;
use crate::games::number_pressing::{NumberPressingResultR1, NumberPressingResultR2};
use crate::games::shape_rotation::ShapeRotationResult;

/// Bucket for count-comparison questions shown without any trap.
pub const NO_TRAP: &str = "NoTrap";

fn decode_session<T: DeserializeOwned>(
    session_id: SessionId,
    game_code: GameCode,
    results: &[StoredResult],
) -> Result<Vec<T>> {
    results
        .iter()
        .filter(|r| r.session_id == session_id && r.game_code == game_code)
        .map(StoredResult::decode)
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    questions: usize,
    correct: usize,
    time_total: f64,
}

impl Tally {
    fn add(&mut self, is_correct: bool, time: f64) {
        self.questions += 1;
        if is_correct {
            self.correct += 1;
        }
        self.time_total += time;
    }

    fn accuracy(&self) -> f64 {
        if self.questions == 0 {
            0.0
        } else {
            self.correct as f64 / self.questions as f64 * 100.0
        }
    }

    fn average_time(&self) -> f64 {
        if self.questions == 0 {
            0.0
        } else {
            self.time_total / self.questions as f64
        }
    }
}

// Cat Chaser

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatChaserRoundStats {
    pub round: usize,
    pub total_questions: usize,
    pub total_correct: usize,
    pub total_score: f64,
    pub accuracy: f64,
    pub average_response_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatChaserSessionStats {
    pub session_id: SessionId,
    pub total_questions: usize,
    pub total_correct: usize,
    pub total_score: f64,
    pub overall_accuracy: f64,
    pub average_response_time_ms: f64,
    /// Ordered by round.
    pub round_stats: Vec<CatChaserRoundStats>,
}

pub fn cat_chaser_stats(
    session_id: SessionId,
    results: &[StoredResult],
) -> Result<CatChaserSessionStats> {
    let decoded: Vec<CatChaserResult> = decode_session(session_id, GameCode::CatChaser, results)?;

    let mut overall = Tally::default();
    let mut total_score = 0.0;
    let mut rounds: BTreeMap<usize, (Tally, f64)> = BTreeMap::new();
    for r in &decoded {
        let time = f64::from(r.response_time_ms);
        overall.add(r.is_correct, time);
        total_score += r.score;

        let (tally, score) = rounds.entry(r.round).or_default();
        tally.add(r.is_correct, time);
        *score += r.score;
    }

    Ok(CatChaserSessionStats {
        session_id,
        total_questions: overall.questions,
        total_correct: overall.correct,
        total_score,
        overall_accuracy: overall.accuracy(),
        average_response_time_ms: overall.average_time(),
        round_stats: rounds
            .into_iter()
            .map(|(round, (tally, score))| CatChaserRoundStats {
                round,
                total_questions: tally.questions,
                total_correct: tally.correct,
                total_score: score,
                accuracy: tally.accuracy(),
                average_response_time_ms: tally.average_time(),
            })
            .collect(),
    })
}

// Count Comparison

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapStat {
    /// `<kind>_<side>`, e.g. `FontSize_left`, or [`NO_TRAP`].
    pub trap_type: String,
    pub total_questions: usize,
    pub total_correct: usize,
    pub accuracy: f64,
    pub average_response_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountComparisonSessionStats {
    pub session_id: SessionId,
    pub total_questions: usize,
    pub total_correct: usize,
    pub overall_accuracy: f64,
    pub average_response_time_ms: f64,
    /// One entry per trap seen, sorted by name. A question with several traps
    /// counts toward each of them.
    pub trap_stats: Vec<TrapStat>,
}

pub fn count_comparison_stats(
    session_id: SessionId,
    results: &[StoredResult],
) -> Result<CountComparisonSessionStats> {
    let decoded: Vec<CountComparisonResult> =
        decode_session(session_id, GameCode::CountComparison, results)?;

    let mut overall = Tally::default();
    let mut traps: BTreeMap<String, Tally> = BTreeMap::new();
    for r in &decoded {
        let time = f64::from(r.response_time_ms);
        overall.add(r.is_correct, time);

        if r.applied_traps.is_empty() {
            traps.entry(NO_TRAP.to_string()).or_default().add(r.is_correct, time);
        }
        for trap in &r.applied_traps {
            let key = format!("{}_{}", trap.kind.as_str(), trap.applied_to);
            traps.entry(key).or_default().add(r.is_correct, time);
        }
    }

    Ok(CountComparisonSessionStats {
        session_id,
        total_questions: overall.questions,
        total_correct: overall.correct,
        overall_accuracy: overall.accuracy(),
        average_response_time_ms: overall.average_time(),
        trap_stats: traps
            .into_iter()
            .map(|(trap_type, tally)| TrapStat {
                trap_type,
                total_questions: tally.questions,
                total_correct: tally.correct,
                accuracy: tally.accuracy(),
                average_response_time_ms: tally.average_time(),
            })
            .collect(),
    })
}

// Shape Rotation

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRotationSessionStats {
    pub session_id: SessionId,
    pub total_questions: usize,
    pub total_correct: usize,
    pub overall_accuracy: f64,
    pub average_solve_time_ms: f64,
    pub average_click_count: f64,
}

pub fn shape_rotation_stats(
    session_id: SessionId,
    results: &[StoredResult],
) -> Result<ShapeRotationSessionStats> {
    let decoded: Vec<ShapeRotationResult> =
        decode_session(session_id, GameCode::ShapeRotation, results)?;

    let mut overall = Tally::default();
    let mut clicks = 0u64;
    for r in &decoded {
        overall.add(r.is_correct, f64::from(r.solve_time_ms));
        clicks += u64::from(r.click_count);
    }

    let average_click_count = if overall.questions == 0 {
        0.0
    } else {
        clicks as f64 / overall.questions as f64
    };
    Ok(ShapeRotationSessionStats {
        session_id,
        total_questions: overall.questions,
        total_correct: overall.correct,
        overall_accuracy: overall.accuracy(),
        average_solve_time_ms: overall.average_time(),
        average_click_count,
    })
}

// Number Pressing

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberPressingRecord {
    RoundTwo(NumberPressingResultR2),
    RoundOne(NumberPressingResultR1),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPressingConditionStat {
    /// e.g. `doubleClick: [2, 8], skip: [4, 6]`.
    pub condition_type: String,
    pub total_questions: usize,
    pub total_correct: usize,
    pub accuracy: f64,
    pub average_time_taken_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPressingRoundStats {
    pub round: u8,
    pub total_questions: usize,
    pub total_correct: usize,
    pub accuracy: f64,
    pub average_time_taken_sec: f64,
    /// Round two only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_stats: Vec<NumberPressingConditionStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPressingSessionStats {
    pub session_id: SessionId,
    pub total_questions: usize,
    pub total_correct: usize,
    pub overall_accuracy: f64,
    pub average_time_taken_sec: f64,
    /// Only rounds with at least one answer.
    pub round_stats: Vec<NumberPressingRoundStats>,
}

fn round_stats(
    round: u8,
    tally: Tally,
    conditions: BTreeMap<String, Tally>,
) -> NumberPressingRoundStats {
    NumberPressingRoundStats {
        round,
        total_questions: tally.questions,
        total_correct: tally.correct,
        accuracy: tally.accuracy(),
        average_time_taken_sec: tally.average_time(),
        condition_stats: conditions
            .into_iter()
            .map(|(condition_type, c)| NumberPressingConditionStat {
                condition_type,
                total_questions: c.questions,
                total_correct: c.correct,
                accuracy: c.accuracy(),
                average_time_taken_sec: c.average_time(),
            })
            .collect(),
    }
}

pub fn number_pressing_stats(
    session_id: SessionId,
    results: &[StoredResult],
) -> Result<NumberPressingSessionStats> {
    let decoded: Vec<NumberPressingRecord> =
        decode_session(session_id, GameCode::NumberPressing, results)?;

    let mut overall = Tally::default();
    let mut round_one = Tally::default();
    let mut round_two = Tally::default();
    let mut conditions: BTreeMap<String, Tally> = BTreeMap::new();
    for record in &decoded {
        match record {
            NumberPressingRecord::RoundOne(r) => {
                overall.add(r.is_correct, r.time_taken);
                round_one.add(r.is_correct, r.time_taken);
            }
            NumberPressingRecord::RoundTwo(r) => {
                overall.add(r.is_correct, r.time_taken);
                round_two.add(r.is_correct, r.time_taken);
                let key = format!(
                    "doubleClick: {:?}, skip: {:?}",
                    r.problem.double_click, r.problem.skip
                );
                conditions.entry(key).or_default().add(r.is_correct, r.time_taken);
            }
        }
    }

    let mut rounds = Vec::new();
    if round_one.questions > 0 {
        rounds.push(round_stats(1, round_one, BTreeMap::new()));
    }
    if round_two.questions > 0 {
        rounds.push(round_stats(2, round_two, conditions));
    }

    Ok(NumberPressingSessionStats {
        session_id,
        total_questions: overall.questions,
        total_correct: overall.correct,
        overall_accuracy: overall.accuracy(),
        average_time_taken_sec: overall.average_time(),
        round_stats: rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::cat_chaser::{CatAnswer, CaughtStatus, TargetColor};
    use crate::games::count_comparison::{AppliedTrap, Side, TrapKind};
    use crate::games::number_pressing::{ProblemR1, ProblemR2};
    use crate::games::shape_rotation::Transform;
    use chrono::Utc;
    use serde::Serialize;

    fn stored<T: Serialize>(id: i64, session: i64, game_code: GameCode, result: &T) -> StoredResult {
        StoredResult {
            id,
            session_id: SessionId::new(session),
            game_code,
            payload: serde_json::to_value(result).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn cat(round: usize, is_correct: bool, score: f64, response_time_ms: u32) -> CatChaserResult {
        CatChaserResult {
            session_id: SessionId::new(1),
            round,
            target_color: TargetColor::Red,
            player_choice: CatAnswer::Caught,
            confidence: 3,
            correct_choice: CaughtStatus::Caught,
            is_correct,
            score,
            response_time_ms,
        }
    }

    #[test]
    fn cat_chaser_groups_by_round() {
        let rows = vec![
            stored(1, 1, GameCode::CatChaser, &cat(2, true, 1.0, 400)),
            stored(2, 1, GameCode::CatChaser, &cat(1, false, -0.5, 600)),
            stored(3, 1, GameCode::CatChaser, &cat(1, true, 2.0, 800)),
            stored(4, 1, GameCode::CatChaser, &cat(2, false, -1.0, 1200)),
            // Another session.
            stored(5, 9, GameCode::CatChaser, &cat(1, true, 2.0, 100)),
        ];

        let stats = cat_chaser_stats(SessionId::new(1), &rows).unwrap();
        assert_eq!(stats.total_questions, 4);
        assert_eq!(stats.total_correct, 2);
        assert_eq!(stats.total_score, 1.5);
        assert_eq!(stats.overall_accuracy, 50.0);
        assert_eq!(stats.average_response_time_ms, 750.0);

        let rounds: Vec<usize> = stats.round_stats.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2]);
        assert_eq!(stats.round_stats[0].total_score, 1.5);
        assert_eq!(stats.round_stats[0].average_response_time_ms, 700.0);
        assert_eq!(stats.round_stats[1].total_score, 0.0);
    }

    #[test]
    fn empty_session_is_zeroed() {
        let stats = cat_chaser_stats(SessionId::new(3), &[]).unwrap();
        assert_eq!(stats.total_questions, 0);
        assert_eq!(stats.overall_accuracy, 0.0);
        assert!(stats.round_stats.is_empty());

        let stats = shape_rotation_stats(SessionId::new(3), &[]).unwrap();
        assert_eq!(stats.average_click_count, 0.0);
    }

    fn comparison(is_correct: bool, response_time_ms: u32, traps: Vec<AppliedTrap>) -> CountComparisonResult {
        CountComparisonResult {
            session_id: SessionId::new(1),
            problem_number: 1,
            is_correct,
            response_time_ms,
            player_choice: Side::Left,
            correct_choice: Side::Left,
            left_word: "tree".to_string(),
            right_word: "leaf".to_string(),
            left_word_count: 12,
            right_word_count: 9,
            applied_traps: traps,
        }
    }

    #[test]
    fn count_comparison_splits_by_trap() {
        let font_right = AppliedTrap {
            kind: TrapKind::FontSize,
            applied_to: Side::Right,
        };
        let gap_right = AppliedTrap {
            kind: TrapKind::GapProbability,
            applied_to: Side::Right,
        };
        let rows = vec![
            stored(1, 1, GameCode::CountComparison, &comparison(true, 500, vec![font_right])),
            stored(2, 1, GameCode::CountComparison, &comparison(false, 900, vec![gap_right, font_right])),
            stored(3, 1, GameCode::CountComparison, &comparison(true, 400, vec![])),
        ];

        let stats = count_comparison_stats(SessionId::new(1), &rows).unwrap();
        assert_eq!(stats.total_questions, 3);
        assert_eq!(stats.total_correct, 2);
        assert_eq!(stats.average_response_time_ms, 600.0);

        let names: Vec<&str> = stats.trap_stats.iter().map(|t| t.trap_type.as_str()).collect();
        assert_eq!(names, vec!["FontSize_right", "GapProbability_right", NO_TRAP]);

        let font = &stats.trap_stats[0];
        assert_eq!(font.total_questions, 2);
        assert_eq!(font.accuracy, 50.0);
        assert_eq!(font.average_response_time_ms, 700.0);
        assert_eq!(stats.trap_stats[2].accuracy, 100.0);
    }

    #[test]
    fn shape_rotation_averages() {
        let result = |is_correct, solve_time_ms, click_count| ShapeRotationResult {
            session_id: SessionId::new(4),
            problem_id: 1,
            user_solution: vec![Transform::FlipVertical],
            is_correct,
            solve_time_ms,
            click_count,
        };
        let rows = vec![
            stored(1, 4, GameCode::ShapeRotation, &result(true, 3000, 2)),
            stored(2, 4, GameCode::ShapeRotation, &result(true, 5000, 5)),
            stored(3, 4, GameCode::ShapeRotation, &result(false, 7000, 8)),
            stored(4, 4, GameCode::ShapeRotation, &result(false, 1000, 1)),
        ];

        let stats = shape_rotation_stats(SessionId::new(4), &rows).unwrap();
        assert_eq!(stats.total_correct, 2);
        assert_eq!(stats.overall_accuracy, 50.0);
        assert_eq!(stats.average_solve_time_ms, 4000.0);
        assert_eq!(stats.average_click_count, 4.0);
    }

    #[test]
    fn number_pressing_rounds_and_conditions() {
        let r1 = |target: u8, pressed: u8, time_taken: f64| NumberPressingResultR1 {
            session_id: SessionId::new(2),
            problem: ProblemR1 {
                target_number: target,
            },
            pressed,
            time_taken,
            is_correct: target == pressed,
        };
        let problem = ProblemR2 {
            double_click: vec![2, 8],
            skip: vec![4, 6],
        };
        let r2 = |is_correct: bool, time_taken: f64| NumberPressingResultR2 {
            session_id: SessionId::new(2),
            problem: problem.clone(),
            player_clicks: vec![1],
            correct_clicks: problem.correct_clicks(),
            time_taken,
            is_correct,
        };

        let rows = vec![
            stored(1, 2, GameCode::NumberPressing, &r1(3, 3, 1.0)),
            stored(2, 2, GameCode::NumberPressing, &r1(5, 4, 2.0)),
            stored(3, 2, GameCode::NumberPressing, &r2(true, 4.0)),
            stored(4, 2, GameCode::NumberPressing, &r2(true, 5.0)),
        ];

        let stats = number_pressing_stats(SessionId::new(2), &rows).unwrap();
        assert_eq!(stats.total_questions, 4);
        assert_eq!(stats.overall_accuracy, 75.0);
        assert_eq!(stats.average_time_taken_sec, 3.0);

        assert_eq!(stats.round_stats.len(), 2);
        let first = &stats.round_stats[0];
        assert_eq!((first.round, first.total_correct), (1, 1));
        assert!(first.condition_stats.is_empty());

        let second = &stats.round_stats[1];
        assert_eq!(second.round, 2);
        assert_eq!(second.average_time_taken_sec, 4.5);
        assert_eq!(second.condition_stats.len(), 1);
        assert_eq!(
            second.condition_stats[0].condition_type,
            "doubleClick: [2, 8], skip: [4, 6]"
        );
        assert_eq!(second.condition_stats[0].accuracy, 100.0);
    }

    #[test]
    fn rows_of_other_games_are_ignored() {
        let rows = vec![stored(1, 1, GameCode::Rps, &serde_json::json!({ "isCorrect": true }))];
        let stats = cat_chaser_stats(SessionId::new(1), &rows).unwrap();
        assert_eq!(stats.total_questions, 0);
    }

    #[test]
    fn undecodable_row_is_an_error() {
        let rows = vec![stored(1, 1, GameCode::ShapeRotation, &serde_json::json!({ "isCorrect": 1 }))];
        assert!(shape_rotation_stats(SessionId::new(1), &rows).is_err());
    }
}
