use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::rng::GameRng;

/// Cells on the 6x6 board.
pub const GRID_CELLS: usize = 36;
pub const AUTO_DIFFICULTY: &str = "auto";
/// Mouse counts the automatic difficulty steps through.
pub const AUTO_LEVELS: [usize; 6] = [4, 6, 8, 10, 12, 16];
pub const MIN_MICE: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatChaserSettings {
    pub num_trials: usize,
    /// `"auto"` or a literal mouse count.
    pub difficulty: String,
    /// Seconds the board is shown.
    pub show_time: f64,
    /// Seconds allowed for each answer.
    pub response_time_limit: f64,
    pub is_real_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetColor {
    Red,
    Blue,
}

impl FromStr for TargetColor {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "RED" => Ok(TargetColor::Red),
            "BLUE" => Ok(TargetColor::Blue),
            other => Err(GameError::invalid_choice(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaughtStatus {
    Caught,
    Missed,
}

impl CaughtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaughtStatus::Caught => "CAUGHT",
            CaughtStatus::Missed => "MISSED",
        }
    }
}

impl fmt::Display for CaughtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the player answered. `Timeout` is sent when no answer came in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatAnswer {
    Caught,
    Missed,
    Timeout,
}

impl FromStr for CatAnswer {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CAUGHT" => Ok(CatAnswer::Caught),
            "MISSED" => Ok(CatAnswer::Missed),
            "TIMEOUT" => Ok(CatAnswer::Timeout),
            other => Err(GameError::invalid_choice(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatChaserProblem {
    /// 1-based.
    pub round: usize,
    /// Flat cell indices, row major.
    pub mice_positions: Vec<usize>,
    pub cat_positions: Vec<usize>,
    /// Index into `cat_positions`.
    pub red_cat_index: usize,
    pub blue_cat_index: usize,
}

impl CatChaserProblem {
    /// Whether the highlighted cat sits on a mouse.
    pub fn status(&self, color: TargetColor) -> CaughtStatus {
        let index = match color {
            TargetColor::Red => self.red_cat_index,
            TargetColor::Blue => self.blue_cat_index,
        };
        let caught = self
            .cat_positions
            .get(index)
            .is_some_and(|cell| self.mice_positions.contains(cell));
        if caught {
            CaughtStatus::Caught
        } else {
            CaughtStatus::Missed
        }
    }
}

/// Mouse count for every trial.
pub fn mouse_counts(num_trials: usize, difficulty: &str) -> Vec<usize> {
    if difficulty == AUTO_DIFFICULTY {
        return (0..num_trials)
            .map(|i| {
                let level = (i * AUTO_LEVELS.len()) / num_trials;
                AUTO_LEVELS[level.min(AUTO_LEVELS.len() - 1)]
            })
            .collect();
    }

    let count = difficulty
        .trim()
        .parse::<usize>()
        .unwrap_or(MIN_MICE)
        .clamp(MIN_MICE, GRID_CELLS);
    vec![count; num_trials]
}

pub fn generate_problem(round: usize, num_mice: usize, rng: &mut GameRng) -> CatChaserProblem {
    let num_mice = num_mice.clamp(MIN_MICE, GRID_CELLS);
    let mut mice_positions = rng.permutation(GRID_CELLS);
    mice_positions.truncate(num_mice);
    let mut cat_positions = rng.permutation(GRID_CELLS);
    cat_positions.truncate(num_mice);

    let targets = rng.permutation(num_mice);
    CatChaserProblem {
        round,
        mice_positions,
        cat_positions,
        red_cat_index: targets[0],
        blue_cat_index: targets[1],
    }
}

pub fn generate_problems(settings: &CatChaserSettings, rng: &mut GameRng) -> Vec<CatChaserProblem> {
    mouse_counts(settings.num_trials, &settings.difficulty)
        .into_iter()
        .enumerate()
        .map(|(i, mice)| generate_problem(i + 1, mice, rng))
        .collect()
}

/// Multiplier for a 1..=4 confidence rating.
pub fn confidence_multiplier(confidence: u8) -> GameResult<f64> {
    match confidence {
        1 => Ok(0.1),
        2 => Ok(0.5),
        3 => Ok(1.0),
        4 => Ok(2.0),
        other => Err(GameError::invalid_choice(format!("confidence {other}"))),
    }
}

/// Grade one answer: `(is_correct, score)`. A timeout always scores -1.
pub fn score_answer(
    status: CaughtStatus,
    answer: CatAnswer,
    confidence: u8,
) -> GameResult<(bool, f64)> {
    let chosen = match answer {
        CatAnswer::Timeout => return Ok((false, -1.0)),
        CatAnswer::Caught => CaughtStatus::Caught,
        CatAnswer::Missed => CaughtStatus::Missed,
    };
    let multiplier = confidence_multiplier(confidence)?;
    let is_correct = chosen == status;
    Ok((is_correct, if is_correct { multiplier } else { -multiplier }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_examples() {
        assert_eq!(
            score_answer(CaughtStatus::Caught, CatAnswer::Caught, 4).unwrap(),
            (true, 2.0)
        );
        assert_eq!(
            score_answer(CaughtStatus::Missed, CatAnswer::Caught, 1).unwrap(),
            (false, -0.1)
        );
        assert_eq!(
            score_answer(CaughtStatus::Caught, CatAnswer::Timeout, 4).unwrap(),
            (false, -1.0)
        );
        // Confidence is irrelevant for a timeout.
        assert_eq!(
            score_answer(CaughtStatus::Missed, CatAnswer::Timeout, 0).unwrap(),
            (false, -1.0)
        );
        assert!(score_answer(CaughtStatus::Missed, CatAnswer::Missed, 5).is_err());
    }

    #[test]
    fn auto_difficulty_buckets() {
        assert_eq!(mouse_counts(6, "auto"), vec![4, 6, 8, 10, 12, 16]);
        assert_eq!(mouse_counts(10, "auto"), vec![4, 4, 6, 6, 8, 10, 10, 12, 12, 16]);
        assert!(mouse_counts(0, "auto").is_empty());
    }

    #[test]
    fn literal_difficulty_is_bounded() {
        assert_eq!(mouse_counts(2, "10"), vec![10, 10]);
        assert_eq!(mouse_counts(1, "2"), vec![4]);
        assert_eq!(mouse_counts(1, "hard"), vec![4]);
        assert_eq!(mouse_counts(1, "99"), vec![36]);
    }

    #[test]
    fn problems_have_unique_positions_and_distinct_targets() {
        let mut rng = GameRng::new(12);
        for num_mice in [4, 16, 36] {
            let problem = generate_problem(1, num_mice, &mut rng);
            let mut mice = problem.mice_positions.clone();
            mice.sort_unstable();
            mice.dedup();
            assert_eq!(mice.len(), num_mice);
            assert_eq!(problem.cat_positions.len(), num_mice);
            assert!(problem.cat_positions.iter().all(|cell| *cell < GRID_CELLS));
            assert_ne!(problem.red_cat_index, problem.blue_cat_index);
        }
    }

    #[test]
    fn full_board_catches_everything() {
        let mut rng = GameRng::new(1);
        let problem = generate_problem(1, GRID_CELLS, &mut rng);
        assert_eq!(problem.status(TargetColor::Red), CaughtStatus::Caught);
        assert_eq!(problem.status(TargetColor::Blue), CaughtStatus::Caught);
    }

    #[test]
    fn status_follows_mouse_positions() {
        let problem = CatChaserProblem {
            round: 1,
            mice_positions: vec![0, 1, 2, 3],
            cat_positions: vec![3, 10, 11, 12],
            red_cat_index: 0,
            blue_cat_index: 1,
        };
        assert_eq!(problem.status(TargetColor::Red), CaughtStatus::Caught);
        assert_eq!(problem.status(TargetColor::Blue), CaughtStatus::Missed);
    }
}
