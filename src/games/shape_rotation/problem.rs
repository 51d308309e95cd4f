use serde::{Deserialize, Serialize};

use super::geometry::{apply_transforms, bounding_center, compare_point_sets, Point, Transform};
use super::grid::{grid_lines, parse_grid, GRID_CENTER, GRID_PROBLEMS};
use super::path::{parse_path, points_to_path, ShapeError};
use super::shapes::CANONICAL_SHAPES;
use crate::rng::GameRng;

/// Longest generated solution.
pub const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum ShapeRound {
    Letters,
    Grid,
}

impl From<u8> for ShapeRound {
    /// Anything other than 2 plays the letter round.
    fn from(value: u8) -> Self {
        match value {
            2 => ShapeRound::Grid,
            _ => ShapeRound::Letters,
        }
    }
}

impl From<ShapeRound> for u8 {
    fn from(round: ShapeRound) -> Self {
        match round {
            ShapeRound::Letters => 1,
            ShapeRound::Grid => 2,
        }
    }
}

impl ShapeRound {
    fn center(&self) -> Option<Point> {
        match self {
            ShapeRound::Letters => None,
            ShapeRound::Grid => Some(GRID_CENTER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRotationProblem {
    /// Position in the game for letters, grid table id for grids.
    pub id: u32,
    pub round: ShapeRound,
    pub initial_shape: String,
    pub final_shape: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_grid_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_grid_path: Option<String>,
    pub initial_center: Point,
    pub final_center: Point,
    pub min_moves: usize,
    pub solution: Vec<Transform>,
}

/// Draw `num_moves` transforms, never following a move with its inverse,
/// until the sequence actually changes `points`.
///
/// Returns `None` when no such sequence exists: zero moves, or a shape that
/// every rotation and flip leaves in place (an empty set, or points piled on
/// the center).
pub fn generate_solution(
    points: &[Point],
    num_moves: usize,
    center: Option<Point>,
    rng: &mut GameRng,
) -> Option<Vec<Transform>> {
    let movable = Transform::ALL.iter().any(|t| {
        let moved = apply_transforms(points, std::slice::from_ref(t), center);
        !compare_point_sets(points, &moved)
    });
    if num_moves == 0 || !movable {
        return None;
    }

    loop {
        let mut solution: Vec<Transform> = Vec::with_capacity(num_moves);
        while solution.len() < num_moves {
            let next = Transform::ALL[rng.gen_range(0..Transform::ALL.len())];
            if solution.last().is_some_and(|prev| prev.inverse() == next) {
                continue;
            }
            solution.push(next);
        }

        let moved = apply_transforms(points, &solution, center);
        if !compare_point_sets(points, &moved) {
            return Some(solution);
        }
    }
}

fn letter_problem(index: usize, rng: &mut GameRng) -> Result<ShapeRotationProblem, ShapeError> {
    let (_, data) = CANONICAL_SHAPES[rng.gen_range(0..CANONICAL_SHAPES.len())];
    let min_moves = rng.gen_range(1..=MAX_MOVES);

    let initial = parse_path(data)?;
    let solution =
        generate_solution(&initial, min_moves, None, rng).ok_or(ShapeError::Immovable)?;
    let moved = apply_transforms(&initial, &solution, None);

    Ok(ShapeRotationProblem {
        id: index as u32 + 1,
        round: ShapeRound::Letters,
        initial_shape: data.to_string(),
        final_shape: points_to_path(&moved),
        initial_grid_path: None,
        final_grid_path: None,
        initial_center: bounding_center(&initial),
        final_center: bounding_center(&moved),
        min_moves,
        solution,
    })
}

fn grid_problem(rng: &mut GameRng) -> Result<ShapeRotationProblem, ShapeError> {
    let base = &GRID_PROBLEMS[rng.gen_range(0..GRID_PROBLEMS.len())];
    let min_moves = rng.gen_range(1..=MAX_MOVES);

    let initial = parse_grid(base.cells)?;
    let lines = grid_lines();
    let solution = generate_solution(&initial, min_moves, Some(GRID_CENTER), rng)
        .ok_or(ShapeError::Immovable)?;
    let moved = apply_transforms(&initial, &solution, Some(GRID_CENTER));
    let moved_lines = apply_transforms(&lines, &solution, Some(GRID_CENTER));

    Ok(ShapeRotationProblem {
        id: base.id,
        round: ShapeRound::Grid,
        initial_shape: points_to_path(&initial),
        final_shape: points_to_path(&moved),
        initial_grid_path: Some(points_to_path(&lines)),
        final_grid_path: Some(points_to_path(&moved_lines)),
        initial_center: GRID_CENTER,
        final_center: GRID_CENTER,
        min_moves,
        solution,
    })
}

pub fn generate_problems(
    round: ShapeRound,
    num_problems: usize,
    rng: &mut GameRng,
) -> Result<Vec<ShapeRotationProblem>, ShapeError> {
    (0..num_problems)
        .map(|index| match round {
            ShapeRound::Letters => letter_problem(index, rng),
            ShapeRound::Grid => grid_problem(rng),
        })
        .collect()
}

/// Accept any solution no longer than `min_moves` that lands on the stored
/// final shape, whether or not it matches the generated move list.
pub fn verify_solution(
    problem: &ShapeRotationProblem,
    solution: &[Transform],
) -> Result<bool, ShapeError> {
    if solution.len() > problem.min_moves {
        return Ok(false);
    }

    let initial = parse_path(&problem.initial_shape)?;
    let target = parse_path(&problem.final_shape)?;
    let moved = apply_transforms(&initial, solution, problem.round.center());
    Ok(compare_point_sets(&moved, &target))
}
