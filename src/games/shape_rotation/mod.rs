//! Shape Rotation: reach the shown final shape with at most `min_moves`
//! rotations and flips.

pub mod geometry;
pub mod grid;
pub mod path;
pub mod problem;
pub mod service;
mod shapes;

pub use geometry::{apply_transforms, compare_point_sets, Point, Transform, EPSILON};
pub use path::{parse_path, points_to_path, ShapeError};
pub use problem::{generate_problems, verify_solution, ShapeRotationProblem, ShapeRound};
pub use service::{
    PendingSave, ShapeRotationGame, ShapeRotationResult, ShapeRotationService,
    ShapeRotationSettings, SubmittedSolution,
};
