//! Cat Chaser: after a glimpse of mice and cats on a 6x6 board, say whether
//! the red or blue cat caught a mouse, and how sure you are.

pub mod problem;
pub mod service;

pub use problem::{
    score_answer, CatAnswer, CatChaserProblem, CatChaserSettings, CaughtStatus, TargetColor,
};
pub use service::{CatChaserGame, CatChaserResult, CatChaserService};
