//! Number Pressing: press a target digit (round 1), or press 1 to 9 with
//! double-click and skip rules (round 2).

pub mod problem;
pub mod service;

pub use problem::{NumberPressingSettings, ProblemR1, ProblemR2};
pub use service::{
    NumberPressingGame, NumberPressingResultR1, NumberPressingResultR2, NumberPressingService,
};
