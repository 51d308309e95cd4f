//! Rock-Paper-Scissors reaction test: win against your own shown card, or
//! lose to the opponent's.

pub mod problem;
pub mod service;

pub use problem::{Card, CardHolder, RpsChoice, RpsProblem, RpsSettings};
pub use service::{RpsGame, RpsResult, RpsService};
