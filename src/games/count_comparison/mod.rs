//! Count Comparison: pick the word cloud with more words while traps make
//! the smaller cloud look bigger.

pub mod cloud;
pub mod service;

pub use cloud::{
    count_words, AppliedTrap, CountComparisonProblem, CountComparisonSettings, Side, TrapKind,
    WordDetail,
};
pub use service::{
    CountComparisonGame, CountComparisonResult, CountComparisonService, CountComparisonSubmission,
};
