//! N-Back: a shape sequence where the player reports 2-back and 3-back
//! matches.

pub mod sequence;
pub mod service;

pub use sequence::{correct_choice, generate_sequence, shape_groups, NBackChoice, NBackLevel};
pub use service::{NBackGame, NBackResult, NBackService, NBackSettings};
