//! Error types for the game engines.
//!
//! Game-facing operations return [`GameError`] so callers can match on the
//! specific failure. Storage code keeps using `anyhow` internally and is
//! wrapped into [`GameError::PersistenceFailure`] at the service boundary.

use thiserror::Error;

pub use crate::games::shape_rotation::ShapeError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("game not started or already finished")]
    GameNotStarted,

    #[error("trial index {index} is out of range for {len} generated trials")]
    InvalidTrialIndex { index: usize, len: usize },

    #[error("invalid choice '{value}'")]
    InvalidChoice { value: String },

    #[error("failed to persist game data: {0:#}")]
    PersistenceFailure(#[source] anyhow::Error),

    #[error(transparent)]
    MalformedShape(#[from] ShapeError),

    #[error("embedded word list is malformed: {0}")]
    MalformedWordList(#[from] serde_json::Error),
}

impl GameError {
    pub fn invalid_choice(value: impl Into<String>) -> Self {
        GameError::InvalidChoice {
            value: value.into(),
        }
    }

    /// True when the failure came from the storage collaborator rather than
    /// from the submitted input.
    pub fn is_persistence(&self) -> bool {
        matches!(self, GameError::PersistenceFailure(_))
    }
}

pub type GameResult<T> = std::result::Result<T, GameError>;
