//! In-memory state of the game currently being played.
//!
//! Each service keeps its generated problems in a [`SessionRegistry`] keyed
//! by session id. Only one session per service is active at a time:
//! activating a new one retires the previous, and any later submission for the
//! retired id fails with [`GameError::GameNotStarted`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::models::SessionId;
use crate::error::{GameError, GameResult};

/// Anything that owns an ordered, fixed set of trials.
pub trait TrialSet {
    fn trial_count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Complete,
}

struct ActiveSession<G> {
    game: G,
    answered: Vec<bool>,
}

pub struct SessionRegistry<G> {
    sessions: HashMap<SessionId, ActiveSession<G>>,
    current: Option<SessionId>,
}

impl<G> Default for SessionRegistry<G> {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
            current: None,
        }
    }
}

impl<G: TrialSet> SessionRegistry<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `game` the active session. Returns the id of the session it
    /// replaced, if any.
    pub fn activate(&mut self, session_id: SessionId, game: G) -> Option<SessionId> {
        let retired = self.current.take().filter(|previous| *previous != session_id);
        if let Some(previous) = retired {
            self.sessions.remove(&previous);
        }

        let answered = vec![false; game.trial_count()];
        self.sessions
            .insert(session_id, ActiveSession { game, answered });
        self.current = Some(session_id);
        retired
    }

    pub fn current(&self) -> Option<SessionId> {
        self.current
    }

    pub fn get(&self, session_id: SessionId) -> GameResult<&G> {
        self.active(session_id).map(|session| &session.game)
    }

    pub fn get_mut(&mut self, session_id: SessionId) -> GameResult<&mut G> {
        if self.current != Some(session_id) {
            return Err(GameError::GameNotStarted);
        }
        self.sessions
            .get_mut(&session_id)
            .map(|session| &mut session.game)
            .ok_or(GameError::GameNotStarted)
    }

    /// Validate `index` against the session's trials.
    pub fn check_trial(&self, session_id: SessionId, index: usize) -> GameResult<&G> {
        let session = self.active(session_id)?;
        let len = session.game.trial_count();
        if index >= len {
            return Err(GameError::InvalidTrialIndex { index, len });
        }
        Ok(&session.game)
    }

    /// Mark a trial as answered. Repeated answers are allowed.
    pub fn record_answer(&mut self, session_id: SessionId, index: usize) -> GameResult<()> {
        self.check_trial(session_id, index)?;
        if let Some(slot) = self
            .sessions
            .get_mut(&session_id)
            .and_then(|session| session.answered.get_mut(index))
        {
            *slot = true;
        }
        Ok(())
    }

    pub fn phase(&self, session_id: SessionId) -> GamePhase {
        match self.active(session_id) {
            Err(_) => GamePhase::NotStarted,
            Ok(session) if session.answered.iter().all(|answered| *answered) => {
                GamePhase::Complete
            }
            Ok(_) => GamePhase::InProgress,
        }
    }

    /// Drop the session. Returns whether it was active.
    pub fn finish(&mut self, session_id: SessionId) -> bool {
        if self.current == Some(session_id) {
            self.current = None;
        }
        self.sessions.remove(&session_id).is_some()
    }

    fn active(&self, session_id: SessionId) -> GameResult<&ActiveSession<G>> {
        if self.current != Some(session_id) {
            return Err(GameError::GameNotStarted);
        }
        self.sessions
            .get(&session_id)
            .ok_or(GameError::GameNotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Trials(usize);

    impl TrialSet for Trials {
        fn trial_count(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn activating_retires_previous_session() {
        let mut registry = SessionRegistry::new();
        let first = SessionId::new(1);
        let second = SessionId::new(2);

        assert_eq!(registry.activate(first, Trials(3)), None);
        assert_eq!(registry.activate(second, Trials(3)), Some(first));

        assert!(matches!(registry.get(first), Err(GameError::GameNotStarted)));
        assert!(registry.get(second).is_ok());
        assert_eq!(registry.current(), Some(second));
    }

    #[test]
    fn phases_follow_answers() {
        let mut registry = SessionRegistry::new();
        let id = SessionId::new(7);
        assert_eq!(registry.phase(id), GamePhase::NotStarted);

        registry.activate(id, Trials(2));
        assert_eq!(registry.phase(id), GamePhase::InProgress);

        registry.record_answer(id, 0).unwrap();
        registry.record_answer(id, 0).unwrap();
        assert_eq!(registry.phase(id), GamePhase::InProgress);

        registry.record_answer(id, 1).unwrap();
        assert_eq!(registry.phase(id), GamePhase::Complete);
    }

    #[test]
    fn out_of_range_trial_is_rejected() {
        let mut registry = SessionRegistry::new();
        let id = SessionId::new(1);
        registry.activate(id, Trials(2));

        let err = registry.record_answer(id, 2).unwrap_err();
        assert!(matches!(err, GameError::InvalidTrialIndex { index: 2, len: 2 }));
    }

    #[test]
    fn finish_clears_current() {
        let mut registry = SessionRegistry::new();
        let id = SessionId::new(1);
        registry.activate(id, Trials(1));

        assert!(registry.finish(id));
        assert_eq!(registry.current(), None);
        assert!(!registry.finish(id));
    }
}
