//! Move entry error types

use thiserror::Error;

use replay_core::RegistryError;

/// The user's completed selection is not in the legal-move set. Nothing was
/// sent to the match service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct IllegalMoveAttempt {
    pub reason: String,
}

impl IllegalMoveAttempt {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchServiceError {
    #[error("Move submission failed: {0}")]
    Submission(String),

    #[error("Failed to load match: {0}")]
    Fetch(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractiveError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Match {0} has no live board state")]
    NoLiveState(String),

    #[error(transparent)]
    Service(#[from] MatchServiceError),
}
