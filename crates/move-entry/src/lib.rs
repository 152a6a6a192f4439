//! Building moves from board clicks and submitting them to a live match.

pub mod builder;
pub mod error;
pub mod interactive;
pub mod service;

pub use builder::{
    legal_targets, BoardTarget, ChessMoveBuilder, ClickOutcome, ColumnMoveBuilder, LegalTarget, MoveAttempt,
    MoveBuilder, Selection,
};
pub use error::{IllegalMoveAttempt, InteractiveError, MatchServiceError};
pub use interactive::InteractiveMatch;
pub use service::{LiveMatch, MatchService, MoveSubmission};
