//! Replay error types

use thiserror::Error;

/// Why a single move from the log could not be applied to the position
/// reached so far.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Move has neither squares nor notation")]
    MissingSquares,

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("Illegal move '{mv}': {reason}")]
    IllegalMove { mv: String, reason: String },

    #[error("Unparseable notation: {0}")]
    InvalidNotation(String),

    #[error("Move has no column")]
    MissingColumn,

    #[error("Column index out of bounds: {0}")]
    ColumnOutOfRange(String),

    #[error("Column {0} is full")]
    ColumnFull(usize),

    #[error("Prior state is corrupt: {0}")]
    CorruptState(String),

    #[error("State does not belong to the {0} engine")]
    StateMismatch(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No replay registered for game type: {0}")]
    UnregisteredGameType(String),
}
