//! Move-log replay for two-player board games.
//!
//! A match's move log is folded into a sequence of [`GamePosition`]s by the
//! [`ReplayEngine`] registered for its game type. Chess and Connect-Four are
//! built in; see [`registry`].

pub mod chess;
pub mod connect_four;
pub mod engine;
pub mod error;
pub mod match_move;
pub mod position;
pub mod registry;

pub use engine::{FaultReporter, ReplayEngine, TracingFaultReporter};
pub use error::{MoveError, RegistryError};
pub use match_move::MatchMove;
pub use position::GamePosition;
pub use registry::{GameEngine, GameRegistration, GameRegistry, GameState, GameType, Highlight};
