use serde::Serialize;

use crate::error::MoveError;
use crate::match_move::MatchMove;

/// A reconstructed board snapshot plus the move that produced it.
///
/// `mv` is `None` exactly for the initial position. `fault` is set when `mv`
/// could not be applied, in which case `state` is the prior state carried
/// forward unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GamePosition<S> {
    pub state: S,
    #[serde(rename = "move")]
    pub mv: Option<MatchMove>,
    #[serde(skip)]
    pub fault: Option<MoveError>,
}

impl<S> GamePosition<S> {
    pub fn initial(state: S) -> Self {
        Self { state, mv: None, fault: None }
    }

    pub fn after(state: S, mv: MatchMove) -> Self {
        Self { state, mv: Some(mv), fault: None }
    }

    pub fn faulted(state: S, mv: MatchMove, fault: MoveError) -> Self {
        Self {
            state,
            mv: Some(mv),
            fault: Some(fault),
        }
    }
}
