//! Replay engine contract: an ordered move log folded into positions.

use std::fmt::Debug;

use crate::error::MoveError;
use crate::match_move::MatchMove;
use crate::position::GamePosition;

/// Receives moves that could not be replayed.
pub trait FaultReporter {
    fn move_failed(&self, index: usize, mv: &MatchMove, error: &MoveError);
}

/// Default reporter: one `warn!` per failed move.
pub struct TracingFaultReporter;

impl FaultReporter for TracingFaultReporter {
    fn move_failed(&self, index: usize, mv: &MatchMove, error: &MoveError) {
        tracing::warn!(
            index,
            player = mv.player_index,
            notation = ?mv.move_notation,
            error = %error,
            "Failed to apply move during replay"
        );
    }
}

/// Stateless per-game replay engine.
///
/// Implementors only say how to start and how to apply one move. The fold is
/// shared: position `i + 1` depends only on position `i` and move `i`, and a
/// move that fails to apply carries the prior state forward with a fault, so
/// a log of N moves always yields N + 1 positions.
pub trait ReplayEngine {
    type State: Clone + Debug + PartialEq;

    fn initial_state(&self) -> Self::State;

    /// Apply move `index` of the log to `state`.
    fn apply_move(
        &self,
        state: &Self::State,
        index: usize,
        mv: &MatchMove,
    ) -> Result<Self::State, MoveError>;

    fn initial_position(&self) -> GamePosition<Self::State> {
        GamePosition::initial(self.initial_state())
    }

    fn compute_positions(&self, moves: &[MatchMove]) -> Vec<GamePosition<Self::State>> {
        self.compute_positions_with(moves, &TracingFaultReporter)
    }

    fn compute_positions_with(
        &self,
        moves: &[MatchMove],
        reporter: &dyn FaultReporter,
    ) -> Vec<GamePosition<Self::State>> {
        let mut positions = Vec::with_capacity(moves.len() + 1);
        self.extend_positions_with(&mut positions, moves, reporter);
        positions
    }

    fn extend_positions(&self, positions: &mut Vec<GamePosition<Self::State>>, moves: &[MatchMove]) {
        self.extend_positions_with(positions, moves, &TracingFaultReporter);
    }

    /// Append positions for the moves of `moves` not yet folded into
    /// `positions`. `moves` is the whole log; earlier positions are kept
    /// as they are.
    fn extend_positions_with(
        &self,
        positions: &mut Vec<GamePosition<Self::State>>,
        moves: &[MatchMove],
        reporter: &dyn FaultReporter,
    ) {
        if positions.is_empty() {
            positions.push(self.initial_position());
        }

        let applied = positions.len() - 1;
        for (index, mv) in moves.iter().enumerate().skip(applied) {
            let prior = &positions[positions.len() - 1].state;
            let next = match self.apply_move(prior, index, mv) {
                Ok(state) => GamePosition::after(state, mv.clone()),
                Err(e) => {
                    reporter.move_failed(index, mv, &e);
                    GamePosition::faulted(prior.clone(), mv.clone(), e)
                }
            };
            positions.push(next);
        }
    }
}
