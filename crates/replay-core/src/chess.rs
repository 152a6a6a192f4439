//! Chess replay on top of shakmaty.
//!
//! The state is a FEN string. Structured moves (origin + destination squares)
//! are applied as UCI coordinate moves; moves without squares fall back to
//! their notation, read as SAN first and UCI second.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Piece, Position, Role, Square};

use crate::engine::ReplayEngine;
use crate::error::MoveError;
use crate::match_move::{non_blank, MatchMove};

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, Default)]
pub struct ChessReplayEngine;

impl ReplayEngine for ChessReplayEngine {
    type State = String;

    fn initial_state(&self) -> String {
        STANDARD_START_FEN.to_string()
    }

    fn apply_move(&self, state: &String, _index: usize, mv: &MatchMove) -> Result<String, MoveError> {
        let mut pos = parse_fen(state)?;

        let legal = match (non_blank(&mv.from_square), non_blank(&mv.to_square)) {
            (Some(from), Some(to)) => coordinate_move(&pos, from, to, mv.promotion_piece.as_deref())?,
            _ => match non_blank(&mv.move_notation) {
                Some(notation) => notation_move(&pos, notation)?,
                None => return Err(MoveError::MissingSquares),
            },
        };

        pos.play_unchecked(legal);
        Ok(to_fen(&pos))
    }
}

/// Parse a FEN produced by this engine (or the match service).
pub fn parse_fen(fen: &str) -> Result<Chess, MoveError> {
    let parsed: Fen = fen
        .parse()
        .map_err(|e| MoveError::CorruptState(format!("{fen}: {e}")))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| MoveError::CorruptState(format!("{fen}: {e}")))
}

pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Squares are accepted in either case ("E2" or "e2").
pub fn parse_square(square: &str) -> Result<Square, MoveError> {
    square
        .trim()
        .to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| MoveError::InvalidSquare(square.to_string()))
}

fn parse_promotion(piece: &str) -> Result<Role, MoveError> {
    let lowered = piece.trim().to_ascii_lowercase();
    let mut chars = lowered.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Role::from_char(c)
            .filter(|role| !matches!(role, Role::Pawn | Role::King))
            .ok_or_else(|| MoveError::InvalidPromotion(piece.to_string())),
        _ => Err(MoveError::InvalidPromotion(piece.to_string())),
    }
}

fn coordinate_move(
    pos: &Chess,
    from: &str,
    to: &str,
    promotion: Option<&str>,
) -> Result<shakmaty::Move, MoveError> {
    let from = parse_square(from)?;
    let to = parse_square(to)?;
    let promotion = promotion
        .filter(|p| !p.trim().is_empty())
        .map(parse_promotion)
        .transpose()?;

    let uci = UciMove::Normal { from, to, promotion };
    uci.to_move(pos).map_err(|e| MoveError::IllegalMove {
        mv: uci.to_string(),
        reason: e.to_string(),
    })
}

fn notation_move(pos: &Chess, notation: &str) -> Result<shakmaty::Move, MoveError> {
    // Coordinate strings like "g1f3" also parse as SAN, so an illegal SAN
    // reading still gets a UCI attempt before giving up.
    let san = notation.parse::<SanPlus>().ok().map(|s| s.san.to_move(pos));
    if let Some(Ok(m)) = san {
        return Ok(m);
    }

    let uci = notation
        .to_ascii_lowercase()
        .parse::<UciMove>()
        .ok()
        .map(|u| u.to_move(pos));
    if let Some(Ok(m)) = uci {
        return Ok(m);
    }

    let reason = match (san, uci) {
        (Some(Err(e)), _) => e.to_string(),
        (_, Some(Err(e))) => e.to_string(),
        _ => return Err(MoveError::InvalidNotation(notation.to_string())),
    };
    Err(MoveError::IllegalMove {
        mv: notation.to_string(),
        reason,
    })
}

/// Legal moves of the position as UCI strings ("e2e4", "e7e8q"), the same
/// encoding the match service hands to players.
pub fn legal_moves(fen: &str) -> Result<Vec<String>, MoveError> {
    let pos = parse_fen(fen)?;
    Ok(pos
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .collect())
}

/// Piece on `square`, if any.
pub fn piece_at(pos: &Chess, square: Square) -> Option<Piece> {
    pos.board().piece_at(square)
}
