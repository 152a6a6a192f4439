//! Click-driven move construction.
//!
//! Chess-family games use a two-click state machine (select origin, then
//! destination). Drop games turn a single column click into a move.
//! Legal targets are always derived from the legal-move list on demand.

use shakmaty::{Position, Role, Square};

use replay_core::chess;
use replay_core::{GameState, GameType};

use crate::error::IllegalMoveAttempt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Idle,
    Selected(Square),
}

/// A finished move, encoded the way the match service expects it
/// (`"e2e4"`, `"e7e8q"`, `"3"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAttempt {
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Square),
    Deselected,
    /// Click had no effect (empty square or opponent piece while idle).
    Ignored,
    Attempt(MoveAttempt),
    Rejected(IllegalMoveAttempt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalTarget {
    pub to: Square,
    pub promotion: Option<Role>,
    pub encoding: String,
}

/// Legal destinations from `origin`: entries of `legal_moves` whose source
/// square is `origin`.
pub fn legal_targets(legal_moves: &[String], origin: Square) -> Vec<LegalTarget> {
    let prefix = origin.to_string();
    legal_moves
        .iter()
        .filter_map(|encoding| {
            let encoding = encoding.trim().to_ascii_lowercase();
            if !encoding.starts_with(&prefix) || !(4..=5).contains(&encoding.len()) {
                return None;
            }
            let to = encoding.get(2..4)?.parse::<Square>().ok()?;
            let promotion = match encoding.get(4..) {
                Some("") | None => None,
                Some(p) => Some(Role::from_char(p.chars().next()?)?),
            };
            Some(LegalTarget { to, promotion, encoding })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ChessMoveBuilder {
    selection: Selection,
    observed: Option<String>,
    promotion: Role,
}

impl Default for ChessMoveBuilder {
    fn default() -> Self {
        Self {
            selection: Selection::Idle,
            observed: None,
            promotion: Role::Queen,
        }
    }
}

impl ChessMoveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Piece chosen when a destination has several promotion entries.
    pub fn with_promotion(mut self, role: Role) -> Self {
        self.promotion = role;
        self
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Note the position being played on. A different position than last
    /// time drops any pending selection. Returns true if it did.
    pub fn observe(&mut self, fen: &str) -> bool {
        if self.observed.as_deref() == Some(fen) {
            return false;
        }
        self.observed = Some(fen.to_string());
        let had_selection = self.selection != Selection::Idle;
        self.reset();
        had_selection
    }

    /// Targets for the current selection; empty while idle.
    pub fn legal_targets(&self, legal_moves: &[String]) -> Vec<LegalTarget> {
        match self.selection {
            Selection::Idle => Vec::new(),
            Selection::Selected(origin) => legal_targets(legal_moves, origin),
        }
    }

    pub fn click(&mut self, fen: &str, legal_moves: &[String], square: Square) -> ClickOutcome {
        self.observe(fen);
        let pos = match chess::parse_fen(fen) {
            Ok(pos) => pos,
            Err(e) => {
                self.reset();
                return ClickOutcome::Rejected(IllegalMoveAttempt::new(e.to_string()));
            }
        };
        let clicked = chess::piece_at(&pos, square);

        match self.selection {
            Selection::Idle => match clicked {
                Some(piece) if piece.color == pos.turn() => {
                    self.selection = Selection::Selected(square);
                    ClickOutcome::Selected(square)
                }
                _ => ClickOutcome::Ignored,
            },
            Selection::Selected(origin) if origin == square => {
                self.reset();
                ClickOutcome::Deselected
            }
            Selection::Selected(origin) => {
                let origin_color = chess::piece_at(&pos, origin).map(|p| p.color);
                if clicked.is_some_and(|p| Some(p.color) == origin_color) {
                    self.selection = Selection::Selected(square);
                    return ClickOutcome::Selected(square);
                }

                let targets: Vec<LegalTarget> = legal_targets(legal_moves, origin)
                    .into_iter()
                    .filter(|t| t.to == square)
                    .collect();
                self.reset();

                let chosen = targets
                    .iter()
                    .find(|t| t.promotion == Some(self.promotion))
                    .or_else(|| targets.first());
                match chosen {
                    Some(target) => ClickOutcome::Attempt(MoveAttempt {
                        encoding: target.encoding.clone(),
                    }),
                    None => ClickOutcome::Rejected(IllegalMoveAttempt::new(format!(
                        "Illegal move: {origin}{square}"
                    ))),
                }
            }
        }
    }
}

/// Drop-game builder: a legal column click is a complete move.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMoveBuilder;

impl ColumnMoveBuilder {
    pub fn click(&self, column: usize, legal_moves: &[String]) -> ClickOutcome {
        let encoding = column.to_string();
        if legal_moves.iter().any(|m| m.trim() == encoding) {
            ClickOutcome::Attempt(MoveAttempt { encoding })
        } else {
            ClickOutcome::Rejected(IllegalMoveAttempt::new("This column is full"))
        }
    }
}

/// What the user clicked on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardTarget {
    Square(Square),
    Column(usize),
}

#[derive(Debug, Clone)]
pub enum MoveBuilder {
    Chess(ChessMoveBuilder),
    Column(ColumnMoveBuilder),
}

impl MoveBuilder {
    pub fn for_game(game_type: GameType) -> Self {
        match game_type {
            GameType::Chess => MoveBuilder::Chess(ChessMoveBuilder::new()),
            GameType::ConnectFour => MoveBuilder::Column(ColumnMoveBuilder),
        }
    }

    pub fn selection(&self) -> Selection {
        match self {
            MoveBuilder::Chess(b) => b.selection(),
            MoveBuilder::Column(_) => Selection::Idle,
        }
    }

    pub fn observe(&mut self, state: &GameState) {
        if let (MoveBuilder::Chess(b), GameState::Chess(fen)) = (self, state) {
            b.observe(fen);
        }
    }

    pub fn legal_targets(&self, legal_moves: &[String]) -> Vec<LegalTarget> {
        match self {
            MoveBuilder::Chess(b) => b.legal_targets(legal_moves),
            MoveBuilder::Column(_) => Vec::new(),
        }
    }

    pub fn click(&mut self, state: &GameState, legal_moves: &[String], target: BoardTarget) -> ClickOutcome {
        match (self, state, target) {
            (MoveBuilder::Chess(b), GameState::Chess(fen), BoardTarget::Square(square)) => {
                b.click(fen, legal_moves, square)
            }
            (MoveBuilder::Column(b), GameState::ConnectFour(_), BoardTarget::Column(column)) => {
                b.click(column, legal_moves)
            }
            _ => ClickOutcome::Ignored,
        }
    }
}
