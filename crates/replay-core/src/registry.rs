//! Game type registry.
//!
//! Every supported game is a variant of [`GameType`]; the registry maps the
//! match service's game-type tag to the engine and view bindings for it.
//! Unknown tags are a [`RegistryError`], never a panic.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::chess::ChessReplayEngine;
use crate::connect_four::{self, ConnectFourBoard, ConnectFourReplayEngine};
use crate::engine::ReplayEngine;
use crate::error::{MoveError, RegistryError};
use crate::match_move::MatchMove;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GameType {
    #[serde(rename = "CHESS")]
    Chess,
    #[serde(rename = "CONNECT_FOUR")]
    ConnectFour,
}

impl GameType {
    pub const ALL: [GameType; 2] = [GameType::Chess, GameType::ConnectFour];

    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Chess => "CHESS",
            GameType::ConnectFour => "CONNECT_FOUR",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| RegistryError::UnregisteredGameType(s.to_string()))
    }
}

/// Board state of any registered game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GameState {
    /// FEN
    Chess(String),
    ConnectFour(ConnectFourBoard),
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Chess(fen) => f.write_str(fen),
            GameState::ConnectFour(board) => write!(f, "{board}"),
        }
    }
}

/// Closed set of replay engines, dispatched without a runtime type lookup.
#[derive(Debug, Clone, Copy)]
pub enum GameEngine {
    Chess(ChessReplayEngine),
    ConnectFour(ConnectFourReplayEngine),
}

impl GameEngine {
    pub fn for_game(game_type: GameType) -> Self {
        match game_type {
            GameType::Chess => GameEngine::Chess(ChessReplayEngine),
            GameType::ConnectFour => GameEngine::ConnectFour(ConnectFourReplayEngine),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GameEngine::Chess(_) => "chess",
            GameEngine::ConnectFour(_) => "connect-four",
        }
    }
}

impl ReplayEngine for GameEngine {
    type State = GameState;

    fn initial_state(&self) -> GameState {
        match self {
            GameEngine::Chess(e) => GameState::Chess(e.initial_state()),
            GameEngine::ConnectFour(e) => GameState::ConnectFour(e.initial_state()),
        }
    }

    fn apply_move(&self, state: &GameState, index: usize, mv: &MatchMove) -> Result<GameState, MoveError> {
        match (self, state) {
            (GameEngine::Chess(e), GameState::Chess(fen)) => e.apply_move(fen, index, mv).map(GameState::Chess),
            (GameEngine::ConnectFour(e), GameState::ConnectFour(board)) => {
                e.apply_move(board, index, mv).map(GameState::ConnectFour)
            }
            _ => Err(MoveError::StateMismatch(self.name())),
        }
    }
}

/// Squares to highlight for the move being shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Live match details: pulls the current board out of the match-state JSON.
#[derive(Debug, Clone, Copy)]
pub struct DetailsBinding {
    pub live_state: fn(&JsonValue) -> Option<GameState>,
}

/// Replay view: how moves of this game are labelled and highlighted.
#[derive(Debug, Clone, Copy)]
pub struct ReplayBinding {
    /// Entry in the move list for move `index`.
    pub move_label: fn(usize, &MatchMove) -> String,
    /// Description of the move currently shown.
    pub move_caption: fn(&MatchMove) -> String,
    pub highlight: fn(&MatchMove) -> Option<Highlight>,
}

#[derive(Debug, Clone, Copy)]
pub struct GameRegistration {
    pub game_type: GameType,
    pub engine: GameEngine,
    pub details: DetailsBinding,
    pub replay: ReplayBinding,
}

impl GameRegistration {
    pub fn chess() -> Self {
        Self {
            game_type: GameType::Chess,
            engine: GameEngine::for_game(GameType::Chess),
            details: DetailsBinding {
                live_state: chess_live_state,
            },
            replay: ReplayBinding {
                move_label: chess_move_label,
                move_caption: chess_move_caption,
                highlight: chess_highlight,
            },
        }
    }

    pub fn connect_four() -> Self {
        Self {
            game_type: GameType::ConnectFour,
            engine: GameEngine::for_game(GameType::ConnectFour),
            details: DetailsBinding {
                live_state: connect_four_live_state,
            },
            replay: ReplayBinding {
                move_label: connect_four_move_label,
                move_caption: connect_four_move_caption,
                highlight: |_| None,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct GameRegistry {
    entries: HashMap<GameType, GameRegistration>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in game.
    pub fn with_builtin_games() -> Self {
        let mut registry = Self::new();
        registry.register(GameRegistration::chess());
        registry.register(GameRegistration::connect_four());
        registry
    }

    pub fn register(&mut self, registration: GameRegistration) {
        tracing::debug!(game_type = %registration.game_type, "Registered game type");
        self.entries.insert(registration.game_type, registration);
    }

    pub fn lookup(&self, game_type: &str) -> Result<&GameRegistration, RegistryError> {
        game_type
            .parse::<GameType>()
            .ok()
            .and_then(|g| self.entries.get(&g))
            .ok_or_else(|| RegistryError::UnregisteredGameType(game_type.to_string()))
    }

    pub fn is_registered(&self, game_type: &str) -> bool {
        self.lookup(game_type).is_ok()
    }
}

/// Process-wide registry, populated on first use and read-only after.
pub fn global() -> &'static GameRegistry {
    static REGISTRY: OnceLock<GameRegistry> = OnceLock::new();
    REGISTRY.get_or_init(GameRegistry::with_builtin_games)
}

// ---- Chess bindings ----

fn chess_live_state(state: &JsonValue) -> Option<GameState> {
    state
        .get("fen")
        .and_then(JsonValue::as_str)
        .map(|fen| GameState::Chess(fen.to_string()))
}

/// White moves sit on even log indices and carry the move number.
fn chess_move_label(index: usize, mv: &MatchMove) -> String {
    let notation = mv.move_notation.as_deref().unwrap_or("?");
    if index % 2 == 0 {
        format!("{}. {}", index / 2 + 1, notation)
    } else {
        notation.to_string()
    }
}

fn chess_move_caption(mv: &MatchMove) -> String {
    let notation = mv.move_notation.as_deref().unwrap_or("?");
    match (mv.from_square.as_deref(), mv.to_square.as_deref()) {
        (Some(from), Some(to)) => format!("{notation} ({from} → {to})"),
        _ => notation.to_string(),
    }
}

fn chess_highlight(mv: &MatchMove) -> Option<Highlight> {
    if mv.from_square.is_none() && mv.to_square.is_none() {
        return None;
    }
    Some(Highlight {
        from: mv.from_square.as_deref().map(str::to_ascii_lowercase),
        to: mv.to_square.as_deref().map(str::to_ascii_lowercase),
    })
}

// ---- Connect-Four bindings ----

fn connect_four_live_state(state: &JsonValue) -> Option<GameState> {
    state
        .get("board")
        .and_then(JsonValue::as_str)
        .and_then(|board| board.parse().ok())
        .map(GameState::ConnectFour)
}

fn player_name(player_index: u8) -> &'static str {
    if player_index == 0 {
        "Red"
    } else {
        "Yellow"
    }
}

fn connect_four_move_label(index: usize, mv: &MatchMove) -> String {
    let column = connect_four::move_column(mv)
        .map(|c| c.to_string())
        .unwrap_or_else(|_| "?".to_string());
    format!("{}. {} → Col {}", index + 1, player_name(mv.player_index), column)
}

fn connect_four_move_caption(mv: &MatchMove) -> String {
    let column = connect_four::move_column(mv)
        .map(|c| c.to_string())
        .unwrap_or_else(|_| "?".to_string());
    format!("{} → Column {}", player_name(mv.player_index), column)
}
