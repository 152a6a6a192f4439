//! Connect-Four replay.
//!
//! 6 rows x 7 columns, row-major with row 0 at the bottom. Move `i` of the log
//! is played by player `i % 2`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::engine::ReplayEngine;
use crate::error::MoveError;
use crate::match_move::{non_blank, MatchMove};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Player1,
    Player2,
}

impl Cell {
    pub fn for_player(player_index: usize) -> Self {
        if player_index % 2 == 0 {
            Cell::Player1
        } else {
            Cell::Player2
        }
    }

    fn as_char(self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Player1 => '1',
            Cell::Player2 => '2',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Cell::Empty),
            '1' => Some(Cell::Player1),
            '2' => Some(Cell::Player2),
            _ => None,
        }
    }
}

/// Board occupancy. Displays and serializes as the 42-character string the
/// match service uses ('0' empty, '1' first player, '2' second player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectFourBoard {
    cells: [Cell; ROWS * COLS],
}

impl Default for ConnectFourBoard {
    fn default() -> Self {
        Self {
            cells: [Cell::Empty; ROWS * COLS],
        }
    }
}

impl ConnectFourBoard {
    /// Cell at `row` (0 is the bottom) and `col`, or `None` off the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        (row < ROWS && col < COLS).then(|| self.at(row, col))
    }

    /// Cells of `col` from the bottom row up.
    pub fn column(&self, col: usize) -> Option<[Cell; ROWS]> {
        if col >= COLS {
            return None;
        }
        let mut out = [Cell::Empty; ROWS];
        for (row, cell) in out.iter_mut().enumerate() {
            *cell = self.at(row, col);
        }
        Some(out)
    }

    /// Columns off the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= COLS || self.at(ROWS - 1, col) != Cell::Empty
    }

    /// Drop a token into `col`. Returns the row it landed on.
    pub fn drop_token(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::ColumnOutOfRange(col.to_string()));
        }
        let row = (0..ROWS)
            .find(|&row| self.at(row, col) == Cell::Empty)
            .ok_or(MoveError::ColumnFull(col))?;
        self.cells[row * COLS + col] = cell;
        Ok(row)
    }

    fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[row * COLS + col]
    }

    pub fn token_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }
}

impl fmt::Display for ConnectFourBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for ConnectFourBoard {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != ROWS * COLS {
            return Err(MoveError::CorruptState(format!(
                "expected {} cells, got {}",
                ROWS * COLS,
                s.chars().count()
            )));
        }
        let mut board = Self::default();
        for (i, c) in s.chars().enumerate() {
            board.cells[i] = Cell::from_char(c)
                .ok_or_else(|| MoveError::CorruptState(format!("invalid cell '{c}' at {i}")))?;
        }
        Ok(board)
    }
}

impl Serialize for ConnectFourBoard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConnectFourBoard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFourReplayEngine;

impl ReplayEngine for ConnectFourReplayEngine {
    type State = ConnectFourBoard;

    fn initial_state(&self) -> ConnectFourBoard {
        ConnectFourBoard::default()
    }

    fn apply_move(
        &self,
        state: &ConnectFourBoard,
        index: usize,
        mv: &MatchMove,
    ) -> Result<ConnectFourBoard, MoveError> {
        let col = move_column(mv)?;
        let mut board = *state;
        board.drop_token(col, Cell::for_player(index))?;
        Ok(board)
    }
}

/// Column of a drop move, read from `toSquare` and falling back to the
/// notation.
pub fn move_column(mv: &MatchMove) -> Result<usize, MoveError> {
    let raw = non_blank(&mv.to_square)
        .or_else(|| non_blank(&mv.move_notation))
        .ok_or(MoveError::MissingColumn)?;
    let col: usize = raw
        .parse()
        .map_err(|_| MoveError::ColumnOutOfRange(raw.to_string()))?;
    if col >= COLS {
        return Err(MoveError::ColumnOutOfRange(raw.to_string()));
    }
    Ok(col)
}

/// Columns whose top cell is still empty, as the match service encodes them.
pub fn legal_columns(board: &ConnectFourBoard) -> Vec<String> {
    (0..COLS)
        .filter(|&col| !board.is_column_full(col))
        .map(|col| col.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_string() {
        let board = ConnectFourBoard::default();
        assert_eq!(board.to_string(), "0".repeat(42));
        assert_eq!(board.to_string().parse::<ConnectFourBoard>().unwrap(), board);
    }

    #[test]
    fn test_drop_lands_on_lowest_free_row() {
        let mut board = ConnectFourBoard::default();
        assert_eq!(board.drop_token(2, Cell::Player1).unwrap(), 0);
        assert_eq!(board.drop_token(2, Cell::Player2).unwrap(), 1);
        assert_eq!(board.cell(0, 2), Some(Cell::Player1));
        assert_eq!(board.cell(1, 2), Some(Cell::Player2));
        // row-major, row 0 first
        assert_eq!(&board.to_string()[..COLS], "0010000");
        assert_eq!(&board.to_string()[COLS..2 * COLS], "0020000");
    }

    #[test]
    fn test_full_and_out_of_range_columns() {
        let mut board = ConnectFourBoard::default();
        for i in 0..ROWS {
            board.drop_token(6, Cell::for_player(i)).unwrap();
        }
        assert!(board.is_column_full(6));
        assert_eq!(board.drop_token(6, Cell::Player1), Err(MoveError::ColumnFull(6)));
        assert!(matches!(
            board.drop_token(7, Cell::Player1),
            Err(MoveError::ColumnOutOfRange(_))
        ));
        assert_eq!(legal_columns(&board), vec!["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_lookups_off_the_board() {
        let board = ConnectFourBoard::default();
        assert!(board.is_column_full(COLS));
        assert_eq!(board.cell(0, COLS), None);
        assert_eq!(board.cell(ROWS, 0), None);
        assert_eq!(board.column(COLS), None);
        assert_eq!(board.column(0), Some([Cell::Empty; ROWS]));
    }

    #[test]
    fn test_move_column_sources() {
        assert_eq!(move_column(&MatchMove::column(0, 4)).unwrap(), 4);
        assert_eq!(move_column(&MatchMove::notation(0, "5")).unwrap(), 5);
        assert_eq!(move_column(&MatchMove::default()), Err(MoveError::MissingColumn));
        assert!(matches!(
            move_column(&MatchMove::notation(0, "x")),
            Err(MoveError::ColumnOutOfRange(_))
        ));
    }

    #[test]
    fn test_blank_to_square_falls_back_to_notation() {
        let mv = MatchMove {
            to_square: Some(String::new()),
            move_notation: Some("3".into()),
            ..MatchMove::default()
        };
        assert_eq!(move_column(&mv), Ok(3));

        let board = ConnectFourReplayEngine
            .apply_move(&ConnectFourBoard::default(), 0, &mv)
            .unwrap();
        assert_eq!(board.cell(0, 3), Some(Cell::Player1));
    }

    #[test]
    fn test_rejects_malformed_board_string() {
        assert!("012".parse::<ConnectFourBoard>().is_err());
        assert!("3".repeat(42).parse::<ConnectFourBoard>().is_err());
    }
}
