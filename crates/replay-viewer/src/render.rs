//! Plain-text rendering of replay frames.

use replay_core::connect_four::{Cell, COLS, ROWS};
use replay_core::GameState;
use replay_player::{ReplayFrame, SPEED_OPTIONS};

pub fn render_frame(frame: &ReplayFrame) -> Vec<String> {
    let mut lines = vec![format!("{} replay  {}", frame.game_type, frame.progress)];
    lines.push(String::new());
    lines.extend(render_board(&frame.state));
    lines.push(String::new());

    if let Some(caption) = &frame.caption {
        lines.push(caption.clone());
    }
    if let Some(fault) = &frame.fault {
        lines.push(format!("! move could not be applied: {fault}"));
    }

    let speed = frame.speed_label.unwrap_or("custom");
    let state = if frame.is_playing { "playing" } else { "paused" };
    lines.push(format!("[{state}] speed {speed}"));

    let current = frame
        .move_list
        .iter()
        .position(|e| e.is_current)
        .unwrap_or(0);
    let start = current.saturating_sub(4);
    for entry in frame.move_list.iter().skip(start).take(9) {
        let marker = if entry.is_current { ">" } else { " " };
        let failed = if entry.failed { " (x)" } else { "" };
        lines.push(format!("{marker} {}{failed}", entry.label));
    }

    lines.push(String::new());
    let speeds: Vec<&str> = SPEED_OPTIONS.iter().map(|(_, label)| *label).collect();
    lines.push(format!(
        "<-/-> step  Home/End jump  Space play/pause  1-{} speed ({})  q quit",
        SPEED_OPTIONS.len(),
        speeds.join(" ")
    ));
    lines
}

fn render_board(state: &GameState) -> Vec<String> {
    match state {
        GameState::Chess(fen) => {
            let placement = fen.split_whitespace().next().unwrap_or_default();
            let mut lines: Vec<String> = placement
                .split('/')
                .zip((1..=8).rev())
                .map(|(rank, n)| {
                    let mut row = format!("{n} ");
                    for c in rank.chars() {
                        match c.to_digit(10) {
                            Some(empty) => (0..empty).for_each(|_| row.push_str(". ")),
                            None => {
                                row.push(c);
                                row.push(' ');
                            }
                        }
                    }
                    row.trim_end().to_string()
                })
                .collect();
            lines.push("  a b c d e f g h".to_string());
            lines
        }
        GameState::ConnectFour(board) => {
            let mut lines: Vec<String> = (0..ROWS)
                .rev()
                .map(|row| {
                    let cells: Vec<&str> = (0..COLS)
                        .map(|col| match board.cell(row, col) {
                            Some(Cell::Player1) => "R",
                            Some(Cell::Player2) => "Y",
                            _ => ".",
                        })
                        .collect();
                    format!("|{}|", cells.join(" "))
                })
                .collect();
            let labels: Vec<String> = (0..COLS).map(|c| c.to_string()).collect();
            lines.push(format!(" {} ", labels.join(" ")));
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::connect_four::ConnectFourBoard;

    #[test]
    fn test_chess_board_rows() {
        let lines = render_board(&GameState::Chess(replay_core::chess::STANDARD_START_FEN.into()));
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[4], "4 . . . . . . . .");
    }

    #[test]
    fn test_connect_four_bottom_row_last() {
        let mut board = ConnectFourBoard::default();
        board.drop_token(3, Cell::Player1).unwrap();
        let lines = render_board(&GameState::ConnectFour(board));
        assert_eq!(lines[ROWS - 1], "|. . . R . . .|");
        assert_eq!(lines[0], "|. . . . . . .|");
    }
}
