#![allow(dead_code)]

use std::cell::RefCell;

use replay_core::{FaultReporter, MatchMove, MoveError};

/// Coordinate moves alternating players 0 and 1.
pub fn chess_log(encodings: &[&str]) -> Vec<MatchMove> {
    encodings
        .iter()
        .enumerate()
        .map(|(i, enc)| MatchMove::from_encoding((i % 2) as u8, enc))
        .collect()
}

/// Column drops recorded as notation only, alternating players 0 and 1.
pub fn column_log(columns: &[usize]) -> Vec<MatchMove> {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| MatchMove::notation((i % 2) as u8, &col.to_string()))
        .collect()
}

/// Collects every failed move instead of logging it.
#[derive(Default)]
pub struct RecordingReporter {
    pub failures: RefCell<Vec<(usize, MoveError)>>,
}

impl FaultReporter for RecordingReporter {
    fn move_failed(&self, index: usize, _mv: &MatchMove, error: &MoveError) {
        self.failures.borrow_mut().push((index, error.clone()));
    }
}
