//! Playback cursor over a position sequence.

use serde::Serialize;

use replay_core::GamePosition;

/// Speeds offered by the standard controls: (ms per step, label).
pub const SPEED_OPTIONS: [(u64, &str); 4] = [(2000, "0.5x"), (1000, "1x"), (500, "2x"), (250, "4x")];

pub const DEFAULT_SPEED_MS: u64 = 1000;

/// `index` is -1 for the initial position and `k` for the position after
/// move `k`, so it always lies in `[-1, N - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackCursor {
    pub index: isize,
    pub is_playing: bool,
    pub speed_ms: u64,
}

impl PlaybackCursor {
    pub fn new(speed_ms: u64) -> Self {
        Self {
            index: -1,
            is_playing: false,
            speed_ms,
        }
    }
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_MS)
    }
}

/// Label for a speed from [`SPEED_OPTIONS`], if it is one of them.
pub fn speed_label(speed_ms: u64) -> Option<&'static str> {
    SPEED_OPTIONS
        .iter()
        .find(|(ms, _)| *ms == speed_ms)
        .map(|(_, label)| *label)
}

pub struct PlaybackController<S> {
    positions: Vec<GamePosition<S>>,
    cursor: PlaybackCursor,
}

impl<S> PlaybackController<S> {
    /// `positions` must hold the initial position; an empty sequence is
    /// rejected by returning `None`.
    pub fn new(positions: Vec<GamePosition<S>>, speed_ms: u64) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        Some(Self {
            positions,
            cursor: PlaybackCursor::new(speed_ms),
        })
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn total_moves(&self) -> usize {
        self.positions.len() - 1
    }

    fn last_index(&self) -> isize {
        self.total_moves() as isize - 1
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor.index <= -1
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.index >= self.last_index()
    }

    pub fn positions(&self) -> &[GamePosition<S>] {
        &self.positions
    }

    pub fn current_position(&self) -> &GamePosition<S> {
        &self.positions[(self.cursor.index + 1) as usize]
    }

    pub fn go_to_start(&mut self) -> PlaybackCursor {
        self.cursor.index = -1;
        self.cursor.is_playing = false;
        self.cursor
    }

    pub fn go_to_end(&mut self) -> PlaybackCursor {
        self.cursor.index = self.last_index();
        self.cursor.is_playing = false;
        self.cursor
    }

    pub fn go_to_previous(&mut self) -> PlaybackCursor {
        self.cursor.index = (self.cursor.index - 1).max(-1);
        self.cursor
    }

    pub fn go_to_next(&mut self) -> PlaybackCursor {
        self.cursor.index = (self.cursor.index + 1).min(self.last_index());
        self.cursor
    }

    /// At (or past) the end, playback restarts from the initial position.
    pub fn toggle_play(&mut self) -> PlaybackCursor {
        if self.is_at_end() {
            self.cursor.index = -1;
        }
        self.cursor.is_playing = !self.cursor.is_playing;
        self.cursor
    }

    pub fn set_playing(&mut self, playing: bool) -> PlaybackCursor {
        self.cursor.is_playing = playing;
        self.cursor
    }

    /// Any value is accepted; only [`SPEED_OPTIONS`] are offered by the UI.
    pub fn set_speed(&mut self, speed_ms: u64) -> PlaybackCursor {
        self.cursor.speed_ms = speed_ms;
        self.cursor
    }

    /// Jump to move `index` (clamped) and stop autoplay.
    pub fn select_move(&mut self, index: isize) -> PlaybackCursor {
        self.cursor.index = index.clamp(-1, self.last_index());
        self.cursor.is_playing = false;
        self.cursor
    }

    pub(crate) fn positions_mut(&mut self) -> &mut Vec<GamePosition<S>> {
        &mut self.positions
    }
}
