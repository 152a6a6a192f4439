//! A replay session: one open replay view with its cursor, autoplay timer
//! and keyboard listener.
//!
//! Opening a session attaches the keyboard listener; closing or dropping it
//! releases the timer and detaches the listener on every exit path.

use std::sync::{Arc, Mutex};

use crossterm::event::KeyEvent;
use serde::Serialize;
use tokio::sync::watch;

use replay_core::{
    GamePosition, GameRegistration, GameRegistry, GameState, GameType, Highlight, MatchMove, ReplayEngine,
};

use crate::autoplay::{self, lock, AutoplayHandle, SharedController};
use crate::config::PlayerConfig;
use crate::controller::{speed_label, PlaybackController, PlaybackCursor};
use crate::error::PlayerError;
use crate::keyboard::{KeyDisposition, KeyboardRouter, ReplayCommand};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveListEntry {
    pub index: usize,
    pub label: String,
    pub is_current: bool,
    pub failed: bool,
}

/// Everything a view needs to draw the current replay step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayFrame {
    pub game_type: GameType,
    pub index: isize,
    pub total_moves: usize,
    pub progress: String,
    pub state: GameState,
    pub caption: Option<String>,
    pub highlight: Option<Highlight>,
    /// Why the shown move could not be replayed, if it could not.
    pub fault: Option<String>,
    pub is_playing: bool,
    pub speed_ms: u64,
    pub speed_label: Option<&'static str>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub move_list: Vec<MoveListEntry>,
}

pub struct ReplaySession {
    registration: GameRegistration,
    moves: Vec<MatchMove>,
    controller: SharedController<GameState>,
    updates: watch::Sender<PlaybackCursor>,
    autoplay: Option<AutoplayHandle<GameState>>,
    keyboard: KeyboardRouter,
}

impl ReplaySession {
    pub fn open(
        registry: &GameRegistry,
        game_type: &str,
        moves: Vec<MatchMove>,
        config: &PlayerConfig,
    ) -> Result<Self, PlayerError> {
        let registration = *registry.lookup(game_type)?;
        let positions = registration.engine.compute_positions(&moves);
        let controller = PlaybackController::new(positions, config.default_speed_ms)
            .ok_or(PlayerError::EmptyReplay(registration.game_type))?;
        let (updates, _) = watch::channel(controller.cursor());

        let mut keyboard = KeyboardRouter::new();
        keyboard.attach();

        tracing::info!(
            game_type = %registration.game_type,
            moves = moves.len(),
            "Replay session opened"
        );

        let mut session = Self {
            registration,
            moves,
            controller: Arc::new(Mutex::new(controller)),
            updates,
            autoplay: None,
            keyboard,
        };
        if config.autoplay_on_open {
            session.toggle_play();
        }
        Ok(session)
    }

    pub fn game_type(&self) -> GameType {
        self.registration.game_type
    }

    pub fn moves(&self) -> &[MatchMove] {
        &self.moves
    }

    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn cursor(&self) -> PlaybackCursor {
        lock(&self.controller).cursor()
    }

    /// Cursor changes, including the ones made by the autoplay timer.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackCursor> {
        self.updates.subscribe()
    }

    pub fn current_position(&self) -> GamePosition<GameState> {
        lock(&self.controller).current_position().clone()
    }

    pub fn positions(&self) -> Vec<GamePosition<GameState>> {
        lock(&self.controller).positions().to_vec()
    }

    pub fn is_autoplay_running(&self) -> bool {
        self.autoplay.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn go_to_start(&mut self) -> PlaybackCursor {
        self.update(PlaybackController::go_to_start)
    }

    pub fn go_to_end(&mut self) -> PlaybackCursor {
        self.update(PlaybackController::go_to_end)
    }

    pub fn go_to_previous(&mut self) -> PlaybackCursor {
        self.update(PlaybackController::go_to_previous)
    }

    pub fn go_to_next(&mut self) -> PlaybackCursor {
        self.update(PlaybackController::go_to_next)
    }

    pub fn toggle_play(&mut self) -> PlaybackCursor {
        self.update(PlaybackController::toggle_play)
    }

    pub fn set_speed(&mut self, speed_ms: u64) -> PlaybackCursor {
        self.update(|c| c.set_speed(speed_ms))
    }

    pub fn select_move(&mut self, index: isize) -> PlaybackCursor {
        self.update(|c| c.select_move(index))
    }

    pub fn run(&mut self, command: ReplayCommand) -> PlaybackCursor {
        match command {
            ReplayCommand::Previous => self.go_to_previous(),
            ReplayCommand::Next => self.go_to_next(),
            ReplayCommand::Start => self.go_to_start(),
            ReplayCommand::End => self.go_to_end(),
            ReplayCommand::TogglePlay => self.toggle_play(),
        }
    }

    /// Route a key event; bound keys run their command and are consumed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        let disposition = self.keyboard.route(event);
        if let KeyDisposition::Consumed(command) = disposition {
            self.run(command);
        }
        disposition
    }

    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard.set_enabled(enabled);
    }

    pub fn is_keyboard_attached(&self) -> bool {
        self.keyboard.is_attached()
    }

    /// Fold newly arrived moves into the session. Earlier positions are kept
    /// as computed.
    pub fn append_moves(&mut self, new_moves: &[MatchMove]) -> PlaybackCursor {
        self.moves.extend_from_slice(new_moves);
        let engine = self.registration.engine;
        let moves = &self.moves;
        let cursor = {
            let mut controller = lock(&self.controller);
            engine.extend_positions(controller.positions_mut(), moves);
            controller.cursor()
        };
        tracing::debug!(added = new_moves.len(), total = self.moves.len(), "Moves appended to replay");
        self.publish(cursor);
        cursor
    }

    pub fn frame(&self) -> ReplayFrame {
        let controller = lock(&self.controller);
        let cursor = controller.cursor();
        let position = controller.current_position();
        let replay = self.registration.replay;

        let move_list = self
            .moves
            .iter()
            .enumerate()
            .map(|(i, mv)| MoveListEntry {
                index: i,
                label: (replay.move_label)(i, mv),
                is_current: i as isize == cursor.index,
                failed: controller
                    .positions()
                    .get(i + 1)
                    .is_some_and(|p| p.fault.is_some()),
            })
            .collect();

        ReplayFrame {
            game_type: self.registration.game_type,
            index: cursor.index,
            total_moves: controller.total_moves(),
            progress: format!("Move {} of {}", cursor.index + 1, controller.total_moves()),
            state: position.state.clone(),
            caption: position.mv.as_ref().map(|mv| (replay.move_caption)(mv)),
            highlight: position.mv.as_ref().and_then(|mv| (replay.highlight)(mv)),
            fault: position.fault.as_ref().map(|e| e.to_string()),
            is_playing: cursor.is_playing,
            speed_ms: cursor.speed_ms,
            speed_label: speed_label(cursor.speed_ms),
            can_go_back: !controller.is_at_start(),
            can_go_forward: !controller.is_at_end(),
            move_list,
        }
    }

    /// Close the view, releasing the timer and the keyboard listener.
    pub fn close(self) {}

    fn update(
        &mut self,
        op: impl FnOnce(&mut PlaybackController<GameState>) -> PlaybackCursor,
    ) -> PlaybackCursor {
        let cursor = op(&mut lock(&self.controller));
        self.publish(cursor);
        self.sync_autoplay(cursor);
        cursor
    }

    fn publish(&self, cursor: PlaybackCursor) {
        self.updates.send_replace(cursor);
    }

    /// Keep exactly one timer alive while playing, restarting it when the
    /// speed changes.
    fn sync_autoplay(&mut self, cursor: PlaybackCursor) {
        if !cursor.is_playing {
            self.autoplay = None;
            return;
        }
        let current = self
            .autoplay
            .as_ref()
            .is_some_and(|h| h.speed_ms() == cursor.speed_ms && !h.is_finished());
        if current {
            return;
        }
        self.autoplay = None;
        self.autoplay = autoplay::spawn(&self.controller, self.updates.clone(), cursor.speed_ms);
        if self.autoplay.is_none() {
            let cursor = lock(&self.controller).set_playing(false);
            self.publish(cursor);
        }
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        self.autoplay = None;
        self.keyboard.detach();
        tracing::info!(game_type = %self.registration.game_type, "Replay session closed");
    }
}

/// Holds at most one open replay session. Opening a new one closes the
/// previous session first.
#[derive(Default)]
pub struct ReplaySlot {
    config: PlayerConfig,
    active: Option<ReplaySession>,
}

impl ReplaySlot {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config, active: None }
    }

    pub fn open(
        &mut self,
        registry: &GameRegistry,
        game_type: &str,
        moves: Vec<MatchMove>,
    ) -> Result<&mut ReplaySession, PlayerError> {
        self.close();
        let session = ReplaySession::open(registry, game_type, moves, &self.config)?;
        Ok(self.active.insert(session))
    }

    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn active(&self) -> Option<&ReplaySession> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ReplaySession> {
        self.active.as_mut()
    }
}
