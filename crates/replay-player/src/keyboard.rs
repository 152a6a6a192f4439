//! Keyboard shortcuts for replay navigation.
//!
//! - Left: previous move
//! - Right: next move
//! - Home: go to start
//! - End: go to end
//! - Space: toggle play/pause

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayCommand {
    Previous,
    Next,
    Start,
    End,
    TogglePlay,
}

impl ReplayCommand {
    pub fn for_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(ReplayCommand::Previous),
            KeyCode::Right => Some(ReplayCommand::Next),
            KeyCode::Home => Some(ReplayCommand::Start),
            KeyCode::End => Some(ReplayCommand::End),
            KeyCode::Char(' ') => Some(ReplayCommand::TogglePlay),
            _ => None,
        }
    }
}

/// What the view should do with a key event after routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Bound key: run the command and suppress the key's default action.
    Consumed(ReplayCommand),
    /// Not ours; let the default action happen.
    PassThrough,
}

/// Routes key events to replay commands while attached.
#[derive(Debug, Default)]
pub struct KeyboardRouter {
    attached: bool,
}

impl KeyboardRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the listener. Attaching twice keeps a single listener.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        tracing::debug!("Replay keyboard listener attached");
        true
    }

    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;
        tracing::debug!("Replay keyboard listener detached");
        true
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.attach();
        } else {
            self.detach();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn route(&self, event: &KeyEvent) -> KeyDisposition {
        if !self.attached || event.kind == KeyEventKind::Release {
            return KeyDisposition::PassThrough;
        }
        match ReplayCommand::for_key(event.code) {
            Some(command) => KeyDisposition::Consumed(command),
            None => KeyDisposition::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_bindings() {
        let mut router = KeyboardRouter::new();
        router.attach();
        assert_eq!(router.route(&press(KeyCode::Left)), KeyDisposition::Consumed(ReplayCommand::Previous));
        assert_eq!(router.route(&press(KeyCode::Right)), KeyDisposition::Consumed(ReplayCommand::Next));
        assert_eq!(router.route(&press(KeyCode::Home)), KeyDisposition::Consumed(ReplayCommand::Start));
        assert_eq!(router.route(&press(KeyCode::End)), KeyDisposition::Consumed(ReplayCommand::End));
        assert_eq!(
            router.route(&press(KeyCode::Char(' '))),
            KeyDisposition::Consumed(ReplayCommand::TogglePlay)
        );
        assert_eq!(router.route(&press(KeyCode::Char('x'))), KeyDisposition::PassThrough);
        assert_eq!(router.route(&press(KeyCode::Enter)), KeyDisposition::PassThrough);
    }

    #[test]
    fn test_detached_router_passes_everything_through() {
        let mut router = KeyboardRouter::new();
        assert_eq!(router.route(&press(KeyCode::Left)), KeyDisposition::PassThrough);

        router.attach();
        router.detach();
        assert!(!router.is_attached());
        assert_eq!(router.route(&press(KeyCode::Right)), KeyDisposition::PassThrough);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut router = KeyboardRouter::new();
        assert!(router.attach());
        assert!(!router.attach());
        assert!(router.detach());
        assert!(!router.detach());
    }

    #[test]
    fn test_release_events_ignored_repeat_routed() {
        let mut router = KeyboardRouter::new();
        router.attach();
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Right,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(router.route(&release), KeyDisposition::PassThrough);

        let repeat = KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(router.route(&repeat), KeyDisposition::Consumed(ReplayCommand::Next));
    }
}
