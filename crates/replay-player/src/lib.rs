//! Replay playback: cursor navigation, autoplay and keyboard shortcuts over
//! the positions computed by `replay-core`.

pub mod autoplay;
pub mod config;
pub mod controller;
pub mod error;
pub mod keyboard;
pub mod session;

pub use config::PlayerConfig;
pub use controller::{PlaybackController, PlaybackCursor, DEFAULT_SPEED_MS, SPEED_OPTIONS};
pub use error::PlayerError;
pub use keyboard::{KeyDisposition, KeyboardRouter, ReplayCommand};
pub use session::{MoveListEntry, ReplayFrame, ReplaySession, ReplaySlot};
