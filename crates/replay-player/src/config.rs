//! Player configuration from environment variables

use std::env;

use crate::controller::DEFAULT_SPEED_MS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Milliseconds per autoplay step when a session opens
    pub default_speed_ms: u64,

    /// Start autoplay as soon as a session opens
    pub autoplay_on_open: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_speed_ms: DEFAULT_SPEED_MS,
            autoplay_on_open: false,
        }
    }
}

impl PlayerConfig {
    pub fn from_env() -> Self {
        let default_speed_ms = env::var("REPLAY_SPEED_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SPEED_MS);

        let autoplay_on_open = env::var("REPLAY_AUTOPLAY")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            default_speed_ms,
            autoplay_on_open,
        }
    }
}
