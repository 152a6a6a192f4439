use thiserror::Error;

use replay_core::{GameType, RegistryError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Replay for {0} produced no initial position")]
    EmptyReplay(GameType),
}
