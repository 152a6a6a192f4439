//! The match service collaborator: where moves are submitted and live
//! state is read back from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use replay_core::MatchMove;

use crate::error::MatchServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSubmission {
    pub match_id: String,
    pub actor_id: String,
    pub encoding: String,
}

/// Current state of an in-progress match as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    pub game_type: String,
    pub state: JsonValue,
    /// Moves the acting player may make now. Empty when it is not their turn.
    #[serde(default)]
    pub legal_moves: Vec<String>,
}

#[async_trait]
pub trait MatchService: Send + Sync {
    async fn fetch_live(&self, match_id: &str) -> Result<LiveMatch, MatchServiceError>;

    async fn fetch_moves(&self, match_id: &str) -> Result<Vec<MatchMove>, MatchServiceError>;

    async fn submit_move(&self, submission: &MoveSubmission) -> Result<(), MatchServiceError>;
}
