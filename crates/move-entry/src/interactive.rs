//! Driver for playing a live match: routes board clicks through the move
//! builder, submits completed moves, and refreshes from the service.

use tracing::{info, warn};

use replay_core::{GameRegistration, GameRegistry, GameState, GameType, MatchMove};

use crate::builder::{BoardTarget, ClickOutcome, LegalTarget, MoveBuilder, Selection};
use crate::error::{InteractiveError, MatchServiceError};
use crate::service::{LiveMatch, MatchService, MoveSubmission};

pub struct InteractiveMatch<M: MatchService> {
    service: M,
    match_id: String,
    actor_id: String,
    registration: GameRegistration,
    state: GameState,
    legal_moves: Vec<String>,
    moves: Vec<MatchMove>,
    builder: MoveBuilder,
}

impl<M: MatchService> InteractiveMatch<M> {
    pub async fn load(
        registry: &GameRegistry,
        service: M,
        match_id: &str,
        actor_id: &str,
    ) -> Result<Self, InteractiveError> {
        let live = service.fetch_live(match_id).await?;
        let registration = *registry.lookup(&live.game_type)?;
        let state = (registration.details.live_state)(&live.state)
            .ok_or_else(|| InteractiveError::NoLiveState(match_id.to_string()))?;
        let moves = service.fetch_moves(match_id).await?;

        let mut builder = MoveBuilder::for_game(registration.game_type);
        builder.observe(&state);

        info!(match_id, game_type = %registration.game_type, moves = moves.len(), "Loaded live match");

        Ok(Self {
            service,
            match_id: match_id.to_string(),
            actor_id: actor_id.to_string(),
            registration,
            state,
            legal_moves: live.legal_moves,
            moves,
            builder,
        })
    }

    pub fn game_type(&self) -> GameType {
        self.registration.game_type
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn moves(&self) -> &[MatchMove] {
        &self.moves
    }

    pub fn legal_moves(&self) -> &[String] {
        &self.legal_moves
    }

    pub fn is_our_turn(&self) -> bool {
        !self.legal_moves.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.builder.selection()
    }

    pub fn legal_targets(&self) -> Vec<LegalTarget> {
        self.builder.legal_targets(&self.legal_moves)
    }

    /// Handle a board click. A completed legal move is submitted; on success
    /// the live state, move list and legal moves are reloaded. On failure
    /// the error is returned and local state is left as it was.
    pub async fn click(&mut self, target: BoardTarget) -> Result<ClickOutcome, MatchServiceError> {
        let outcome = self.builder.click(&self.state, &self.legal_moves, target);

        if let ClickOutcome::Attempt(attempt) = &outcome {
            let submission = MoveSubmission {
                match_id: self.match_id.clone(),
                actor_id: self.actor_id.clone(),
                encoding: attempt.encoding.clone(),
            };
            if let Err(e) = self.service.submit_move(&submission).await {
                warn!(match_id = %self.match_id, encoding = %attempt.encoding, error = %e, "Move submission failed");
                return Err(e);
            }
            info!(match_id = %self.match_id, encoding = %attempt.encoding, "Move submitted");
            self.refresh().await?;
        }

        Ok(outcome)
    }

    pub async fn refresh(&mut self) -> Result<(), MatchServiceError> {
        let live = self.service.fetch_live(&self.match_id).await?;
        let moves = self.service.fetch_moves(&self.match_id).await?;
        self.apply_live(live);
        self.moves = moves;
        Ok(())
    }

    /// Take in a live-state update pushed from elsewhere (e.g. the opponent
    /// moved). A changed position drops any pending selection.
    pub fn apply_live(&mut self, live: LiveMatch) {
        match (self.registration.details.live_state)(&live.state) {
            Some(state) => {
                self.builder.observe(&state);
                self.state = state;
            }
            None => warn!(match_id = %self.match_id, "Live update carried no board state"),
        }
        self.legal_moves = live.legal_moves;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use replay_core::chess::{legal_moves, STANDARD_START_FEN};
    use serde_json::json;
    use shakmaty::Square;
    use std::sync::Mutex;

    struct FakeService {
        live: Mutex<LiveMatch>,
        submitted: Mutex<Vec<MoveSubmission>>,
        reject: bool,
    }

    impl FakeService {
        fn chess(reject: bool) -> Self {
            Self {
                live: Mutex::new(LiveMatch {
                    game_type: "CHESS".into(),
                    state: json!({ "fen": STANDARD_START_FEN }),
                    legal_moves: legal_moves(STANDARD_START_FEN).unwrap(),
                }),
                submitted: Mutex::new(Vec::new()),
                reject,
            }
        }
    }

    #[async_trait]
    impl MatchService for FakeService {
        async fn fetch_live(&self, _match_id: &str) -> Result<LiveMatch, MatchServiceError> {
            Ok(self.live.lock().unwrap().clone())
        }

        async fn fetch_moves(&self, _match_id: &str) -> Result<Vec<MatchMove>, MatchServiceError> {
            let count = self.submitted.lock().unwrap().len();
            Ok((0..count).map(|i| MatchMove::from_encoding((i % 2) as u8, "e2e4")).collect())
        }

        async fn submit_move(&self, submission: &MoveSubmission) -> Result<(), MatchServiceError> {
            if self.reject {
                return Err(MatchServiceError::Submission("not your turn".into()));
            }
            self.submitted.lock().unwrap().push(submission.clone());
            let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
            *self.live.lock().unwrap() = LiveMatch {
                game_type: "CHESS".into(),
                state: json!({ "fen": fen }),
                legal_moves: Vec::new(),
            };
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_submit_refreshes_live_state() {
        let registry = GameRegistry::with_builtin_games();
        let mut game = InteractiveMatch::load(&registry, FakeService::chess(false), "m1", "alice")
            .await
            .unwrap();
        assert!(game.is_our_turn());

        game.click(BoardTarget::Square(Square::E2)).await.unwrap();
        let outcome = game.click(BoardTarget::Square(Square::E4)).await.unwrap();
        assert!(matches!(outcome, ClickOutcome::Attempt(_)));

        let submitted = game.service.submitted.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].encoding, "e2e4");
        assert_eq!(submitted[0].actor_id, "alice");
        assert_eq!(game.moves().len(), 1);
        assert!(!game.is_our_turn());
        assert!(matches!(game.state(), GameState::Chess(fen) if fen.contains(" b ")));
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_state() {
        let registry = GameRegistry::with_builtin_games();
        let mut game = InteractiveMatch::load(&registry, FakeService::chess(true), "m1", "alice")
            .await
            .unwrap();

        game.click(BoardTarget::Square(Square::E2)).await.unwrap();
        let err = game.click(BoardTarget::Square(Square::E4)).await.unwrap_err();
        assert_eq!(err, MatchServiceError::Submission("not your turn".into()));
        assert_eq!(game.state(), &GameState::Chess(STANDARD_START_FEN.to_string()));
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.selection(), Selection::Idle);
    }

    #[tokio::test]
    async fn test_unknown_game_type() {
        let service = FakeService::chess(false);
        service.live.lock().unwrap().game_type = "GO".into();
        let registry = GameRegistry::with_builtin_games();
        let result = InteractiveMatch::load(&registry, service, "m1", "alice").await;
        assert!(matches!(result, Err(InteractiveError::Registry(_))));
    }
}
