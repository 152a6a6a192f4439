//! Integration tests: click-driven move entry against a fake match service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use move_entry::{
    BoardTarget, ClickOutcome, InteractiveMatch, LiveMatch, MatchService, MatchServiceError, MoveSubmission,
    Selection,
};
use replay_core::chess::{legal_moves, STANDARD_START_FEN};
use replay_core::connect_four::{legal_columns, Cell, ConnectFourBoard};
use replay_core::{registry, GameState, MatchMove};
use serde_json::json;
use shakmaty::Square;

/// Counts submissions and serves a fixed live state.
struct CountingService {
    live: Mutex<LiveMatch>,
    submissions: AtomicUsize,
}

impl CountingService {
    fn new(live: LiveMatch) -> Self {
        Self {
            live: Mutex::new(live),
            submissions: AtomicUsize::new(0),
        }
    }

    fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<'a> MatchService for &'a CountingService {
    async fn fetch_live(&self, _match_id: &str) -> Result<LiveMatch, MatchServiceError> {
        Ok(self.live.lock().unwrap().clone())
    }

    async fn fetch_moves(&self, _match_id: &str) -> Result<Vec<MatchMove>, MatchServiceError> {
        Ok(Vec::new())
    }

    async fn submit_move(&self, _submission: &MoveSubmission) -> Result<(), MatchServiceError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn chess_live() -> LiveMatch {
    LiveMatch {
        game_type: "CHESS".into(),
        state: json!({ "fen": STANDARD_START_FEN }),
        legal_moves: legal_moves(STANDARD_START_FEN).unwrap(),
    }
}

#[tokio::test]
async fn test_illegal_target_rejected_without_submission() {
    let service = CountingService::new(chess_live());
    let mut game = InteractiveMatch::load(registry::global(), &service, "match-1", "white")
        .await
        .unwrap();

    let outcome = game.click(BoardTarget::Square(Square::E2)).await.unwrap();
    assert_eq!(outcome, ClickOutcome::Selected(Square::E2));
    assert_eq!(game.selection(), Selection::Selected(Square::E2));

    let outcome = game.click(BoardTarget::Square(Square::E5)).await.unwrap();
    assert!(matches!(outcome, ClickOutcome::Rejected(_)));
    assert_eq!(game.selection(), Selection::Idle);
    assert_eq!(service.submissions(), 0);
}

#[tokio::test]
async fn test_legal_move_submitted_once() {
    let service = CountingService::new(chess_live());
    let mut game = InteractiveMatch::load(registry::global(), &service, "match-1", "white")
        .await
        .unwrap();

    game.click(BoardTarget::Square(Square::G1)).await.unwrap();
    let targets: Vec<Square> = game.legal_targets().iter().map(|t| t.to).collect();
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&Square::F3));

    let outcome = game.click(BoardTarget::Square(Square::F3)).await.unwrap();
    assert!(matches!(outcome, ClickOutcome::Attempt(ref a) if a.encoding == "g1f3"));
    assert_eq!(service.submissions(), 1);
}

#[tokio::test]
async fn test_full_column_rejected() {
    let mut board = ConnectFourBoard::default();
    for i in 0..6 {
        board.drop_token(3, Cell::for_player(i)).unwrap();
    }
    let service = CountingService::new(LiveMatch {
        game_type: "CONNECT_FOUR".into(),
        state: json!({ "board": board.to_string() }),
        legal_moves: legal_columns(&board),
    });
    let mut game = InteractiveMatch::load(registry::global(), &service, "match-2", "red")
        .await
        .unwrap();
    assert!(matches!(game.state(), GameState::ConnectFour(_)));

    match game.click(BoardTarget::Column(3)).await.unwrap() {
        ClickOutcome::Rejected(e) => assert_eq!(e.reason, "This column is full"),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(service.submissions(), 0);

    game.click(BoardTarget::Column(4)).await.unwrap();
    assert_eq!(service.submissions(), 1);
}
