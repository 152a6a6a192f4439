//! Integration tests: playback cursor, autoplay timing and session lifecycle.

mod common;

use std::time::Duration;

use common::{chess_log, column_log};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use replay_core::{registry, ReplayEngine};
use replay_player::{KeyDisposition, PlaybackController, PlayerConfig, ReplayCommand, ReplaySession, ReplaySlot};
use tokio::time;

fn config(speed_ms: u64) -> PlayerConfig {
    PlayerConfig {
        default_speed_ms: speed_ms,
        autoplay_on_open: false,
    }
}

#[test]
fn test_go_to_end_then_toggle_restarts() {
    let engine = registry::global().lookup("CONNECT_FOUR").unwrap().engine;
    let positions = engine.compute_positions(&column_log(&[0, 1, 2, 3, 4]));
    let mut controller = PlaybackController::new(positions, 1000).unwrap();
    assert_eq!(controller.cursor().index, -1);

    assert_eq!(controller.go_to_end().index, 4);
    let cursor = controller.toggle_play();
    assert_eq!(cursor.index, -1);
    assert!(cursor.is_playing);
}

#[tokio::test(start_paused = true)]
async fn test_autoplay_runs_to_end_and_stops() {
    let moves = chess_log(&["e2e4", "e7e5", "g1f3", "b8c6"]);
    let mut session = ReplaySession::open(registry::global(), "CHESS", moves, &config(250)).unwrap();
    let mut updates = session.subscribe();

    session.toggle_play();
    assert!(session.is_autoplay_running());

    time::sleep(Duration::from_millis(4 * 250 + 10)).await;
    let cursor = *updates.borrow_and_update();
    assert_eq!(cursor.index, 3);
    assert!(!cursor.is_playing);
    assert_eq!(session.cursor(), cursor);
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_navigation_until_disabled() {
    let moves = chess_log(&["e2e4", "e7e5", "g1f3"]);
    let mut session = ReplaySession::open(registry::global(), "CHESS", moves, &config(1000)).unwrap();
    assert!(session.is_keyboard_attached());

    let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
    assert_eq!(session.handle_key(&right), KeyDisposition::Consumed(ReplayCommand::Next));
    assert_eq!(session.cursor().index, 0);

    let end = KeyEvent::new(KeyCode::End, KeyModifiers::NONE);
    session.handle_key(&end);
    assert_eq!(session.cursor().index, 2);

    let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    assert_eq!(session.handle_key(&other), KeyDisposition::PassThrough);

    session.set_keyboard_enabled(false);
    let home = KeyEvent::new(KeyCode::Home, KeyModifiers::NONE);
    assert_eq!(session.handle_key(&home), KeyDisposition::PassThrough);
    assert_eq!(session.cursor().index, 2);
}

#[tokio::test(start_paused = true)]
async fn test_close_releases_timer() {
    let moves = chess_log(&["e2e4", "e7e5", "g1f3", "b8c6"]);
    let mut session = ReplaySession::open(registry::global(), "CHESS", moves, &config(250)).unwrap();
    let updates = session.subscribe();

    session.toggle_play();
    time::sleep(Duration::from_millis(260)).await;
    assert_eq!(updates.borrow().index, 0);

    session.close();
    time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(updates.borrow().index, 0);
    assert!(updates.borrow().is_playing);
}

#[tokio::test(start_paused = true)]
async fn test_reopening_resets_cursor() {
    let mut slot = ReplaySlot::new(config(1000));
    let session = slot
        .open(registry::global(), "CONNECT_FOUR", column_log(&[3, 3, 3]))
        .unwrap();
    session.go_to_end();
    session.toggle_play();
    assert!(session.is_autoplay_running());

    let session = slot
        .open(registry::global(), "CONNECT_FOUR", column_log(&[3, 3, 3]))
        .unwrap();
    assert_eq!(session.cursor().index, -1);
    assert!(!session.cursor().is_playing);
    assert!(!session.is_autoplay_running());

    assert!(slot.close());
    assert!(slot.active().is_none());
}

#[test]
fn test_unknown_game_cannot_open() {
    let result = ReplaySession::open(registry::global(), "UNKNOWN_GAME", Vec::new(), &config(1000));
    assert!(result.is_err());
}
