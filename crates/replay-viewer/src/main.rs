//! Replay Viewer
//!
//! Loads a finished match's move log and steps through it in the terminal,
//! driven by the keyboard or autoplay.

mod cli;
mod render;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, ClearType};
use crossterm::{cursor, execute};
use tokio::sync::mpsc;
use tracing::{info, warn};

use replay_core::{registry, MatchMove};
use replay_player::{KeyDisposition, PlayerConfig, ReplaySession, ReplaySlot, SPEED_OPTIONS};

use crate::cli::Cli;

/// Restores the terminal when the viewer exits, including on error.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = PlayerConfig::from_env();
    if let Some(speed) = cli.speed {
        config.default_speed_ms = speed;
    }
    config.autoplay_on_open |= cli.play;

    let raw = std::fs::read_to_string(&cli.moves)
        .with_context(|| format!("reading move log {}", cli.moves.display()))?;
    let moves: Vec<MatchMove> = serde_json::from_str(&raw).context("parsing move log")?;

    let mut slot = ReplaySlot::new(config);
    let session = slot.open(registry::global(), &cli.game, moves)?;
    info!(game_type = %session.game_type(), moves = session.total_moves(), "Opened replay");

    let _guard = RawModeGuard::enable()?;
    run(session).await?;
    slot.close();

    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveToNextLine(1))?;
    Ok(())
}

async fn run(session: &mut ReplaySession) -> anyhow::Result<()> {
    let mut updates = session.subscribe();
    let mut keys = spawn_key_reader();

    draw(session)?;
    loop {
        tokio::select! {
            key = keys.recv() => {
                let Some(key) = key else { break };
                if quits(&key) {
                    break;
                }
                if let Some(speed_ms) = speed_for_key(&key) {
                    session.set_speed(speed_ms);
                } else if let KeyDisposition::PassThrough = session.handle_key(&key) {
                    continue;
                }
                draw(session)?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(session)?;
            }
        }
    }
    Ok(())
}

fn quits(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
}

/// Digit keys pick an entry from the speed options, in order.
fn speed_for_key(key: &KeyEvent) -> Option<u64> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let slot = c.to_digit(10)?.checked_sub(1)? as usize;
    SPEED_OPTIONS.get(slot).map(|(ms, _)| *ms)
}

/// Terminal events are read on a blocking thread and forwarded until the
/// receiver goes away.
fn spawn_key_reader() -> mpsc::Receiver<KeyEvent> {
    let (tx, rx) = mpsc::channel(32);
    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.blocking_send(key).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to read terminal event");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Failed to poll terminal events");
                break;
            }
        }
    });
    rx
}

fn draw(session: &ReplaySession) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
    for line in render::render_frame(&session.frame()) {
        write!(stdout, "{line}\r\n")?;
    }
    stdout.flush()
}
