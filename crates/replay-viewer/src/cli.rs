//! Command-line arguments for the replay viewer.

use std::path::PathBuf;

use clap::Parser;

/// Step through a finished match's move log in the terminal
#[derive(Parser, Debug)]
#[command(name = "replay-viewer")]
#[command(version)]
pub struct Cli {
    /// Game type of the match (CHESS, CONNECT_FOUR)
    #[arg(short, long)]
    pub game: String,

    /// JSON file holding the match's move log (array of moves)
    #[arg(short, long)]
    pub moves: PathBuf,

    /// Autoplay interval in milliseconds (overrides REPLAY_SPEED_MS)
    #[arg(short, long)]
    pub speed: Option<u64>,

    /// Start playing immediately
    #[arg(short, long)]
    pub play: bool,
}
