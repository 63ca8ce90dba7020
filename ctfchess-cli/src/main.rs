//! CTF Chess CLI - Command-line interface
//!
//! Commands:
//! - play: Human vs AI in the terminal
//! - match: AI vs AI over many games
//! - suggest: Ranked moves for a fresh round

mod config;
mod match_cmd;
mod play;
mod suggest;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ctfchess")]
#[command(about = "Capture-the-flag chess against a heuristic AI")]
struct Cli {
    /// Random seed for board setup and AI choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the AI
    Play(play::PlayArgs),
    /// Pit two AIs against each other
    Match(match_cmd::MatchArgs),
    /// Show the AI's top moves for the opening position
    Suggest(suggest::SuggestArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Suggest(args) => suggest::run(args, cli.seed),
    }
}
