//! Suggest command - ranked moves for the opening position of a round

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rand::Rng;
use serde::Serialize;

use ctfchess_core::{CtfAI, Difficulty, GameState, Heuristics, ScoredMove};

use crate::config::{create_rng, load_ratings, RuleSetArgs};

#[derive(Args)]
pub struct SuggestArgs {
    /// Number of moves to show
    #[arg(long, default_value = "5")]
    pub top: usize,

    /// Ask for Black's moves after a White opening move
    #[arg(long)]
    pub black: bool,

    /// Learned ratings JSON to include in the scores
    #[arg(long, value_name = "FILE")]
    pub ratings: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub rules: RuleSetArgs,
}

pub fn run(args: SuggestArgs, seed: Option<u64>) -> Result<()> {
    let mut rng = create_rng(seed);
    let mut game = GameState::with_ruleset(args.rules.load()?, rng.gen())?;
    let ratings = args.ratings.as_deref().map(load_ratings).unwrap_or_default();
    let mut ai = CtfAI::with_seed(Difficulty::Extreme, Heuristics::default(), rng.gen())
        .with_ratings(ratings);

    if args.black {
        if let Some((mv, _)) = ai.play_move(&mut game) {
            tracing::info!("White opened with {}", mv);
        }
    }

    let top = ai.suggest(&game, args.top);
    if args.json {
        print_json(&game, &top)?;
    } else {
        println!("Top moves for {:?}:", game.current_player());
        for (i, s) in top.iter().enumerate() {
            println!("  {:>2}. {:<6} {:>10.1}", i + 1, s.mv.to_string(), s.score);
        }
    }
    Ok(())
}

fn print_json(game: &GameState, top: &[ScoredMove]) -> Result<()> {
    #[derive(Serialize)]
    struct JsonMove {
        mv: String,
        score: f32,
    }

    #[derive(Serialize)]
    struct JsonOutput {
        side: String,
        moves: Vec<JsonMove>,
    }

    let output = JsonOutput {
        side: format!("{:?}", game.current_player()),
        moves: top
            .iter()
            .map(|s| JsonMove {
                mv: s.mv.to_string(),
                score: s.score,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
