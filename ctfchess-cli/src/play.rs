//! Play command - human vs AI in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), game_loop(), finish()
//! - Level 3: human_turn(), ai_turn(), Selection::select()
//! - Level 4: rendering and input utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::Rng;

use ctfchess_core::{
    Color, CtfAI, Difficulty, FlagEvent, GameState, Heuristics, MoveResult, Square, BOARD_SIZE,
};

use crate::config::{create_rng, load_ratings, save_ratings, RuleSetArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// AI difficulty: easy, medium, hard or extreme
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Play as Black (the AI opens)
    #[arg(long)]
    pub black: bool,

    /// Stop once either side reaches this score
    #[arg(long, default_value = "3")]
    pub first_to: u32,

    /// Learned ratings JSON; read at start, written on exit
    #[arg(long, value_name = "FILE")]
    pub ratings: Option<PathBuf>,

    #[command(flatten)]
    pub rules: RuleSetArgs,
}

// ============================================================================
// SELECTION (caller-local two-step input)
// ============================================================================

/// Where the human is in picking a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    AwaitingPiece,
    AwaitingDestination(Square),
}

/// What a click-equivalent did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SelectOutcome {
    /// Own piece picked up
    Picked(Square),
    /// Selection cleared without moving
    Cleared,
    /// Destination rejected; selection cleared
    Rejected,
    /// Move applied
    Moved(MoveResult),
}

impl Selection {
    /// Feed one square into the selection
    fn select(self, state: &mut GameState, sq: Square) -> (Selection, SelectOutcome) {
        match self {
            Selection::AwaitingPiece => {
                let own = state
                    .get_piece(sq)
                    .is_some_and(|p| p.color == state.current_player());
                if own {
                    (Selection::AwaitingDestination(sq), SelectOutcome::Picked(sq))
                } else {
                    (Selection::AwaitingPiece, SelectOutcome::Rejected)
                }
            }
            Selection::AwaitingDestination(from) if from == sq => {
                (Selection::AwaitingPiece, SelectOutcome::Cleared)
            }
            Selection::AwaitingDestination(from) => {
                let result = state.apply_move(from, sq);
                if result.applied {
                    (Selection::AwaitingPiece, SelectOutcome::Moved(result))
                } else {
                    (Selection::AwaitingPiece, SelectOutcome::Rejected)
                }
            }
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let (mut game, mut ai) = setup_game(&args, seed)?;
    let human = if args.black { Color::Black } else { Color::White };

    tracing::info!(
        "New game: you are {:?}, AI is {} ({})",
        human,
        ai.difficulty,
        game.ruleset().name
    );

    game_loop(&mut game, &mut ai, human, args.first_to)?;
    finish(&game, ai, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn setup_game(args: &PlayArgs, seed: Option<u64>) -> Result<(GameState, CtfAI)> {
    let ruleset = args.rules.load()?;
    let mut rng = create_rng(seed);
    let game = GameState::with_ruleset(ruleset, rng.gen())?;

    let ratings = args.ratings.as_deref().map(load_ratings).unwrap_or_default();
    let ai = CtfAI::with_seed(args.difficulty, Heuristics::default(), rng.gen()).with_ratings(ratings);
    Ok((game, ai))
}

fn game_loop(game: &mut GameState, ai: &mut CtfAI, human: Color, first_to: u32) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let score = game.score();
        if score.white >= first_to || score.black >= first_to {
            return Ok(());
        }

        if game.current_player() == human {
            print!("{}", render(game));
            if !human_turn(game, ai, &mut input)? {
                return Ok(());
            }
        } else if !ai_turn(game, ai) {
            println!("{:?} has no legal moves. Draw.", game.current_player());
            return Ok(());
        }
    }
}

fn finish(game: &GameState, ai: CtfAI, args: &PlayArgs) -> Result<()> {
    let score = game.score();
    println!(
        "\nFinal score: White {} - Black {} after {} round(s)",
        score.white, score.black, game.round
    );
    if let Some(path) = &args.ratings {
        save_ratings(path, &ai.into_ratings())?;
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One human move. Returns false when the player quits.
fn human_turn(game: &mut GameState, ai: &CtfAI, input: &mut impl BufRead) -> Result<bool> {
    if game.legal_moves().is_empty() {
        println!("You have no legal moves. Draw.");
        return Ok(false);
    }

    let mut selection = Selection::AwaitingPiece;
    loop {
        let prompt = match selection {
            Selection::AwaitingPiece => "piece".to_string(),
            Selection::AwaitingDestination(from) => format!("{} to", from),
        };
        let line = match read_line(input, &prompt)? {
            Some(line) => line,
            None => return Ok(false),
        };

        match line.as_str() {
            "quit" | "q" => return Ok(false),
            "hint" | "?" => {
                for (i, s) in ai.suggest(game, 3).iter().enumerate() {
                    println!("  {}. {} ({:.0})", i + 1, s.mv, s.score);
                }
                continue;
            }
            _ => {}
        }

        let sq = match Square::parse(&line) {
            Some(sq) => sq,
            None => {
                println!("Enter a square like e2, 'hint' or 'quit'");
                continue;
            }
        };

        let (next, outcome) = selection.select(game, sq);
        selection = next;
        match outcome {
            SelectOutcome::Picked(_) | SelectOutcome::Cleared => {}
            SelectOutcome::Rejected => println!("Illegal selection"),
            SelectOutcome::Moved(result) => {
                report(game, just_moved(game), result);
                return Ok(true);
            }
        }
    }
}

/// One AI move. Returns false when the AI has nothing to play.
fn ai_turn(game: &mut GameState, ai: &mut CtfAI) -> bool {
    let mover = game.current_player();
    match ai.play_move(game) {
        Some((mv, result)) => {
            println!("AI plays {}", mv);
            report(game, mover, result);
            true
        }
        None => false,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// The side that just moved
fn just_moved(game: &GameState) -> Color {
    game.current_player().opponent()
}

fn report(game: &GameState, mover: Color, result: MoveResult) {
    if let Some(kind) = result.promoted {
        println!("{:?} pawn promoted to {:?}", mover, kind);
    }
    match result.flag_event {
        Some(FlagEvent::Captured) => println!("{:?} has taken the flag!", mover),
        Some(FlagEvent::Intercepted) => println!("{:?} took the flag off the carrier", mover),
        Some(FlagEvent::Returned) => {
            let score = game.score();
            println!(
                "{:?} scores! White {} - Black {}. Round {} begins.",
                mover, score.white, score.black, game.round
            );
        }
        None => {}
    }
}

fn read_line(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{}> ", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read input")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

/// Text board, rank 8 at the top
fn render(game: &GameState) -> String {
    let mut out = String::new();
    let score = game.score();
    out.push_str(&format!(
        "\nRound {}  White {} - Black {}  {:?} to move\n",
        game.round,
        score.white,
        score.black,
        game.current_player()
    ));

    for row in 0..BOARD_SIZE {
        out.push_str(&format!("{} ", BOARD_SIZE - row));
        for col in 0..BOARD_SIZE {
            let sq = Square::new(row, col);
            let cell = match game.get_piece(sq) {
                Some(p) if p.has_flag => format!("{}*", p.symbol()),
                Some(p) => format!("{} ", p.symbol()),
                None => ". ".to_string(),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");
    out
}

// ============================================================================
// TESTS
// ============================================================================
