//! Match command - AI vs AI over many games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use ctfchess_core::{Color, CtfAI, Difficulty, GameState, Heuristics, RuleSet, Score};

use crate::config::{create_rng, RuleSetArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// White AI difficulty
    #[arg(long, default_value = "medium")]
    pub white: Difficulty,

    /// Black AI difficulty
    #[arg(long, default_value = "medium")]
    pub black: Difficulty,

    /// Points needed to win a game
    #[arg(long, default_value = "1")]
    pub first_to: u32,

    /// Moves (both sides) before a game is called a draw
    #[arg(long, default_value = "300")]
    pub max_moves: usize,

    /// Play games one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub rules: RuleSetArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
enum GameOutcome {
    WhiteWins,
    BlackWins,
    Draw,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    outcome: GameOutcome,
    score: Score,
    rounds: u32,
    moves: usize,
    /// Ended because the side to move had no legal move
    stalemate: bool,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    avg_moves: f32,
}

/// Everything a worker needs to play one game
struct GameSettings<'a> {
    ruleset: &'a RuleSet,
    white: Difficulty,
    black: Difficulty,
    first_to: u32,
    max_moves: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the ruleset
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let ruleset = args.rules.load()?;

    tracing::info!(
        "Starting match: {} vs {} on '{}' ({} games, first to {})",
        args.white,
        args.black,
        ruleset.name,
        args.games,
        args.first_to
    );

    let results = play_match(&ruleset, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(ruleset: &RuleSet, args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let base_seed: u64 = create_rng(seed).gen();
    let settings = GameSettings {
        ruleset,
        white: args.white,
        black: args.black,
        first_to: args.first_to,
        max_moves: args.max_moves,
    };

    let play = |index: usize| -> Result<GameRecord> {
        let record = play_single_game(&settings, index + 1, base_seed.wrapping_add(index as u64))?;
        tracing::info!(
            "Game {}: {:?} ({}-{}, {} moves)",
            record.game_number,
            record.outcome,
            record.score.white,
            record.score.black,
            record.moves
        );
        Ok(record)
    };

    let games = if args.sequential {
        (0..args.games).map(play).collect::<Result<Vec<_>>>()?
    } else {
        (0..args.games).into_par_iter().map(play).collect::<Result<Vec<_>>>()?
    };

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to `first_to` points or `max_moves`
fn play_single_game(settings: &GameSettings, game_number: usize, seed: u64) -> Result<GameRecord> {
    let mut state = GameState::with_ruleset(settings.ruleset.clone(), seed)?;
    let mut white = CtfAI::with_seed(settings.white, Heuristics::default(), seed ^ 0x5748_4954);
    let mut black = CtfAI::with_seed(settings.black, Heuristics::default(), seed ^ 0x424c_4143);

    let mut moves = 0;
    let mut stalemate = false;

    while moves < settings.max_moves && !reached(state.score(), settings.first_to) {
        let ai = match state.current_player() {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        if ai.play_move(&mut state).is_none() {
            stalemate = true;
            break;
        }
        moves += 1;
    }

    let score = state.score();
    Ok(GameRecord {
        game_number,
        outcome: decide(score, settings.first_to),
        score,
        rounds: state.round,
        moves,
        stalemate,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |o: GameOutcome| games.iter().filter(|g| g.outcome == o).count();
    let white_wins = count(GameOutcome::WhiteWins);
    let black_wins = count(GameOutcome::BlackWins);
    let draws = count(GameOutcome::Draw);

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        white_wins,
        black_wins,
        draws,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn reached(score: Score, first_to: u32) -> bool {
    score.white >= first_to || score.black >= first_to
}

/// Winner by target score; anything short of it is a draw
fn decide(score: Score, first_to: u32) -> GameOutcome {
    if score.white >= first_to && score.white > score.black {
        GameOutcome::WhiteWins
    } else if score.black >= first_to && score.black > score.white {
        GameOutcome::BlackWins
    } else {
        GameOutcome::Draw
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(Serialize)]
    struct JsonGame {
        game_number: usize,
        outcome: GameOutcome,
        score: Score,
        rounds: u32,
        moves: usize,
        stalemate: bool,
    }

    #[derive(Serialize)]
    struct JsonOutput {
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        avg_moves: f32,
        white_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        white_win_rate: percent(results.white_wins, total) / 100.0,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                outcome: g.outcome,
                score: g.score,
                rounds: g.rounds,
                moves: g.moves,
                stalemate: g.stalemate,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        percent(results.white_wins, total)
    );
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        let note = if game.stalemate { " (stalemate)" } else { "" };
        println!(
            "  Game {}: {:?} {}-{} in {} moves{}",
            game.game_number, game.outcome, game.score.white, game.score.black, game.moves, note
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_number: usize, outcome: GameOutcome, moves: usize) -> GameRecord {
        GameRecord {
            game_number,
            outcome,
            score: Score::default(),
            rounds: 1,
            moves,
            stalemate: false,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.white_wins, 0);
        assert_eq!(results.black_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, GameOutcome::WhiteWins, 10),
            record(2, GameOutcome::BlackWins, 20),
            record(3, GameOutcome::WhiteWins, 30),
            record(4, GameOutcome::Draw, 40),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.white_wins, 2);
        assert_eq!(results.black_wins, 1);
        assert_eq!(results.draws, 1);
        assert_eq!(results.avg_moves, 25.0);
    }

    #[test]
    fn test_decide() {
        let score = |white, black| Score { white, black };
        assert_eq!(decide(score(1, 0), 1), GameOutcome::WhiteWins);
        assert_eq!(decide(score(0, 2), 2), GameOutcome::BlackWins);
        assert_eq!(decide(score(1, 1), 2), GameOutcome::Draw);
        assert_eq!(decide(score(0, 0), 1), GameOutcome::Draw);
    }

    #[test]
    fn test_single_game_is_deterministic() {
        let ruleset = RuleSet::default();
        let settings = GameSettings {
            ruleset: &ruleset,
            white: Difficulty::Hard,
            black: Difficulty::Easy,
            first_to: 1,
            max_moves: 60,
        };
        let a = play_single_game(&settings, 1, 99).unwrap();
        let b = play_single_game(&settings, 1, 99).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.score, b.score);
        assert!(a.moves <= 60);
    }

    #[test]
    fn test_game_stops_at_target() {
        let ruleset = RuleSet::default();
        let settings = GameSettings {
            ruleset: &ruleset,
            white: Difficulty::Extreme,
            black: Difficulty::Extreme,
            first_to: 1,
            max_moves: 500,
        };
        let game = play_single_game(&settings, 1, 7).unwrap();
        if game.outcome != GameOutcome::Draw {
            assert_eq!(game.score.white.max(game.score.black), 1);
            assert_eq!(game.rounds, 2);
        }
    }
}
