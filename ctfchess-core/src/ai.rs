//! One-ply heuristic AI
//!
//! Moves are scored by the evaluator, sorted best-first and picked at random
//! from a window at the top whose width depends on difficulty.

use crate::cache::{position_key, MoveCache};
use crate::error::ParseDifficultyError;
use crate::eval::{score_moves, sort_by_score, Heuristics, ScoredMove};
use crate::game::{GameState, Move, MoveResult};
use crate::movegen::{all_legal_moves, is_legal_for};
use crate::pieces::Color;
use crate::ratings::PositionRatings;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default step size for the position-rating learning hook
pub const DEFAULT_LEARNING_RATE: f32 = 0.1;

// ============================================================================
// DIFFICULTY
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    /// How many of the best moves are candidates
    pub fn window(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 3,
            Difficulty::Hard => 2,
            Difficulty::Extreme => 1,
        }
    }

    /// One tier up; Extreme stays Extreme
    pub fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard | Difficulty::Extreme => Difficulty::Extreme,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

// ============================================================================
// CTF AI
// ============================================================================

/// Heuristic AI player
pub struct CtfAI {
    pub difficulty: Difficulty,
    pub heuristics: Heuristics,
    pub learning_rate: f32,
    ratings: PositionRatings,
    cache: MoveCache,
    rng: ChaCha8Rng,
}

impl CtfAI {
    pub fn new(difficulty: Difficulty, heuristics: Heuristics) -> Self {
        Self::with_seed(difficulty, heuristics, 42)
    }

    pub fn with_seed(difficulty: Difficulty, heuristics: Heuristics, seed: u64) -> Self {
        Self {
            difficulty,
            heuristics,
            learning_rate: DEFAULT_LEARNING_RATE,
            ratings: PositionRatings::new(),
            cache: MoveCache::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Start from a previously learned ratings table
    pub fn with_ratings(mut self, ratings: PositionRatings) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn ratings(&self) -> &PositionRatings {
        &self.ratings
    }

    pub fn into_ratings(self) -> PositionRatings {
        self.ratings
    }

    /// Difficulty actually used for `color`: one tier harder once it holds the enemy flag
    pub fn effective_difficulty(&self, state: &GameState, color: Color) -> Difficulty {
        if state.flag(color.opponent()).captured {
            self.difficulty.harder()
        } else {
            self.difficulty
        }
    }

    /// Pick a move for `color`. None when it has no legal move.
    pub fn choose_move(&mut self, state: &GameState, color: Color) -> Option<Move> {
        let key = position_key(state.board(), color);

        let cached = self
            .cache
            .best_for(&key)
            .filter(|c| is_legal_for(state, color, c.mv))
            .map(|c| ScoredMove {
                mv: c.mv,
                score: c.score,
            });

        let chosen = match cached {
            Some(hit) => hit,
            None => {
                let moves = all_legal_moves(state, color);
                if moves.is_empty() {
                    return None;
                }
                let mut scored = score_moves(state, &moves, &self.heuristics, Some(&self.ratings));
                sort_by_score(&mut scored);

                let window = self
                    .effective_difficulty(state, color)
                    .window()
                    .min(scored.len());
                let pick = scored[self.rng.gen_range(0..window)];
                self.cache.add(key, pick.mv, pick.score);
                pick
            }
        };

        self.ratings
            .nudge(chosen.mv.to, self.learning_rate * chosen.score);
        Some(chosen.mv)
    }

    /// Best `k` moves for the side to move, best first. Touches nothing.
    pub fn suggest(&self, state: &GameState, k: usize) -> Vec<ScoredMove> {
        let moves = state.legal_moves();
        let mut scored = score_moves(state, &moves, &self.heuristics, Some(&self.ratings));
        sort_by_score(&mut scored);
        scored.truncate(k);
        scored
    }

    /// Choose and apply a move for the side to move
    pub fn play_move(&mut self, state: &mut GameState) -> Option<(Move, MoveResult)> {
        let mv = self.choose_move(state, state.current_player())?;
        let result = state.play(mv);
        Some((mv, result))
    }
}

// ============================================================================
// TESTS
// ============================================================================
