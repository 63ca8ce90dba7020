//! CTF Chess Core - Rules engine and AI
//!
//! This crate provides the core game logic for CTF Chess:
//! - Board geometry (8x8 grid, reversible move deltas)
//! - Piece kinds and movement rules, including the flag-capture override
//! - Game state: flag pickup, interception, return, scoring and round reset
//! - Move scoring heuristics with a vulnerability check
//! - One-ply AI with difficulty windows, a move cache and learned ratings

pub mod board;
pub mod pieces;
pub mod rules;
pub mod game;
pub mod movegen;
pub mod eval;
pub mod ai;
pub mod cache;
pub mod ratings;
pub mod ruleset;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, MoveDelta, Square, BOARD_SIZE};
pub use pieces::{Color, Piece, PieceKind};
pub use rules::{can_move, is_legal_move, RuleOptions};
pub use game::{BaseStation, Flag, FlagEvent, GameState, Move, MoveResult, Score};
pub use movegen::{all_legal_moves, is_legal_for};
pub use eval::{score_move, score_moves, Heuristics, ScoredMove};
pub use ai::{CtfAI, Difficulty};
pub use cache::{position_key, MoveCache};
pub use ratings::PositionRatings;
pub use ruleset::{Layout, RuleSet};
pub use error::{ParseDifficultyError, RuleSetError};
