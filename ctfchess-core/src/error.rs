//! Error types

use crate::pieces::{Color, PieceKind};

/// A RuleSet that cannot produce a playable layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSetError {
    #[error("{color:?} back rank has no {kind:?}")]
    Missing { color: Color, kind: PieceKind },

    #[error("{color:?} back rank has {count} {kind:?} pieces, expected exactly one")]
    Duplicate {
        color: Color,
        kind: PieceKind,
        count: usize,
    },

    #[error("points_per_return must be at least 1")]
    ZeroPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}' (expected easy, medium, hard or extreme)")]
pub struct ParseDifficultyError(pub String);
