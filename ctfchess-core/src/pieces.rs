//! Piece definitions

use serde::{Deserialize, Serialize};

/// Side color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index into per-color arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Row delta of one step toward the opponent's back rank
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Back rank row for this color
    pub fn home_row(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row a pawn must reach to promote
    pub fn promotion_row(self) -> i8 {
        self.opponent().home_row()
    }

    pub fn initial(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Turret,
    Flag,
    Guard,
}

/// Kinds a pawn may promote into
pub const PROMOTION_KINDS: [PieceKind; 3] = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook];

impl PieceKind {
    /// Single-letter code used in layouts and position keys
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Turret => 'T',
            PieceKind::Flag => 'F',
            PieceKind::Guard => 'G',
        }
    }

    /// Whether pieces of this kind move on their own
    pub fn is_mobile(self) -> bool {
        !matches!(self, PieceKind::Flag | PieceKind::Guard)
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub immovable: bool,
    pub has_flag: bool,
}

impl Piece {
    /// Build a piece; guards are always immovable
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            immovable: kind == PieceKind::Guard,
            has_flag: false,
        }
    }

    /// A flag token or a piece carrying one
    pub fn holds_flag(&self) -> bool {
        self.kind == PieceKind::Flag || self.has_flag
    }

    /// Unicode glyph for text rendering
    pub fn symbol(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Turret) => '♕',
            (Color::White, PieceKind::Guard) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Turret) => '♛',
            (Color::Black, PieceKind::Guard) => '♚',
            (_, PieceKind::Flag) => '⚑',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_immovable() {
        assert!(Piece::new(PieceKind::Guard, Color::White).immovable);
        assert!(!Piece::new(PieceKind::Rook, Color::White).immovable);
        assert!(!Piece::new(PieceKind::Flag, Color::Black).immovable);
    }

    #[test]
    fn test_letters_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for kind in [
            PieceKind::Pawn,
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Turret,
            PieceKind::Flag,
            PieceKind::Guard,
        ] {
            assert!(kind.letter().is_ascii_uppercase());
            assert!(seen.insert(kind.letter()));
        }
    }

    #[test]
    fn test_directions() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
        assert_eq!(Color::White.promotion_row(), 0);
        assert_eq!(Color::Black.promotion_row(), 7);
    }
}
