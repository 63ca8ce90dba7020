//! Board geometry and the 8x8 grid

use crate::pieces::Piece;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board side length
pub const BOARD_SIZE: i8 = 8;

/// The four center squares
pub const CENTER: [Square; 4] = [
    Square::new(3, 3),
    Square::new(3, 4),
    Square::new(4, 3),
    Square::new(4, 4),
];

/// King-step direction vectors (drow, dcol)
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
];

/// Knight jump vectors (drow, dcol)
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Board coordinates, row 0 is Black's back rank
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    pub fn offset(&self, drow: i8, dcol: i8) -> Square {
        Square::new(self.row + drow, self.col + dcol)
    }

    /// L1 distance
    pub fn manhattan_to(&self, other: Square) -> i8 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Manhattan distance to the closest center square
    pub fn distance_to_center(&self) -> i8 {
        CENTER
            .iter()
            .map(|c| self.manhattan_to(*c))
            .min()
            .unwrap_or(0)
    }

    /// All 64 squares in row-major order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }

    /// Parse algebraic notation ("e2"); file a-h is the column, rank 8 is row 0
    pub fn parse(text: &str) -> Option<Square> {
        let mut chars = text.trim().chars();
        let file = chars.next()?.to_ascii_lowercase();
        let rank = chars.next()?.to_digit(10)? as i8;
        if chars.next().is_some() || !('a'..='h').contains(&file) {
            return None;
        }
        let sq = Square::new(BOARD_SIZE - rank, (file as u8 - b'a') as i8);
        sq.is_valid().then_some(sq)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "({},{})", self.row, self.col);
        }
        write!(f, "{}{}", (b'a' + self.col as u8) as char, BOARD_SIZE - self.row)
    }
}

/// A relocation that can be undone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveDelta {
    pub from: Square,
    pub to: Square,
    pub moved: Piece,
    pub captured: Option<Piece>,
}

/// 8x8 grid of optional pieces (copy to snapshot)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Piece at square; off-board squares read as empty
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if !sq.is_valid() {
            return None;
        }
        self.cells[sq.row as usize][sq.col as usize]
    }

    pub fn get_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        if !sq.is_valid() {
            return None;
        }
        self.cells[sq.row as usize][sq.col as usize].as_mut()
    }

    /// Place or clear a square; returns the previous occupant
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        debug_assert!(sq.is_valid(), "write to off-board square {:?}", sq);
        if !sq.is_valid() {
            return None;
        }
        std::mem::replace(&mut self.cells[sq.row as usize][sq.col as usize], piece)
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Occupied squares in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// True when every square strictly between `from` and `to` is empty.
    /// Only meaningful for squares on a shared rank, file or diagonal.
    pub fn path_clear(&self, from: Square, to: Square) -> bool {
        let drow = (to.row - from.row).signum();
        let dcol = (to.col - from.col).signum();
        let mut current = from.offset(drow, dcol);
        while current != to {
            if !current.is_valid() || !self.is_empty(current) {
                return false;
            }
            current = current.offset(drow, dcol);
        }
        true
    }

    /// Relocate a piece, capturing whatever stands on `to`
    pub fn make_move(&mut self, from: Square, to: Square) -> Option<MoveDelta> {
        if !from.is_valid() || !to.is_valid() || from == to {
            return None;
        }
        let moved = self.set(from, None)?;
        let captured = self.set(to, Some(moved));
        Some(MoveDelta {
            from,
            to,
            moved,
            captured,
        })
    }

    /// Reverse a delta produced by `make_move`
    pub fn unmake_move(&mut self, delta: &MoveDelta) {
        self.set(delta.to, delta.captured);
        self.set(delta.from, Some(delta.moved));
    }

    /// Count pieces matching a predicate
    pub fn count(&self, pred: impl Fn(&Piece) -> bool) -> usize {
        self.pieces().filter(|(_, p)| pred(p)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Color, PieceKind};

    #[test]
    fn test_square_validity() {
        assert!(Square::new(0, 0).is_valid());
        assert!(Square::new(7, 7).is_valid());
        assert!(!Square::new(8, 0).is_valid());
        assert!(!Square::new(0, -1).is_valid());
    }

    #[test]
    fn test_distance() {
        let a = Square::new(0, 0);
        let b = Square::new(3, 5);
        assert_eq!(a.manhattan_to(b), 8);
        assert_eq!(Square::new(3, 4).distance_to_center(), 0);
        assert_eq!(Square::new(0, 0).distance_to_center(), 6);
    }

    #[test]
    fn test_algebraic() {
        assert_eq!(Square::parse("a8"), Some(Square::new(0, 0)));
        assert_eq!(Square::parse("e2"), Some(Square::new(6, 4)));
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::new(6, 4).to_string(), "e2");
    }

    #[test]
    fn test_make_unmake() {
        let mut board = Board::empty();
        let rook = Piece::new(PieceKind::Rook, Color::White);
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);
        board.set(Square::new(7, 0), Some(rook));
        board.set(Square::new(2, 0), Some(pawn));
        let before = board;

        let delta = board.make_move(Square::new(7, 0), Square::new(2, 0)).unwrap();
        assert_eq!(delta.captured, Some(pawn));
        assert!(board.is_empty(Square::new(7, 0)));

        board.unmake_move(&delta);
        assert_eq!(board, before);
    }

    #[test]
    fn test_path_clear() {
        let mut board = Board::empty();
        assert!(board.path_clear(Square::new(0, 0), Square::new(7, 7)));
        board.set(Square::new(3, 3), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert!(!board.path_clear(Square::new(0, 0), Square::new(7, 7)));
        assert!(board.path_clear(Square::new(0, 0), Square::new(3, 3)));
    }
}
