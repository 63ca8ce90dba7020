//! Move enumeration
//!
//! Exhaustive 64x64 scan: every origin holding a piece of the requested color
//! is paired with every destination and kept when the rules allow it. Order is
//! row-major origin, then row-major destination.

use crate::board::Square;
use crate::game::{GameState, Move};
use crate::pieces::Color;
use crate::rules::can_move;

/// All legal moves for `color` in the current position
pub fn all_legal_moves(state: &GameState, color: Color) -> Vec<Move> {
    let board = state.board();
    let opts = state.rule_options();
    let mut moves = Vec::new();

    for (from, piece) in board.pieces() {
        if piece.color != color {
            continue;
        }
        for to in Square::all() {
            if can_move(board, opts, from, to) {
                moves.push(Move::new(from, to));
            }
        }
    }

    moves
}

/// Check a move for `color`, whoever is to move
pub fn is_legal_for(state: &GameState, color: Color, mv: Move) -> bool {
    state.get_piece(mv.from).is_some_and(|p| p.color == color)
        && can_move(state.board(), state.rule_options(), mv.from, mv.to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::pieces::{Piece, PieceKind};

    #[test]
    fn test_opening_moves() {
        let game = GameState::new(1);
        let moves = all_legal_moves(&game, Color::White);
        assert!(!moves.is_empty());
        // Any White piece may grab the Black flag from the start
        let flag = Square::new(0, 4);
        let grabs = moves.iter().filter(|m| m.to == flag).count();
        let movers = game
            .board()
            .pieces()
            .filter(|(_, p)| p.color == Color::White && !p.immovable && p.kind.is_mobile())
            .count();
        assert_eq!(grabs, movers);
    }

    #[test]
    fn test_matches_legality_exactly() {
        let game = GameState::new(4);
        let moves = all_legal_moves(&game, game.current_player());
        for from in Square::all() {
            for to in Square::all() {
                let legal = game.is_legal_move(from, to);
                let count = moves.iter().filter(|m| **m == Move::new(from, to)).count();
                assert_eq!(count, usize::from(legal), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_row_major_order() {
        let game = GameState::new(2);
        let moves = all_legal_moves(&game, Color::White);
        let keys: Vec<_> = moves
            .iter()
            .map(|m| (m.from.row, m.from.col, m.to.row, m.to.col))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_stalemate_empty() {
        // Only guards and a flag: nothing can move
        let mut board = Board::empty();
        board.set(Square::new(0, 3), Some(Piece::new(PieceKind::Guard, Color::Black)));
        board.set(Square::new(0, 4), Some(Piece::new(PieceKind::Flag, Color::Black)));
        board.set(Square::new(7, 4), Some(Piece::new(PieceKind::Guard, Color::White)));
        let game = GameState::from_position(board, Color::Black, 1);
        assert!(all_legal_moves(&game, Color::Black).is_empty());
    }

    #[test]
    fn test_is_legal_for_other_side() {
        let game = GameState::new(1);
        // Black pawn step is legal for Black even on White's turn
        let mv = Move::new(Square::new(1, 0), Square::new(2, 0));
        assert!(is_legal_for(&game, Color::Black, mv));
        assert!(!is_legal_for(&game, Color::White, mv));
        assert!(!game.is_legal_move(mv.from, mv.to));
    }
}
