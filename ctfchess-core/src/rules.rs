//! Movement rules
//!
//! Legality is a pure function of the board and a few rule options:
//! - the flag-capture override lets any mover land on the enemy flag or an
//!   enemy flag-carrier regardless of geometry
//! - a flag-carrier may enter its own base station even though its guard stands there
//! - guards and flag tokens never move, and guards are never captured

use crate::board::{Board, Square, DIRECTIONS, KNIGHT_DELTAS};
use crate::game::GameState;
use crate::pieces::{Piece, PieceKind};

/// Rule options that affect legality
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleOptions {
    /// Pawns may step backward
    pub pawn_retreat: bool,
    /// Base station square of each color
    pub bases: [Square; 2],
}

/// Check a move for the side to move. Malformed input is simply illegal.
pub fn is_legal_move(state: &GameState, from: Square, to: Square) -> bool {
    match state.board().get(from) {
        Some(piece) if piece.color == state.current_player() => {
            can_move(state.board(), state.rule_options(), from, to)
        }
        _ => false,
    }
}

/// Check whether the piece on `from` could move to `to`, whoever's turn it is
pub fn can_move(board: &Board, opts: &RuleOptions, from: Square, to: Square) -> bool {
    if !from.is_valid() || !to.is_valid() || from == to {
        return false;
    }

    let piece = match board.get(from) {
        Some(p) => p,
        None => return false,
    };

    if piece.immovable || !piece.kind.is_mobile() {
        return false;
    }

    // Carrier walking into its own base: the guard there does not block
    if piece.has_flag && to == opts.bases[piece.color.index()] {
        return follows_geometry(board, opts, &piece, from, to, None, true);
    }

    let target = board.get(to);
    if let Some(occupant) = target {
        if occupant.color == piece.color || occupant.immovable {
            return false;
        }
        if occupant.holds_flag() {
            return true;
        }
    }

    follows_geometry(board, opts, &piece, from, to, target, false)
}

fn follows_geometry(
    board: &Board,
    opts: &RuleOptions,
    piece: &Piece,
    from: Square,
    to: Square,
    target: Option<Piece>,
    entering_base: bool,
) -> bool {
    match piece.kind {
        PieceKind::Pawn => pawn_move(opts, piece, from, to, target, entering_base),
        PieceKind::Rook => rook_move(board, from, to),
        PieceKind::Knight => knight_move(from, to),
        PieceKind::Bishop => bishop_move(board, from, to),
        PieceKind::Turret => turret_move(from, to),
        PieceKind::Flag | PieceKind::Guard => false,
    }
}

/// One row forward (or backward when allowed). Straight steps need an empty
/// square, diagonal steps need an enemy to capture.
fn pawn_move(
    opts: &RuleOptions,
    piece: &Piece,
    from: Square,
    to: Square,
    target: Option<Piece>,
    entering_base: bool,
) -> bool {
    let drow = to.row - from.row;
    let dcol = (to.col - from.col).abs();
    if drow.abs() != 1 || dcol > 1 {
        return false;
    }

    let retreating = drow != piece.color.forward();
    if retreating && !opts.pawn_retreat && !piece.has_flag {
        return false;
    }

    if entering_base {
        return true;
    }

    match (dcol, target) {
        (0, None) => true,
        (1, Some(victim)) => victim.color != piece.color,
        _ => false,
    }
}

fn rook_move(board: &Board, from: Square, to: Square) -> bool {
    (from.row == to.row || from.col == to.col) && board.path_clear(from, to)
}

fn knight_move(from: Square, to: Square) -> bool {
    KNIGHT_DELTAS.contains(&(to.row - from.row, to.col - from.col))
}

fn bishop_move(board: &Board, from: Square, to: Square) -> bool {
    (to.row - from.row).abs() == (to.col - from.col).abs() && board.path_clear(from, to)
}

/// Exactly one king step
fn turret_move(from: Square, to: Square) -> bool {
    DIRECTIONS.contains(&(to.row - from.row, to.col - from.col))
}
