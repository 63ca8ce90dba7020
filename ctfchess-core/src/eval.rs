//! Move evaluation
//!
//! A move's score is an additive sum of independent terms. All distances are
//! Manhattan. The flag-capture bonus is sized to outweigh every other term
//! combined, and the flag-return pull outweighs every positional term.

use crate::board::{Board, Square};
use crate::game::{take_flag, GameState, Move};
use crate::pieces::{Color, PieceKind};
use crate::ratings::PositionRatings;
use crate::rules::can_move;
use serde::{Deserialize, Serialize};

/// Largest Manhattan distance on the board
const MAX_DISTANCE: f32 = 14.0;

/// Largest Manhattan distance to a center square
const MAX_CENTER_DISTANCE: f32 = 6.0;

/// Rows a piece can advance in one move
const MAX_ADVANCE: f32 = 7.0;

/// Distance from its own flag at which the Turret guard term changes sign
const GUARD_RADIUS: f32 = 7.0;

/// Heuristic weights for move scoring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Material value per piece kind, indexed by `PieceKind as usize`
    pub piece_values: [f32; 7],
    /// Landing on the enemy flag or an enemy carrier
    pub flag_capture_bonus: f32,
    /// Per-square pull toward the enemy flag
    pub flag_approach_weight: f32,
    /// Per-square pull toward the home base while carrying
    pub flag_return_weight: f32,
    /// Per-row reward for moving toward the enemy side
    pub advance_weight: f32,
    /// Per-square reward for closeness to the center
    pub center_weight: f32,
    /// Per-square pull of a Turret toward its own flag
    pub flag_guard_weight: f32,
    /// Learned ratings are clamped to +-this
    pub rating_cap: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        let mut values = [0.0f32; 7];
        values[PieceKind::Pawn as usize] = 10.0;
        values[PieceKind::Knight as usize] = 30.0;
        values[PieceKind::Bishop as usize] = 30.0;
        values[PieceKind::Rook as usize] = 50.0;
        values[PieceKind::Turret as usize] = 60.0;
        values[PieceKind::Flag as usize] = 1000.0;
        values[PieceKind::Guard as usize] = 0.0;

        Self {
            piece_values: values,
            flag_capture_bonus: 100_000.0,
            flag_approach_weight: 20.0,
            flag_return_weight: 500.0,
            advance_weight: 2.0,
            center_weight: 1.0,
            flag_guard_weight: 5.0,
            rating_cap: 100.0,
        }
    }
}

impl Heuristics {
    pub fn piece_value(&self, kind: PieceKind) -> f32 {
        self.piece_values[kind as usize]
    }

    /// Upper bound on the combined magnitude of every term except the flag-capture bonus
    pub fn max_quiet_magnitude(&self) -> f32 {
        let max_value = self.piece_values.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        self.flag_approach_weight.abs() * MAX_DISTANCE
            + self.flag_return_weight.abs() * MAX_DISTANCE
            + max_value // capture
            + max_value // vulnerability
            + self.advance_weight.abs() * MAX_ADVANCE
            + self.center_weight.abs() * MAX_CENTER_DISTANCE
            + self.flag_guard_weight.abs() * GUARD_RADIUS
            + self.rating_cap.abs()
    }
}

/// A move with its heuristic score
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f32,
}

/// Score a single move
pub fn score_move(state: &GameState, mv: Move, heuristics: &Heuristics) -> f32 {
    let mut scratch = *state.board();
    score_on(state, &mut scratch, mv, heuristics, None)
}

/// Score a batch of moves, sharing one scratch board
pub fn score_moves(
    state: &GameState,
    moves: &[Move],
    heuristics: &Heuristics,
    ratings: Option<&PositionRatings>,
) -> Vec<ScoredMove> {
    let mut scratch = *state.board();
    moves
        .iter()
        .map(|&mv| ScoredMove {
            mv,
            score: score_on(state, &mut scratch, mv, heuristics, ratings),
        })
        .collect()
}

/// Sort best-first; ties keep enumeration order
pub fn sort_by_score(moves: &mut [ScoredMove]) {
    moves.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn score_on(
    state: &GameState,
    scratch: &mut Board,
    mv: Move,
    heuristics: &Heuristics,
    ratings: Option<&PositionRatings>,
) -> f32 {
    if !mv.from.is_valid() || !mv.to.is_valid() {
        return 0.0;
    }
    let mover = match state.get_piece(mv.from) {
        Some(p) => p,
        None => return 0.0,
    };
    let target = state.get_piece(mv.to);
    let me = mover.color;
    let enemy = me.opponent();

    let mut score = 0.0f32;

    // Flag capture
    let grabs_flag = target.is_some_and(|t| t.color == enemy && t.holds_flag());
    if grabs_flag {
        score += heuristics.flag_capture_bonus;
    }

    // Approach the enemy flag while it is still out there
    let enemy_flag = state.flag(enemy);
    if !enemy_flag.captured {
        let distance = mv.to.manhattan_to(enemy_flag.last_seen) as f32;
        score += heuristics.flag_approach_weight * (MAX_DISTANCE - distance);
    }

    // Bring a captured flag home
    if mover.has_flag {
        let base = state.base_station(me).position;
        let distance = mv.to.manhattan_to(base) as f32;
        score += heuristics.flag_return_weight * (MAX_DISTANCE - distance);
    }

    // Material
    if let Some(victim) = target.filter(|t| t.color == enemy) {
        score += heuristics.piece_value(victim.kind);
    }

    // Turrets stay near their own flag
    if mover.kind == PieceKind::Turret {
        let distance = mv.to.manhattan_to(state.flag(me).last_seen) as f32;
        score += heuristics.flag_guard_weight * (GUARD_RADIUS - distance);
    }

    // Hanging pieces
    if is_vulnerable(state, scratch, mv) {
        score -= heuristics.piece_value(mover.kind);
    }

    score += heuristics.advance_weight * advance(me, mv.from, mv.to);
    score += heuristics.center_weight * (MAX_CENTER_DISTANCE - mv.to.distance_to_center() as f32);

    if let Some(ratings) = ratings {
        let cap = heuristics.rating_cap.abs();
        score += ratings.get(mv.to).clamp(-cap, cap);
    }

    score
}

/// Rows gained toward the enemy side (negative when retreating)
fn advance(color: Color, from: Square, to: Square) -> f32 {
    ((to.row - from.row) * color.forward()) as f32
}

/// Can any enemy piece reach `mv.to` once the move is made?
///
/// The move is applied to the scratch board, flag transfer included, and
/// undone before returning.
fn is_vulnerable(state: &GameState, scratch: &mut Board, mv: Move) -> bool {
    let delta = match scratch.make_move(mv.from, mv.to) {
        Some(d) => d,
        None => return false,
    };
    take_flag(scratch, mv.to, delta.captured);

    let enemy = delta.moved.color.opponent();
    let opts = state.rule_options();
    let board: &Board = scratch;
    let threatened = board
        .pieces()
        .any(|(sq, p)| p.color == enemy && can_move(board, opts, sq, mv.to));

    scratch.unmake_move(&delta);
    threatened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::all_legal_moves;
    use crate::pieces::Piece;

    fn place(board: &mut Board, row: i8, col: i8, kind: PieceKind, color: Color) {
        board.set(Square::new(row, col), Some(Piece::new(kind, color)));
    }

    #[test]
    fn test_default_heuristics() {
        let h = Heuristics::default();
        let pawn = h.piece_value(PieceKind::Pawn);
        let knight = h.piece_value(PieceKind::Knight);
        let bishop = h.piece_value(PieceKind::Bishop);
        let rook = h.piece_value(PieceKind::Rook);
        let turret = h.piece_value(PieceKind::Turret);
        let flag = h.piece_value(PieceKind::Flag);
        assert!(pawn < knight && knight == bishop && bishop < rook);
        assert!(rook < turret && turret < flag);
        assert!(h.flag_capture_bonus > 2.0 * h.max_quiet_magnitude());
    }

    #[test]
    fn test_flag_capture_dominates() {
        let game = GameState::new(1);
        let h = Heuristics::default();
        let grab = Move::new(Square::new(6, 0), Square::new(0, 4));
        let quiet = Move::new(Square::new(6, 3), Square::new(5, 3));
        assert!(game.is_legal_move(grab.from, grab.to));
        assert!(game.is_legal_move(quiet.from, quiet.to));

        let gap = score_move(&game, grab, &h) - score_move(&game, quiet, &h);
        assert!(gap > h.max_quiet_magnitude(), "gap {} too small", gap);
    }

    #[test]
    fn test_carrier_heads_home() {
        let mut board = Board::empty();
        place(&mut board, 7, 4, PieceKind::Guard, Color::White);
        let mut rook = Piece::new(PieceKind::Rook, Color::White);
        rook.has_flag = true;
        board.set(Square::new(3, 4), Some(rook));
        let game = GameState::from_position(board, Color::White, 1);
        let h = Heuristics::default();

        let home = score_move(&game, Move::new(Square::new(3, 4), Square::new(6, 4)), &h);
        let away = score_move(&game, Move::new(Square::new(3, 4), Square::new(0, 4)), &h);
        assert!(home > away);
    }

    #[test]
    fn test_capture_rewards_material() {
        let mut board = Board::empty();
        place(&mut board, 4, 0, PieceKind::Rook, Color::White);
        place(&mut board, 4, 7, PieceKind::Rook, Color::Black);
        place(&mut board, 0, 7, PieceKind::Pawn, Color::Black);
        let game = GameState::from_position(board, Color::White, 1);
        let h = Heuristics::default();

        let capture = score_move(&game, Move::new(Square::new(4, 0), Square::new(4, 7)), &h);
        let quiet = score_move(&game, Move::new(Square::new(4, 0), Square::new(4, 6)), &h);
        assert!(capture > quiet);
    }

    #[test]
    fn test_vulnerability_penalty() {
        let mut board = Board::empty();
        place(&mut board, 5, 0, PieceKind::Knight, Color::White);
        place(&mut board, 2, 3, PieceKind::Rook, Color::Black);
        let game = GameState::from_position(board, Color::White, 1);
        let mut scratch = *game.board();

        // Neither square is on the rook's row or file
        let left = Move::new(Square::new(5, 0), Square::new(3, 1));
        let right = Move::new(Square::new(5, 0), Square::new(4, 2));
        assert!(!is_vulnerable(&game, &mut scratch, left));
        assert!(!is_vulnerable(&game, &mut scratch, right));

        let into_file = Move::new(Square::new(5, 0), Square::new(6, 2));
        assert!(!is_vulnerable(&game, &mut scratch, into_file));

        place(&mut board, 7, 3, PieceKind::Pawn, Color::Black);
        let game = GameState::from_position(board, Color::White, 1);
        let mut scratch = *game.board();
        // Black pawn on (7,3) can step back diagonally onto (6,2)
        assert!(is_vulnerable(&game, &mut scratch, into_file));
        assert_eq!(scratch, *game.board());
    }

    #[test]
    fn test_vulnerability_agrees_with_engine() {
        let mut board = Board::empty();
        let mut carrier = Piece::new(PieceKind::Knight, Color::Black);
        carrier.has_flag = true;
        board.set(Square::new(4, 4), Some(carrier));
        place(&mut board, 5, 3, PieceKind::Pawn, Color::White);
        place(&mut board, 7, 0, PieceKind::Rook, Color::White);
        place(&mut board, 7, 4, PieceKind::Guard, Color::White);
        place(&mut board, 0, 0, PieceKind::Rook, Color::Black);
        let game = GameState::from_position(board, Color::White, 1);
        let mut scratch = *game.board();

        for mv in all_legal_moves(&game, Color::White) {
            let mut after = game.clone();
            let result = after.play(mv);
            assert!(result.applied);
            if result.round_reset {
                continue;
            }
            let opts = after.rule_options();
            let reachable = after
                .board()
                .pieces()
                .any(|(sq, p)| p.color == Color::Black && can_move(after.board(), opts, sq, mv.to));
            assert_eq!(is_vulnerable(&game, &mut scratch, mv), reachable, "{}", mv);
        }

        // The pawn that strikes the carrier becomes one, so the far rook can hit it
        let strike = Move::new(Square::new(5, 3), Square::new(4, 4));
        assert!(is_vulnerable(&game, &mut scratch, strike));
        assert_eq!(scratch, *game.board());
    }

    #[test]
    fn test_turret_guards_own_flag() {
        let mut board = Board::empty();
        place(&mut board, 7, 3, PieceKind::Flag, Color::White);
        place(&mut board, 5, 3, PieceKind::Turret, Color::White);
        place(&mut board, 5, 6, PieceKind::Rook, Color::White);
        let game = GameState::from_position(board, Color::White, 1);
        let h = Heuristics::default();
        let unguarded = Heuristics {
            flag_guard_weight: 0.0,
            ..Heuristics::default()
        };
        let gain = |mv: Move| score_move(&game, mv, &h) - score_move(&game, mv, &unguarded);

        let toward = Move::new(Square::new(5, 3), Square::new(6, 3));
        let away = Move::new(Square::new(5, 3), Square::new(4, 3));
        assert_eq!(gain(toward), 30.0);
        assert_eq!(gain(away), 20.0);
        assert!(score_move(&game, toward, &h) > score_move(&game, away, &h));

        // Only Turrets are pulled
        assert_eq!(gain(Move::new(Square::new(5, 6), Square::new(6, 6))), 0.0);
    }

    #[test]
    fn test_off_board_move_scores_zero() {
        let game = GameState::new(1);
        let h = Heuristics::default();
        let far = Square::new(i8::MAX, i8::MIN);
        assert_eq!(score_move(&game, Move::new(Square::new(6, 0), far), &h), 0.0);
        assert_eq!(score_move(&game, Move::new(far, Square::new(5, 0)), &h), 0.0);

        let scored = score_moves(&game, &[Move::new(Square::new(6, 0), far)], &h, None);
        assert_eq!(scored[0].score, 0.0);
    }

    #[test]
    fn test_batch_matches_single() {
        let game = GameState::new(6);
        let h = Heuristics::default();
        let moves = all_legal_moves(&game, Color::White);
        let batch = score_moves(&game, &moves, &h, None);
        for scored in batch {
            assert_eq!(scored.score, score_move(&game, scored.mv, &h));
        }
    }

    #[test]
    fn test_rating_term_is_clamped() {
        let game = GameState::new(1);
        let h = Heuristics::default();
        let mv = Move::new(Square::new(6, 3), Square::new(5, 3));
        let base = score_move(&game, mv, &h);

        let mut ratings = PositionRatings::new();
        ratings.nudge(mv.to, 1.0e9);
        let rated = score_moves(&game, &[mv], &h, Some(&ratings));
        assert_eq!(rated[0].score, base + h.rating_cap);
    }

    #[test]
    fn test_sort_by_score_is_stable() {
        let a = Move::new(Square::new(0, 0), Square::new(1, 0));
        let b = Move::new(Square::new(0, 1), Square::new(1, 1));
        let c = Move::new(Square::new(0, 2), Square::new(1, 2));
        let mut moves = vec![
            ScoredMove { mv: a, score: 1.0 },
            ScoredMove { mv: b, score: 5.0 },
            ScoredMove { mv: c, score: 1.0 },
        ];
        sort_by_score(&mut moves);
        assert_eq!(moves[0].mv, b);
        assert_eq!(moves[1].mv, a);
        assert_eq!(moves[2].mv, c);
    }
}
