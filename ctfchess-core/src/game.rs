//! Game state and move application

use crate::board::{Board, Square};
use crate::error::RuleSetError;
use crate::movegen;
use crate::pieces::{Color, Piece, PieceKind, PROMOTION_KINDS};
use crate::rules::{self, RuleOptions};
use crate::ruleset::{Layout, RuleSet};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A move from one square to another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// A side's own flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub color: Color,
    pub home: Square,
    /// Square of the flag token, None while carried
    pub position: Option<Square>,
    /// Last square the token was seen on
    pub last_seen: Square,
    pub captured: bool,
}

impl Flag {
    fn at_home(color: Color, home: Square) -> Self {
        Self {
            color,
            home,
            position: Some(home),
            last_seen: home,
            captured: false,
        }
    }
}

/// Square a flag-carrier must reach to score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStation {
    pub color: Color,
    pub position: Square,
}

/// Match score; survives round resets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub white: u32,
    pub black: u32,
}

impl Score {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn add(&mut self, color: Color, points: u32) {
        match color {
            Color::White => self.white += points,
            Color::Black => self.black += points,
        }
    }
}

/// What happened to a flag during a move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagEvent {
    /// Mover picked up the enemy flag
    Captured,
    /// Mover took down an enemy carrier and now carries the flag it held
    Intercepted,
    /// Mover carried the enemy flag into its base and scored
    Returned,
}

/// Outcome of `apply_move`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveResult {
    pub applied: bool,
    pub captured: Option<Piece>,
    pub flag_event: Option<FlagEvent>,
    pub promoted: Option<PieceKind>,
    pub round_reset: bool,
}

impl MoveResult {
    fn rejected() -> Self {
        Self::default()
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state; mutated only through `apply_move`
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    current_player: Color,
    flags: [Flag; 2],
    bases: [BaseStation; 2],
    score: Score,
    /// Round number, starting at 1; increments on every flag return
    pub round: u32,
    ruleset: RuleSet,
    layout: Layout,
    options: RuleOptions,
    rng: ChaCha8Rng,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard game, White to move
    pub fn new(seed: u64) -> Self {
        Self::build(RuleSet::default(), Layout::standard(), seed)
    }

    /// Game from a custom ruleset
    pub fn with_ruleset(ruleset: RuleSet, seed: u64) -> Result<Self, RuleSetError> {
        let layout = ruleset.layout()?;
        Ok(Self::build(ruleset, layout, seed))
    }

    /// Arbitrary position under the standard ruleset.
    ///
    /// Flag records are derived from the board: a flag whose token is missing
    /// counts as captured when an enemy piece carries it.
    pub fn from_position(board: Board, to_move: Color, seed: u64) -> Self {
        let mut state = Self::new(seed);
        state.board = board;
        state.current_player = to_move;

        for color in [Color::White, Color::Black] {
            let flag = &mut state.flags[color.index()];
            flag.position = board
                .pieces()
                .find(|(_, p)| p.kind == PieceKind::Flag && p.color == color)
                .map(|(sq, _)| sq);
            if let Some(sq) = flag.position {
                flag.last_seen = sq;
            }
            flag.captured = flag.position.is_none()
                && board.pieces().any(|(_, p)| p.has_flag && p.color == color.opponent());
        }

        state
    }

    fn build(ruleset: RuleSet, layout: Layout, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = ruleset.setup(&mut rng);
        let options = RuleOptions {
            pawn_retreat: ruleset.pawn_retreat,
            bases: layout.bases,
        };

        Self {
            board,
            current_player: Color::White,
            flags: initial_flags(&layout),
            bases: [
                BaseStation {
                    color: Color::White,
                    position: layout.bases[0],
                },
                BaseStation {
                    color: Color::Black,
                    position: layout.bases[1],
                },
            ],
            score: Score::default(),
            round: 1,
            ruleset,
            layout,
            options,
            rng,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn flag(&self, color: Color) -> &Flag {
        &self.flags[color.index()]
    }

    pub fn base_station(&self, color: Color) -> &BaseStation {
        &self.bases[color.index()]
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    pub fn rule_options(&self) -> &RuleOptions {
        &self.options
    }

    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    /// Square of the piece carrying `color`'s captured flag
    pub fn carrier_of(&self, color: Color) -> Option<Square> {
        self.board
            .pieces()
            .find(|(_, p)| p.has_flag && p.color == color.opponent())
            .map(|(sq, _)| sq)
    }

    // ========================================================================
    // RULES
    // ========================================================================

    /// Check a move for the side to move
    pub fn is_legal_move(&self, from: Square, to: Square) -> bool {
        rules::is_legal_move(self, from, to)
    }

    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::all_legal_moves(self, self.current_player)
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply a move for the side to move. Illegal moves leave the state untouched.
    pub fn apply_move(&mut self, from: Square, to: Square) -> MoveResult {
        if !self.is_legal_move(from, to) {
            return MoveResult::rejected();
        }

        let mover = self.current_player;
        let delta = match self.board.make_move(from, to) {
            Some(d) => d,
            None => return MoveResult::rejected(),
        };

        let mut result = MoveResult {
            applied: true,
            ..MoveResult::default()
        };

        result.captured = delta.captured.filter(|v| v.color != mover);
        if let Some(flag_color) = take_flag(&mut self.board, to, delta.captured) {
            self.mark_taken(flag_color, to);
            result.flag_event = Some(if flag_color == mover {
                FlagEvent::Intercepted
            } else {
                FlagEvent::Captured
            });
        }

        result.promoted = self.maybe_promote(to, mover);

        let carrying = self.board.get(to).is_some_and(|p| p.has_flag);
        if carrying && to == self.bases[mover.index()].position {
            let points = self.ruleset.points_per_return;
            self.score.add(mover, points);
            tracing::info!(
                "{:?} scored! Score: White {} - Black {}",
                mover,
                self.score.white,
                self.score.black
            );
            self.reset_round();
            result.flag_event = Some(FlagEvent::Returned);
            result.round_reset = true;
        }

        self.current_player = mover.opponent();
        result
    }

    /// Apply a `Move`
    pub fn play(&mut self, mv: Move) -> MoveResult {
        self.apply_move(mv.from, mv.to)
    }

    fn mark_taken(&mut self, flag_color: Color, carrier: Square) {
        let flag = &mut self.flags[flag_color.index()];
        flag.captured = true;
        flag.position = None;
        flag.last_seen = carrier;
        tracing::debug!("{:?} flag taken at {}", flag_color, carrier);
    }

    fn maybe_promote(&mut self, sq: Square, mover: Color) -> Option<PieceKind> {
        let is_pawn = self.board.get(sq).is_some_and(|p| p.kind == PieceKind::Pawn);
        if !self.ruleset.promotion || !is_pawn || sq.row != mover.promotion_row() {
            return None;
        }
        let kind = *PROMOTION_KINDS.choose(&mut self.rng)?;
        if let Some(piece) = self.board.get_mut(sq) {
            piece.kind = kind;
        }
        tracing::debug!("{:?} pawn promoted to {:?} at {}", mover, kind, sq);
        Some(kind)
    }

    /// Fresh board and flags for a new round; score is kept
    fn reset_round(&mut self) {
        self.board = self.ruleset.setup(&mut self.rng);
        self.flags = initial_flags(&self.layout);
        self.round += 1;
        tracing::debug!("Round {} begins", self.round);
    }
}

/// Flag transfer for a move already made on `board`.
///
/// When `captured` was an enemy flag token or an enemy carrier, the piece now
/// on `to` becomes a carrier. Returns the color of the flag it took: the
/// token's own color, or the mover's color when it struck a carrier.
pub(crate) fn take_flag(board: &mut Board, to: Square, captured: Option<Piece>) -> Option<Color> {
    let mover = board.get_mut(to)?;
    let victim = captured.filter(|v| v.color != mover.color && v.holds_flag())?;
    mover.has_flag = true;
    Some(if victim.kind == PieceKind::Flag {
        victim.color
    } else {
        victim.color.opponent()
    })
}

fn initial_flags(layout: &Layout) -> [Flag; 2] {
    [
        Flag::at_home(Color::White, layout.flag_homes[0]),
        Flag::at_home(Color::Black, layout.flag_homes[1]),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
