//! RuleSet - starting layout and rule options

use crate::board::{Board, Square, BOARD_SIZE};
use crate::error::RuleSetError;
use crate::pieces::{Color, Piece, PieceKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pieces::PieceKind::{Bishop as B, Flag as F, Guard as G, Knight as N, Rook as R, Turret as T};

/// Row holding the extra random guard, indexed by color
const GUARD_ROWS: [i8; 2] = [4, 3];

/// Row holding each side's pawns, indexed by color
const PAWN_ROWS: [i8; 2] = [6, 1];

/// White back rank, column 0 to 7
pub const STANDARD_WHITE_RANK: [PieceKind; 8] = [R, N, B, F, G, B, N, R];

/// Black back rank, column 0 to 7
pub const STANDARD_BLACK_RANK: [PieceKind; 8] = [R, N, B, G, F, B, N, R];

/// Starting layout and rule options for a match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub white_back_rank: [PieceKind; 8],
    pub black_back_rank: [PieceKind; 8],
    /// Place one immovable guard per side on a random column of the middle rows
    #[serde(default = "default_true")]
    pub random_guards: bool,
    /// Pawns may step backward as well as forward
    #[serde(default = "default_true")]
    pub pawn_retreat: bool,
    /// Pawns reaching the far rank become a random knight, bishop or rook
    #[serde(default = "default_true")]
    pub promotion: bool,
    /// Score awarded for carrying the enemy flag home
    #[serde(default = "default_points")]
    pub points_per_return: u32,
}

fn default_true() -> bool {
    true
}

fn default_points() -> u32 {
    1
}

/// Validated per-color squares derived from a RuleSet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Home square of each color's flag
    pub flag_homes: [Square; 2],
    /// Base station (back-rank guard square) of each color
    pub bases: [Square; 2],
}

impl Layout {
    /// Layout of the standard back ranks
    pub const fn standard() -> Self {
        Self {
            flag_homes: [Square::new(7, 3), Square::new(0, 4)],
            bases: [Square::new(7, 4), Square::new(0, 3)],
        }
    }
}

impl RuleSet {
    pub fn back_rank(&self, color: Color) -> &[PieceKind; 8] {
        match color {
            Color::White => &self.white_back_rank,
            Color::Black => &self.black_back_rank,
        }
    }

    /// Check the back ranks and derive flag homes and base stations
    pub fn layout(&self) -> Result<Layout, RuleSetError> {
        if self.points_per_return == 0 {
            return Err(RuleSetError::ZeroPoints);
        }

        let mut flag_homes = [Square::new(0, 0); 2];
        let mut bases = [Square::new(0, 0); 2];

        for color in [Color::White, Color::Black] {
            let rank = self.back_rank(color);
            let row = color.home_row();
            flag_homes[color.index()] = Square::new(row, single_column(rank, color, F)?);
            bases[color.index()] = Square::new(row, single_column(rank, color, G)?);
        }

        Ok(Layout { flag_homes, bases })
    }

    /// Build a starting board; the random guards draw their column from `rng`
    pub fn setup(&self, rng: &mut impl Rng) -> Board {
        let mut board = Board::empty();

        for color in [Color::White, Color::Black] {
            let row = color.home_row();
            for (col, &kind) in self.back_rank(color).iter().enumerate() {
                board.set(Square::new(row, col as i8), Some(Piece::new(kind, color)));
            }

            let pawn_row = PAWN_ROWS[color.index()];
            for col in 0..BOARD_SIZE {
                board.set(Square::new(pawn_row, col), Some(Piece::new(PieceKind::Pawn, color)));
            }

            if self.random_guards {
                let col = rng.gen_range(0..BOARD_SIZE);
                let sq = Square::new(GUARD_ROWS[color.index()], col);
                board.set(sq, Some(Piece::new(G, color)));
            }
        }

        board
    }

    /// Load from JSON file and validate the layout
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ruleset: RuleSet = serde_json::from_str(&content)?;
        ruleset.layout()?;
        Ok(ruleset)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Knights replaced by turrets on both sides
    pub fn bastion() -> Self {
        Self {
            name: "bastion".to_string(),
            white_back_rank: [R, T, B, F, G, B, T, R],
            black_back_rank: [R, T, B, G, F, B, T, R],
            ..Self::default()
        }
    }

    /// Look up a named ruleset
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "default" | "standard" => Some(Self::default()),
            "bastion" => Some(Self::bastion()),
            _ => None,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            white_back_rank: STANDARD_WHITE_RANK,
            black_back_rank: STANDARD_BLACK_RANK,
            random_guards: true,
            pawn_retreat: true,
            promotion: true,
            points_per_return: 1,
        }
    }
}

/// Column of the only `kind` piece in a back rank
fn single_column(rank: &[PieceKind; 8], color: Color, kind: PieceKind) -> Result<i8, RuleSetError> {
    let mut columns = rank.iter().enumerate().filter(|&(_, &k)| k == kind).map(|(c, _)| c as i8);
    let col = columns.next().ok_or(RuleSetError::Missing { color, kind })?;
    let extra = columns.count();
    if extra > 0 {
        return Err(RuleSetError::Duplicate {
            color,
            kind,
            count: extra + 1,
        });
    }
    Ok(col)
}
