//! Learned per-square position ratings
//!
//! Keys are `"row,col"` strings so the table serializes to a flat JSON object.
//! Loading and saving are left to the caller.

use crate::board::Square;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionRatings {
    ratings: FxHashMap<String, f32>,
}

impl PositionRatings {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(sq: Square) -> String {
        format!("{},{}", sq.row, sq.col)
    }

    /// Rating of a square; unknown squares rate 0
    pub fn get(&self, sq: Square) -> f32 {
        self.ratings.get(&Self::key(sq)).copied().unwrap_or(0.0)
    }

    /// Add `delta` to a square's rating
    pub fn nudge(&mut self, sq: Square, delta: f32) {
        *self.ratings.entry(Self::key(sq)).or_insert(0.0) += delta;
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
