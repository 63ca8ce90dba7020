//! Small best-first move cache
//!
//! Entries are keyed by a position string and kept sorted by score, highest
//! first. When full, the lowest-scoring entry is dropped.

use crate::board::{Board, Square, BOARD_SIZE};
use crate::game::Move;
use crate::pieces::Color;

pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Encode a board and side to move as a cache key.
///
/// Each square is `--` or the piece letter followed by its color initial.
/// Rows are joined with `|` and the side to move is appended.
pub fn position_key(board: &Board, color: Color) -> String {
    let mut key = String::with_capacity(BOARD_SIZE as usize * (BOARD_SIZE as usize * 2 + 1) + 1);
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            match board.get(Square::new(row, col)) {
                Some(p) => {
                    key.push(p.kind.letter());
                    key.push(p.color.initial());
                }
                None => key.push_str("--"),
            }
        }
        key.push('|');
    }
    key.push(color.initial());
    key
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedMove {
    pub key: String,
    pub mv: Move,
    pub score: f32,
}

#[derive(Clone, Debug)]
pub struct MoveCache {
    entries: Vec<CachedMove>,
    capacity: usize,
}

impl Default for MoveCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl MoveCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert an entry in score order. A repeated (key, move) pair is ignored.
    pub fn add(&mut self, key: String, mv: Move, score: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.iter().any(|e| e.mv == mv && e.key == key) {
            return;
        }
        // After any equal scores, so older entries win ties
        let at = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(at, CachedMove { key, mv, score });
        if self.entries.len() > self.capacity {
            self.entries.pop();
        }
    }

    /// Highest-scoring entry overall
    pub fn get_best(&self) -> Option<&CachedMove> {
        self.entries.first()
    }

    /// Highest-scoring entry for one position
    pub fn best_for(&self, key: &str) -> Option<&CachedMove> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedMove> {
        self.entries.iter()
    }
}
