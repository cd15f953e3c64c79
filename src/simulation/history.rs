//! Bounded position history kept for trail rendering.

use std::collections::VecDeque;

use geo::Coord;

/// Number of positions an agent remembers.
pub const HISTORY_CAPACITY: usize = 1 << 7;

/// Fixed-capacity ring of recent positions, newest first.
///
/// Once full, recording a position evicts the oldest one.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    /// Recent positions, newest first
    positions: VecDeque<Coord<f64>>,
    /// Maximum number of positions to keep
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl History {
    /// Creates an empty history with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a position as the most recent entry.
    pub fn push(&mut self, position: Coord<f64>) {
        if self.capacity == 0 {
            return;
        }
        self.positions.push_front(position);

        while self.positions.len() > self.capacity {
            self.positions.pop_back();
        }
    }

    /// Positions, newest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Coord<f64>> + '_ {
        self.positions.iter()
    }

    /// Most recently recorded position.
    pub fn latest(&self) -> Option<Coord<f64>> {
        self.positions.front().copied()
    }

    /// Number of recorded positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Maximum number of positions retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
