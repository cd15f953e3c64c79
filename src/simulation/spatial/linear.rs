//! Linear scan: compares squared distances against every member.

use super::{Best, Entry, Nearest, NearestNeighbors, Query};
use crate::simulation::error::Result;
use crate::simulation::geometry::WorldBounds;

/// Flat list of entries searched exhaustively.
///
/// O(n) per query, which is the right trade-off for the population sizes of a
/// single group (at most a few hundred members).
#[derive(Debug, Clone, Default)]
pub struct LinearIndex {
    entries: Vec<Entry>,
}

impl LinearIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NearestNeighbors for LinearIndex {
    fn rebuild(&mut self, _bounds: &WorldBounds, entries: &[Entry]) -> Result<()> {
        self.entries.clear();
        self.entries.extend_from_slice(entries);
        Ok(())
    }

    fn insert(&mut self, entry: Entry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }

    fn remove(&mut self, entry: &Entry) -> bool {
        match self.entries.iter().position(|e| e.id == entry.id) {
            Some(idx) => {
                self.entries.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    fn nearest(&self, query: &Query) -> Option<Nearest> {
        let mut best = Best::new(query);
        for entry in &self.entries {
            best.offer(entry);
        }
        best.finish()
    }

    fn within(&self, query: &Query, out: &mut Vec<Nearest>) {
        out.extend(self.entries.iter().filter_map(|entry| query.admit(entry)));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
