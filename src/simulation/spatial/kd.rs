//! k-d tree strategy backed by the `kdtree` crate.

use std::fmt;

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;

use super::{Entry, Nearest, NearestNeighbors, Query};
use crate::simulation::error::Result;
use crate::simulation::geometry::WorldBounds;

/// Type alias for the 2D k-d tree holding group entries.
type Tree2D = KdTree<f64, Entry, [f64; 2]>;

/// k-d tree index.
///
/// Non-finite coordinates are rejected by the tree, which surfaces as a
/// [`SwarmError::Index`](crate::simulation::error::SwarmError::Index) on insert.
pub struct KdIndex {
    tree: Tree2D,
}

impl KdIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            tree: KdTree::new(2),
        }
    }
}

impl Default for KdIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KdIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}

impl NearestNeighbors for KdIndex {
    /// Builds the new tree aside; on a rejected entry the previous tree stays.
    fn rebuild(&mut self, _bounds: &WorldBounds, entries: &[Entry]) -> Result<()> {
        let mut tree = KdTree::new(2);
        for entry in entries {
            tree.add([entry.position.x, entry.position.y], *entry)?;
        }
        self.tree = tree;
        Ok(())
    }

    fn insert(&mut self, entry: Entry) -> Result<()> {
        self.tree
            .add([entry.position.x, entry.position.y], entry)?;
        Ok(())
    }

    fn remove(&mut self, entry: &Entry) -> bool {
        self.tree
            .remove(&[entry.position.x, entry.position.y], entry)
            .is_ok_and(|removed| removed > 0)
    }

    fn nearest(&self, query: &Query) -> Option<Nearest> {
        // Two candidates are enough: at most one of them is the excluded identity.
        let candidates = match self.tree.nearest(
            &[query.point.x, query.point.y],
            2,
            &squared_euclidean,
        ) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("k-d tree query at {:?} failed: {:?}", query.point, e);
                return None;
            }
        };

        let limit_sq = query.limit_squared();
        candidates
            .into_iter()
            .find(|(_, entry)| query.exclude != Some(entry.id))
            .filter(|(d, _)| *d <= limit_sq)
            .map(|(d, entry)| Nearest {
                id: entry.id,
                position: entry.position,
                distance: d.sqrt(),
            })
    }

    fn within(&self, query: &Query, out: &mut Vec<Nearest>) {
        let limit_sq = query.limit_squared();
        if limit_sq < 0.0 {
            return;
        }
        match self
            .tree
            .within(&[query.point.x, query.point.y], limit_sq, &squared_euclidean)
        {
            Ok(hits) => out.extend(
                hits.into_iter()
                    .filter(|(_, entry)| query.exclude != Some(entry.id))
                    .map(|(d, entry)| Nearest {
                        id: entry.id,
                        position: entry.position,
                        distance: d.sqrt(),
                    }),
            ),
            Err(e) => log::warn!("k-d tree range query at {:?} failed: {:?}", query.point, e),
        }
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}
