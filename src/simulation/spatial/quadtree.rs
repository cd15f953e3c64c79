//! Quadtree strategy: recursive four-way partition of the world rectangle.
//!
//! Nodes split once they hold more than `capacity` entries. Queries descend into
//! the quadrant containing the query point first to tighten the best distance
//! early, then visit the remaining quadrants nearest-first, pruning any subtree
//! whose rectangle is already farther than the best match. Pruning never skips
//! a subtree that could hold a closer point, so the result is exact. Radius
//! queries prune the same way against the query bound.

use geo::{Coord, Rect, coord};

use super::{Best, Entry, Nearest, NearestNeighbors, Query};
use crate::simulation::error::Result;
use crate::simulation::geometry::{WorldBounds, rect_distance_squared};

/// Entries a node holds before it subdivides.
pub const DEFAULT_CAPACITY: usize = 4;

/// Nodes at this depth never subdivide, so coincident points cannot recurse forever.
pub const MAX_DEPTH: usize = 16;

/// Child slot for `p` around `center`: 0 north-west, 1 north-east, 2 south-west, 3 south-east.
fn quadrant_of(center: Coord<f64>, p: Coord<f64>) -> usize {
    usize::from(p.x >= center.x) + 2 * usize::from(p.y >= center.y)
}

#[derive(Debug, Clone)]
struct Node {
    rect: Rect<f64>,
    entries: Vec<Entry>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(rect: Rect<f64>) -> Self {
        Self {
            rect,
            entries: Vec::new(),
            children: None,
        }
    }

    fn quadrant(&self, p: Coord<f64>) -> usize {
        quadrant_of(self.rect.center(), p)
    }

    fn subdivide(&mut self, capacity: usize, depth: usize) {
        let min = self.rect.min();
        let max = self.rect.max();
        let c = self.rect.center();

        let mut children = Box::new([
            Node::new(Rect::new(min, c)),
            Node::new(Rect::new(coord! { x: c.x, y: min.y }, coord! { x: max.x, y: c.y })),
            Node::new(Rect::new(coord! { x: min.x, y: c.y }, coord! { x: c.x, y: max.y })),
            Node::new(Rect::new(c, max)),
        ]);

        for entry in self.entries.drain(..) {
            children[quadrant_of(c, entry.position)].insert(entry, capacity, depth + 1);
        }

        self.children = Some(children);
    }

    fn insert(&mut self, entry: Entry, capacity: usize, depth: usize) {
        let q = self.quadrant(entry.position);
        if let Some(children) = self.children.as_mut() {
            children[q].insert(entry, capacity, depth + 1);
            return;
        }

        if self.entries.len() < capacity || depth >= MAX_DEPTH {
            self.entries.push(entry);
            return;
        }

        self.subdivide(capacity, depth);
        if let Some(children) = self.children.as_mut() {
            children[q].insert(entry, capacity, depth + 1);
        }
    }

    fn remove(&mut self, entry: &Entry) -> bool {
        let q = self.quadrant(entry.position);
        if let Some(children) = self.children.as_mut() {
            return children[q].remove(entry);
        }

        match self.entries.iter().position(|e| e.id == entry.id) {
            Some(idx) => {
                self.entries.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    fn search(&self, best: &mut Best<'_>, point: Coord<f64>) {
        if rect_distance_squared(&self.rect, point) > best.bound() {
            return;
        }

        for entry in &self.entries {
            best.offer(entry);
        }

        let Some(children) = self.children.as_ref() else {
            return;
        };

        // Home quadrant first, then the others by how close they could be.
        let home = self.quadrant(point);
        let mut order: [(f64, usize); 4] = std::array::from_fn(|i| {
            let d = if i == home {
                -1.0
            } else {
                rect_distance_squared(&children[i].rect, point)
            };
            (d, i)
        });
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, i) in order {
            children[i].search(best, point);
        }
    }

    fn collect(&self, query: &Query, limit_sq: f64, out: &mut Vec<Nearest>) {
        if rect_distance_squared(&self.rect, query.point) > limit_sq {
            return;
        }
        out.extend(self.entries.iter().filter_map(|entry| query.admit(entry)));
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect(query, limit_sq, out);
            }
        }
    }
}

/// Quadtree index over the world rectangle.
///
/// Entries outside the rectangle the tree was built for are kept in an
/// overflow list and scanned linearly, so no member is ever dropped.
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: Node,
    capacity: usize,
    outside: Vec<Entry>,
    len: usize,
}

impl QuadTree {
    /// Creates an empty tree covering `bounds`.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(bounds: &WorldBounds, capacity: usize) -> Self {
        Self {
            root: Node::new(bounds.to_rect()),
            capacity: capacity.max(1),
            outside: Vec::new(),
            len: 0,
        }
    }

    /// Rectangle covered by the root node.
    pub fn rect(&self) -> Rect<f64> {
        self.root.rect
    }

    /// Maximum depth currently reached by the tree.
    pub fn depth(&self) -> usize {
        fn depth_of(node: &Node) -> usize {
            node.children
                .as_ref()
                .map_or(0, |children| 1 + children.iter().map(depth_of).max().unwrap_or(0))
        }
        depth_of(&self.root)
    }

    fn covers(&self, p: Coord<f64>) -> bool {
        let min = self.root.rect.min();
        let max = self.root.rect.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

impl NearestNeighbors for QuadTree {
    fn rebuild(&mut self, bounds: &WorldBounds, entries: &[Entry]) -> Result<()> {
        self.root = Node::new(bounds.to_rect());
        self.outside.clear();
        self.len = 0;
        for entry in entries {
            self.insert(*entry)?;
        }
        Ok(())
    }

    fn insert(&mut self, entry: Entry) -> Result<()> {
        if self.covers(entry.position) {
            self.root.insert(entry, self.capacity, 0);
        } else {
            self.outside.push(entry);
        }
        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, entry: &Entry) -> bool {
        let removed = if let Some(idx) = self.outside.iter().position(|e| e.id == entry.id) {
            self.outside.swap_remove(idx);
            true
        } else {
            self.root.remove(entry)
        };
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn nearest(&self, query: &Query) -> Option<Nearest> {
        let mut best = Best::new(query);
        for entry in &self.outside {
            best.offer(entry);
        }
        self.root.search(&mut best, query.point);
        best.finish()
    }

    fn within(&self, query: &Query, out: &mut Vec<Nearest>) {
        out.extend(self.outside.iter().filter_map(|entry| query.admit(entry)));
        self.root.collect(query, query.limit_squared(), out);
    }

    fn len(&self) -> usize {
        self.len
    }
}
