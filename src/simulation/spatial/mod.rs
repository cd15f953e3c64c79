//! Nearest-neighbor indexing for agent groups.
//!
//! Provides a unified interface over three interchangeable strategies: a linear
//! scan, a quadtree and a k-d tree. All of them answer the same two questions
//! (the closest entry to a point, and every entry within a radius of it), each
//! optionally excluding one identity, and must agree on the answer up to ties.

use std::str::FromStr;

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::agent::AgentId;
use super::error::{Result, SwarmError};
use super::geometry::{WorldBounds, distance_squared};

mod kd;
mod linear;
mod quadtree;

pub use kd::KdIndex;
pub use linear::LinearIndex;
pub use quadtree::{DEFAULT_CAPACITY, MAX_DEPTH, QuadTree};

/// An indexed member: identity plus the position snapshotted at refresh time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Member identity.
    pub id: AgentId,
    /// Position at the time the entry was indexed.
    pub position: Coord<f64>,
}

impl Entry {
    /// Creates an entry.
    pub fn new(id: AgentId, position: Coord<f64>) -> Self {
        Self { id, position }
    }
}

/// Result of a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// The matched member.
    pub id: AgentId,
    /// Its indexed position.
    pub position: Coord<f64>,
    /// Euclidean distance from the query point.
    pub distance: f64,
}

/// A nearest-neighbor question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    /// Point to search around.
    pub point: Coord<f64>,
    /// Identity that must never match (usually the querying agent).
    pub exclude: Option<AgentId>,
    /// Members strictly farther than this are ignored; `None` is unbounded.
    pub max_distance: Option<f64>,
}

impl Query {
    /// Unbounded query around `point`.
    pub fn new(point: Coord<f64>) -> Self {
        Self {
            point,
            exclude: None,
            max_distance: None,
        }
    }

    /// Never match `id`.
    pub fn excluding(mut self, id: Option<AgentId>) -> Self {
        self.exclude = id;
        self
    }

    /// Only match members within `max_distance` (inclusive).
    pub fn within(mut self, max_distance: Option<f64>) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Squared distance bound; negative when nothing can match.
    pub fn limit_squared(&self) -> f64 {
        match self.max_distance {
            None => f64::INFINITY,
            Some(d) if d >= 0.0 => d * d,
            Some(_) => -1.0,
        }
    }

    /// The match for `entry` if it is not excluded and lies within the bound.
    pub(crate) fn admit(&self, entry: &Entry) -> Option<Nearest> {
        if self.exclude == Some(entry.id) {
            return None;
        }
        let d = distance_squared(self.point, entry.position);
        (d <= self.limit_squared()).then(|| Nearest {
            id: entry.id,
            position: entry.position,
            distance: d.sqrt(),
        })
    }
}

/// Running best candidate while a strategy walks its entries.
#[derive(Debug)]
pub(crate) struct Best<'q> {
    query: &'q Query,
    limit_sq: f64,
    found: Option<(Entry, f64)>,
}

impl<'q> Best<'q> {
    pub(crate) fn new(query: &'q Query) -> Self {
        Self {
            query,
            limit_sq: query.limit_squared(),
            found: None,
        }
    }

    /// Squared distance a candidate must beat (or meet, before the first match).
    pub(crate) fn bound(&self) -> f64 {
        self.found.map_or(self.limit_sq, |(_, d)| d)
    }

    pub(crate) fn offer(&mut self, entry: &Entry) {
        if self.query.exclude == Some(entry.id) {
            return;
        }
        let d = distance_squared(self.query.point, entry.position);
        let accept = match self.found {
            Some((_, best)) => d < best,
            None => d <= self.limit_sq,
        };
        if accept {
            self.found = Some((*entry, d));
        }
    }

    pub(crate) fn finish(self) -> Option<Nearest> {
        self.found.map(|(entry, d)| Nearest {
            id: entry.id,
            position: entry.position,
            distance: d.sqrt(),
        })
    }
}

/// Common behaviour exposed by nearest-neighbor indices.
pub trait NearestNeighbors {
    /// Replaces the indexed contents with `entries` laid out for `bounds`.
    fn rebuild(&mut self, bounds: &WorldBounds, entries: &[Entry]) -> Result<()>;

    /// Adds one entry. The caller guarantees its id is not already indexed.
    fn insert(&mut self, entry: Entry) -> Result<()>;

    /// Removes the entry with `entry.id`; `entry.position` must be the indexed one.
    fn remove(&mut self, entry: &Entry) -> bool;

    /// Closest entry satisfying `query`.
    fn nearest(&self, query: &Query) -> Option<Nearest>;

    /// Appends every entry satisfying `query` to `out`, in no particular order.
    ///
    /// An unbounded query returns every entry except the excluded one.
    fn within(&self, query: &Query, out: &mut Vec<Nearest>);

    /// Number of indexed entries.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which strategy a group uses to answer nearest-neighbor queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexStrategy {
    /// Scan every member; O(n) per query.
    #[default]
    Linear,
    /// Recursive four-way partition of the world rectangle.
    QuadTree {
        /// Entries a node holds before it subdivides.
        capacity: usize,
    },
    /// k-d tree from the `kdtree` crate.
    KdTree,
}

impl IndexStrategy {
    /// Creates an empty index of this kind.
    pub fn build(&self, bounds: &WorldBounds) -> SpatialIndex {
        match *self {
            Self::Linear => SpatialIndex::Linear(LinearIndex::new()),
            Self::QuadTree { capacity } => SpatialIndex::QuadTree(QuadTree::new(bounds, capacity)),
            Self::KdTree => SpatialIndex::KdTree(KdIndex::new()),
        }
    }
}

impl FromStr for IndexStrategy {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" | "scan" => Ok(Self::Linear),
            "quadtree" | "quad" => Ok(Self::QuadTree {
                capacity: DEFAULT_CAPACITY,
            }),
            "kdtree" | "kd" => Ok(Self::KdTree),
            other => Err(SwarmError::InvalidConfig(format!(
                "unknown index strategy `{other}`"
            ))),
        }
    }
}

/// A group's index, one of the closed set of strategies.
#[derive(Debug)]
pub enum SpatialIndex {
    /// Linear scan.
    Linear(LinearIndex),
    /// Quadtree.
    QuadTree(QuadTree),
    /// k-d tree.
    KdTree(KdIndex),
}

impl NearestNeighbors for SpatialIndex {
    fn rebuild(&mut self, bounds: &WorldBounds, entries: &[Entry]) -> Result<()> {
        match self {
            Self::Linear(index) => index.rebuild(bounds, entries),
            Self::QuadTree(index) => index.rebuild(bounds, entries),
            Self::KdTree(index) => index.rebuild(bounds, entries),
        }
    }

    fn insert(&mut self, entry: Entry) -> Result<()> {
        match self {
            Self::Linear(index) => index.insert(entry),
            Self::QuadTree(index) => index.insert(entry),
            Self::KdTree(index) => index.insert(entry),
        }
    }

    fn remove(&mut self, entry: &Entry) -> bool {
        match self {
            Self::Linear(index) => index.remove(entry),
            Self::QuadTree(index) => index.remove(entry),
            Self::KdTree(index) => index.remove(entry),
        }
    }

    fn nearest(&self, query: &Query) -> Option<Nearest> {
        match self {
            Self::Linear(index) => index.nearest(query),
            Self::QuadTree(index) => index.nearest(query),
            Self::KdTree(index) => index.nearest(query),
        }
    }

    fn within(&self, query: &Query, out: &mut Vec<Nearest>) {
        match self {
            Self::Linear(index) => index.within(query, out),
            Self::QuadTree(index) => index.within(query, out),
            Self::KdTree(index) => index.within(query, out),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Linear(index) => index.len(),
            Self::QuadTree(index) => index.len(),
            Self::KdTree(index) => index.len(),
        }
    }
}
