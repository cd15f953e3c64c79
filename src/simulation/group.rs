//! Groups: named, queryable collections of agents.
//!
//! A group holds back-references (ids) to agents it does not own, plus a
//! spatial index over the positions it snapshotted at the last refresh. Removing
//! an agent from a group never affects the agent itself.

use std::collections::BTreeMap;

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::agent::AgentId;
use super::error::Result;
use super::geometry::WorldBounds;
use super::locatable::PositionSource;
use super::spatial::{Entry, IndexStrategy, Nearest, NearestNeighbors, Query, SpatialIndex};

/// Identity of a group inside a [`Groups`] collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub usize);

impl GroupId {
    /// Position of the group in its collection.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An identity-unique set of agents answering nearest-neighbor queries.
#[derive(Debug)]
pub struct Group {
    name: String,
    bounds: WorldBounds,
    /// Members and the position each was indexed at.
    members: BTreeMap<AgentId, Coord<f64>>,
    index: SpatialIndex,
}

impl Group {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>, strategy: IndexStrategy, bounds: WorldBounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            members: BTreeMap::new(),
            index: strategy.build(&bounds),
        }
    }

    /// Creates a group holding `members` at their current positions.
    ///
    /// Ids unknown to `positions` are skipped; duplicates collapse into one member.
    pub fn with_members<P>(
        name: impl Into<String>,
        strategy: IndexStrategy,
        bounds: WorldBounds,
        members: &[AgentId],
        positions: &P,
    ) -> Result<Self>
    where
        P: PositionSource + ?Sized,
    {
        let mut group = Self::new(name, strategy, bounds);
        for &id in members {
            if let Some(position) = positions.position_of(id) {
                group.members.insert(id, position);
            }
        }
        group.rebuild()?;
        Ok(group)
    }

    /// Group name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World extent seen at the last refresh.
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: AgentId) -> bool {
        self.members.contains_key(&id)
    }

    /// Member ids. The order carries no meaning.
    pub fn members(&self) -> impl ExactSizeIterator<Item = AgentId> + '_ {
        self.members.keys().copied()
    }

    /// Re-reads member positions and updates the world extent.
    ///
    /// Called once per frame before any query. Members that `positions` no
    /// longer knows are dropped. When neither the bounds nor any position
    /// changed the index is left untouched. If the index rejects the new
    /// snapshot the group keeps its previous members, positions and index.
    ///
    /// # Returns
    ///
    /// Whether the index was rebuilt.
    pub fn refresh<P>(&mut self, bounds: WorldBounds, positions: &P) -> Result<bool>
    where
        P: PositionSource + ?Sized,
    {
        let mut changed = bounds != self.bounds;
        let mut members = BTreeMap::new();

        for (&id, &position) in &self.members {
            match positions.position_of(id) {
                Some(current) => {
                    changed |= current != position;
                    members.insert(id, current);
                }
                None => {
                    log::warn!("group {}: dropping unknown member {:?}", self.name, id);
                    changed = true;
                }
            }
        }

        if !changed {
            return Ok(false);
        }

        self.index.rebuild(&bounds, &entries_of(&members))?;
        self.members = members;
        self.bounds = bounds;
        Ok(true)
    }

    /// Adds `id` at `position`.
    ///
    /// # Returns
    ///
    /// `false` if `id` was already a member (the group is left unchanged).
    pub fn insert(&mut self, id: AgentId, position: Coord<f64>) -> Result<bool> {
        if self.members.contains_key(&id) {
            return Ok(false);
        }
        self.index.insert(Entry::new(id, position))?;
        self.members.insert(id, position);
        Ok(true)
    }

    /// Removes `id` from the group. The agent itself is unaffected.
    ///
    /// Safe to call mid-frame.
    ///
    /// # Returns
    ///
    /// The position `id` was indexed at, or `None` if it was not a member.
    pub fn remove(&mut self, id: AgentId) -> Option<Coord<f64>> {
        let position = self.members.remove(&id)?;
        if !self.index.remove(&Entry::new(id, position)) {
            log::warn!("group {}: member {:?} missing from index", self.name, id);
        }
        Some(position)
    }

    /// Closest member to `point`.
    ///
    /// # Arguments
    ///
    /// * `point` - Query location
    /// * `exclude` - Identity that never matches (typically the querying agent)
    /// * `max_distance` - Members strictly farther than this are ignored; `None` is unbounded
    ///
    /// # Returns
    ///
    /// The nearest qualifying member and its distance, or `None` when the group
    /// is empty or nothing lies within `max_distance`. Ties may resolve to any
    /// of the equidistant members.
    pub fn find_nearest(
        &self,
        point: Coord<f64>,
        exclude: Option<AgentId>,
        max_distance: Option<f64>,
    ) -> Option<Nearest> {
        self.index
            .nearest(&Query::new(point).excluding(exclude).within(max_distance))
    }

    /// Every member within `radius` of `point`, closest first.
    ///
    /// The bound is inclusive; a negative or NaN radius matches nothing.
    pub fn within(
        &self,
        point: Coord<f64>,
        exclude: Option<AgentId>,
        radius: f64,
    ) -> Vec<Nearest> {
        let mut found = Vec::new();
        self.index.within(
            &Query::new(point).excluding(exclude).within(Some(radius)),
            &mut found,
        );
        found.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        found
    }

    /// Up to `k` nearest members, closest first.
    ///
    /// Emulated with repeated [`Group::find_nearest`] calls: each hit is removed
    /// from the group so the next query finds the runner-up, and every removed
    /// member is re-inserted once the search ends. The membership afterwards is
    /// identical to the membership before. This transiently mutates the group
    /// and is only sound because frames run on a single thread.
    pub fn k_nearest(
        &mut self,
        point: Coord<f64>,
        exclude: Option<AgentId>,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<Nearest> {
        let mut found = Vec::with_capacity(k);
        while found.len() < k {
            let Some(hit) = self.find_nearest(point, exclude, max_distance) else {
                break;
            };
            self.remove(hit.id);
            found.push(hit);
        }

        for hit in &found {
            if let Err(e) = self.insert(hit.id, hit.position) {
                log::error!(
                    "group {}: failed to restore member {:?}: {}",
                    self.name,
                    hit.id,
                    e
                );
            }
        }
        found
    }

    fn rebuild(&mut self) -> Result<()> {
        self.index.rebuild(&self.bounds, &entries_of(&self.members))
    }
}

fn entries_of(members: &BTreeMap<AgentId, Coord<f64>>) -> Vec<Entry> {
    members
        .iter()
        .map(|(&id, &position)| Entry::new(id, position))
        .collect()
}

/// All groups of a world, addressed by [`GroupId`].
#[derive(Debug, Default)]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group and returns its id.
    pub fn add(&mut self, group: Group) -> GroupId {
        self.groups.push(group);
        GroupId(self.groups.len() - 1)
    }

    /// Group by id.
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    /// Mutable group by id.
    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.index())
    }

    /// Group by name.
    pub fn find(&self, name: &str) -> Option<(GroupId, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .find(|(_, group)| group.name() == name)
            .map(|(idx, group)| (GroupId(idx), group))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over all groups.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(idx, group)| (GroupId(idx), group))
    }

    /// Iterates mutably over all groups.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Group> {
        self.groups.iter_mut()
    }
}
