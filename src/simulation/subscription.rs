//! Per-agent registry mapping role names to groups.
//!
//! Agent logic asks for "the nearest member of role X"; which group serves role
//! X is decided by the scenario wiring. A role without an entry simply has no
//! neighbors.

use std::collections::HashMap;

use geo::Coord;

use super::agent::AgentId;
use super::group::{GroupId, Groups};
use super::spatial::Nearest;

/// Role to group mapping owned by one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    roles: HashMap<String, GroupId>,
}

impl Subscriptions {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `role` from `group`, replacing any previous association.
    pub fn subscribe(&mut self, role: impl Into<String>, group: GroupId) {
        self.roles.insert(role.into(), group);
    }

    /// Forgets `role`; later queries for it find nothing.
    ///
    /// # Returns
    ///
    /// The group that served the role, if any.
    pub fn unsubscribe(&mut self, role: &str) -> Option<GroupId> {
        self.roles.remove(role)
    }

    /// Group currently serving `role`.
    pub fn group_for(&self, role: &str) -> Option<GroupId> {
        self.roles.get(role).copied()
    }

    /// Number of subscribed roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no role is subscribed.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Nearest member of the group serving `role`, never `self_id` itself.
    ///
    /// Returns `None` for an unsubscribed role, a dangling group id, an empty
    /// group or when nothing lies within `max_distance`.
    pub fn find_nearest_by_role(
        &self,
        groups: &Groups,
        role: &str,
        self_id: AgentId,
        position: Coord<f64>,
        max_distance: Option<f64>,
    ) -> Option<Nearest> {
        let group = groups.get(self.group_for(role)?)?;
        group.find_nearest(position, Some(self_id), max_distance)
    }

    /// Every member of the group serving `role` within `radius`, closest first,
    /// never `self_id` itself. Empty for an unsubscribed role.
    pub fn within_by_role(
        &self,
        groups: &Groups,
        role: &str,
        self_id: AgentId,
        position: Coord<f64>,
        radius: f64,
    ) -> Vec<Nearest> {
        self.group_for(role)
            .and_then(|id| groups.get(id))
            .map_or_else(Vec::new, |group| group.within(position, Some(self_id), radius))
    }

    /// Up to `k` nearest members of the group serving `role`, closest first.
    ///
    /// See [`Group::k_nearest`](super::group::Group::k_nearest) for the
    /// transient mutation this performs.
    pub fn k_nearest_by_role(
        &self,
        groups: &mut Groups,
        role: &str,
        self_id: AgentId,
        position: Coord<f64>,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<Nearest> {
        let Some(group) = self.group_for(role).and_then(|id| groups.get_mut(id)) else {
            return Vec::new();
        };
        group.k_nearest(position, Some(self_id), k, max_distance)
    }
}
