//! The capability every agent kind implements, and the view of the world it
//! steps against.

use std::f64::consts::TAU;

use geo::Coord;
use rand::Rng;
use rand_pcg::Pcg32;

use super::super::geometry::WorldBounds;
use super::super::group::Groups;
use super::super::locatable::Locatable;
use super::super::spatial::Nearest;
use super::super::subscription::Subscriptions;
use super::{Agent, AgentId, Body};

/// Per-frame update rule of an agent kind.
///
/// Implementations mutate only their own kinetic state and the agent's body.
/// Other agents are reached exclusively through role queries on the [`Scope`].
pub trait Behavior {
    /// Advances the agent by one frame.
    ///
    /// # Arguments
    ///
    /// * `body` - Position, heading and history of the agent being stepped
    /// * `scope` - Role queries, world bounds, time scale and randomness
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>);
}

/// Read access to the rest of the population while one agent steps.
///
/// Built by splitting the population around the stepping agent, so the agent
/// itself is never visible here.
#[derive(Debug, Clone, Copy)]
pub struct Peers<'a> {
    before: &'a [Agent],
    after: &'a [Agent],
}

impl<'a> Peers<'a> {
    /// Agents stored before and after the stepping one.
    pub fn new(before: &'a [Agent], after: &'a [Agent]) -> Self {
        Self { before, after }
    }

    /// A view with nobody in it.
    pub fn empty() -> Self {
        Self {
            before: &[],
            after: &[],
        }
    }

    /// Agent `id`, or `None` for the stepping agent and unknown ids.
    pub fn get(&self, id: AgentId) -> Option<&'a Agent> {
        let idx = id.index();
        let split = self.before.len();
        let agent = if idx < split {
            self.before.get(idx)
        } else {
            self.after.get(idx.checked_sub(split + 1)?)
        };
        agent.filter(|agent| agent.id() == id)
    }
}

/// Everything an agent may consult while stepping.
#[derive(Debug)]
pub struct Scope<'a> {
    /// Identity of the stepping agent; excluded from its own queries.
    pub id: AgentId,
    /// The stepping agent's role wiring.
    pub subscriptions: &'a Subscriptions,
    /// All groups of the world.
    pub groups: &'a mut Groups,
    /// Read-only view of the other agents.
    pub peers: Peers<'a>,
    /// World extent for this frame.
    pub bounds: WorldBounds,
    /// Time scale of the frame; 1.0 is one nominal 60 Hz frame.
    pub dt: f64,
    /// Shared simulation randomness.
    pub rng: &'a mut Pcg32,
}

impl Scope<'_> {
    /// Nearest member serving `role`, never the stepping agent.
    pub fn nearest(
        &self,
        role: &str,
        from: Coord<f64>,
        max_distance: Option<f64>,
    ) -> Option<Nearest> {
        self.subscriptions
            .find_nearest_by_role(self.groups, role, self.id, from, max_distance)
    }

    /// Every member serving `role` within `radius`, closest first.
    pub fn nearby(&self, role: &str, from: Coord<f64>, radius: f64) -> Vec<Nearest> {
        self.subscriptions
            .within_by_role(self.groups, role, self.id, from, radius)
    }

    /// Up to `k` nearest members serving `role`, closest first.
    pub fn k_nearest(
        &mut self,
        role: &str,
        from: Coord<f64>,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<Nearest> {
        self.subscriptions
            .k_nearest_by_role(self.groups, role, self.id, from, k, max_distance)
    }

    /// Another agent, for reading kind-specific attributes such as mass.
    pub fn peer(&self, id: AgentId) -> Option<&Agent> {
        self.peers.get(id)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn random_angle(&mut self) -> f64 {
        self.rng.random::<f64>() * TAU
    }

    /// Uniform value in `[-amount / 2, amount / 2)`.
    pub fn jitter(&mut self, amount: f64) -> f64 {
        (self.rng.random::<f64>() - 0.5) * amount
    }
}
