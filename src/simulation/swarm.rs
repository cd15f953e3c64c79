//! The simulated world and its per-frame update.
//!
//! A [`Swarm`] owns every agent, every group, the world bounds and the
//! simulation RNG. One call to [`Swarm::step`] runs a full frame:
//! - refresh every group's index against the latest bounds
//! - step every agent once, in population order
//! - record every agent's position into its history

use geo::Coord;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::agent::{Agent, AgentId, AgentKind, Peers};
use super::error::{Result, SwarmError};
use super::geometry::WorldBounds;
use super::group::{Group, GroupId, Groups};
use super::history::History;
use super::locatable::Locatable;
use super::spatial::{IndexStrategy, Nearest};

/// Read-only view of one agent for the renderer.
#[derive(Debug, Clone, Copy)]
pub struct AgentView<'a> {
    /// Agent identity.
    pub id: AgentId,
    /// Presentation label such as `"bee"`.
    pub tag: &'static str,
    /// Current location.
    pub position: Coord<f64>,
    /// Facing in radians.
    pub heading: f64,
    /// Current velocity.
    pub velocity: Coord<f64>,
    /// Recent positions, newest first.
    pub history: &'a History,
    /// Neighbors that influenced the last step (gravity lines).
    pub links: &'a [Nearest],
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderFrame<'a> {
    /// Frames completed so far.
    pub frame: u64,
    /// Whether the renderer should keep previous frames instead of clearing.
    pub trails_enabled: bool,
    /// World extent.
    pub bounds: WorldBounds,
    /// All agents in population order.
    pub agents: Vec<AgentView<'a>>,
}

/// World state: populations, groups, bounds and randomness.
#[derive(Debug)]
pub struct Swarm {
    bounds: WorldBounds,
    /// Bounds requested by a resize, applied at the next refresh.
    pending_bounds: Option<WorldBounds>,
    agents: Vec<Agent>,
    groups: Groups,
    frame: u64,
    time: f64,
    rng: Pcg32,
    trails_enabled: bool,
}

impl Swarm {
    /// Creates an empty world.
    ///
    /// # Arguments
    ///
    /// * `bounds` - Initial world extent
    /// * `seed` - Seed of the simulation RNG; equal seeds replay identically
    pub fn new(bounds: WorldBounds, seed: u64) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            pending_bounds: None,
            agents: Vec::new(),
            groups: Groups::new(),
            frame: 0,
            time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            trails_enabled: false,
        })
    }

    /// Current world extent.
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// All agents in population order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Mutable agent by id.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    /// All groups.
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Group by id.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Mutable group by id, for membership changes between or during frames.
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id)
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated time scale, in nominal frames.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Simulation randomness, for placing agents while building a scenario.
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Whether trails are drawn.
    pub fn trails_enabled(&self) -> bool {
        self.trails_enabled
    }

    /// Turns trail drawing on or off.
    pub fn set_trails_enabled(&mut self, enabled: bool) {
        self.trails_enabled = enabled;
    }

    /// Adds an agent at a uniformly random position inside the bounds.
    pub fn spawn(&mut self, tag: &'static str, heading: f64, kind: AgentKind) -> AgentId {
        let position = self.bounds.random_point(&mut self.rng);
        self.spawn_at(tag, position, heading, kind)
    }

    /// Adds an agent at `position`.
    ///
    /// # Returns
    ///
    /// The new agent's id, equal to its index in the population.
    pub fn spawn_at(
        &mut self,
        tag: &'static str,
        position: Coord<f64>,
        heading: f64,
        kind: AgentKind,
    ) -> AgentId {
        let id = AgentId(self.agents.len());
        self.agents
            .push(Agent::new(id, tag, position, heading, kind));
        id
    }

    /// Creates a group over `members` using this world's bounds.
    pub fn create_group(
        &mut self,
        name: impl Into<String>,
        strategy: IndexStrategy,
        members: &[AgentId],
    ) -> Result<GroupId> {
        if let Some(&unknown) = members.iter().find(|id| self.agent(**id).is_none()) {
            return Err(SwarmError::UnknownAgent(unknown));
        }
        let group = Group::with_members(
            name,
            strategy,
            self.bounds,
            members,
            self.agents.as_slice(),
        )?;
        log::debug!("group {} created with {} members", group.name(), group.size());
        Ok(self.groups.add(group))
    }

    /// Adds an already built group.
    pub fn add_group(&mut self, group: Group) -> GroupId {
        self.groups.add(group)
    }

    /// Serves `role` for `agent` from `group`.
    pub fn subscribe(&mut self, agent: AgentId, role: &str, group: GroupId) -> Result<()> {
        if self.groups.get(group).is_none() {
            return Err(SwarmError::UnknownGroup(group));
        }
        self.agent_mut(agent)
            .ok_or(SwarmError::UnknownAgent(agent))?
            .subscribe(role, group);
        Ok(())
    }

    /// Subscribes every agent in `agents` to `group` under `role`.
    pub fn subscribe_all(&mut self, agents: &[AgentId], role: &str, group: GroupId) -> Result<()> {
        agents
            .iter()
            .try_for_each(|&agent| self.subscribe(agent, role, group))
    }

    /// Drops `role` from `agent`'s subscriptions.
    pub fn unsubscribe(&mut self, agent: AgentId, role: &str) -> Result<Option<GroupId>> {
        Ok(self
            .agent_mut(agent)
            .ok_or(SwarmError::UnknownAgent(agent))?
            .unsubscribe(role))
    }

    /// Nearest member of the group `agent` subscribed under `role`.
    pub fn find_nearest(
        &self,
        agent: AgentId,
        role: &str,
        max_distance: Option<f64>,
    ) -> Option<Nearest> {
        self.agent(agent)?
            .find_nearest(&self.groups, role, max_distance)
    }

    /// Members of the group `agent` subscribed under `role` within `radius`.
    pub fn nearby(&self, agent: AgentId, role: &str, radius: f64) -> Vec<Nearest> {
        self.agent(agent)
            .map(|agent| agent.nearby(&self.groups, role, radius))
            .unwrap_or_default()
    }

    /// Queues new world bounds for the next frame.
    pub fn resize(&mut self, bounds: WorldBounds) -> Result<()> {
        bounds.validate()?;
        self.pending_bounds = Some(bounds);
        Ok(())
    }

    /// Applies queued bounds and refreshes every group's index.
    ///
    /// A failed rebuild is logged and the frame proceeds; that group keeps
    /// answering from its previous snapshot.
    pub fn refresh_indices(&mut self) {
        if let Some(bounds) = self.pending_bounds.take() {
            self.bounds = bounds;
        }
        for group in self.groups.iter_mut() {
            if let Err(e) = group.refresh(self.bounds, self.agents.as_slice()) {
                log::warn!("group {}: index refresh failed: {}", group.name(), e);
            }
        }
    }

    /// Steps every agent once, in population order.
    pub fn step_agents(&mut self, dt: f64) {
        for idx in 0..self.agents.len() {
            let (before, rest) = self.agents.split_at_mut(idx);
            let Some((agent, after)) = rest.split_first_mut() else {
                break;
            };
            agent.step(
                &mut self.groups,
                Peers::new(before, after),
                self.bounds,
                dt,
                &mut self.rng,
            );
        }
    }

    /// Records every agent's position into its history.
    pub fn record_history(&mut self) {
        for agent in &mut self.agents {
            agent.record();
        }
    }

    /// Runs one frame.
    ///
    /// # Arguments
    ///
    /// * `dt` - Time scale; 1.0 is one nominal frame
    pub fn step(&mut self, dt: f64) {
        self.refresh_indices();
        self.step_agents(dt);
        self.record_history();
        self.frame += 1;
        self.time += dt;
    }

    /// Snapshot of the presentation state.
    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            frame: self.frame,
            trails_enabled: self.trails_enabled,
            bounds: self.bounds,
            agents: self
                .agents
                .iter()
                .map(|agent| AgentView {
                    id: agent.id(),
                    tag: agent.tag(),
                    position: agent.position(),
                    heading: agent.heading(),
                    velocity: agent.kind().velocity(agent.heading()),
                    history: agent.history(),
                    links: agent.kind().links(),
                })
                .collect(),
        }
    }

    /// Number of agents per tag, in first-appearance order.
    pub fn census(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for agent in &self.agents {
            match counts.iter_mut().find(|(tag, _)| *tag == agent.tag()) {
                Some((_, count)) => *count += 1,
                None => counts.push((agent.tag(), 1)),
            }
        }
        counts
    }
}
