//! Agents: point entities with a position, a heading, a bounded history and
//! one of a closed set of behaviors.

mod behavior;
mod car;
mod chaser;
mod planet;
mod seeker;
mod spaceship;
mod wanderer;

use geo::Coord;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::WorldBounds;
use super::group::{GroupId, Groups};
use super::history::History;
use super::locatable::Locatable;
use super::spatial::Nearest;
use super::subscription::Subscriptions;

pub use behavior::{Behavior, Peers, Scope};
pub use car::{Axis, Car};
pub use chaser::Chaser;
pub use planet::Planet;
pub use seeker::Seeker;
pub use spaceship::Spaceship;
pub use wanderer::Wanderer;

/// Role names agent kinds query. Scenarios decide which group serves each one.
pub mod roles {
    /// Something to accelerate towards (flowers for bees).
    pub const ATTRACTOR: &str = "attractor";
    /// Members of the agent's own population, used for separation.
    pub const SAME: &str = "same";
    /// Something to flee from.
    pub const ATTACKER: &str = "attacker";
    /// Something to chase.
    pub const TARGET: &str = "target";
    /// Massive bodies pulling spaceships.
    pub const MASSIVE: &str = "massive";
    /// Things a car must stop for.
    pub const OBSTACLE: &str = "obstacle";
    /// Crossing traffic a car yields to.
    pub const CROSS_TRAFFIC: &str = "cross_traffic";
}

/// Identity of an agent; also its index in the owning population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl AgentId {
    /// Index of the agent in its population.
    pub fn index(self) -> usize {
        self.0
    }
}

/// State every agent kind shares.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Current location.
    pub position: Coord<f64>,
    /// Facing in radians, for presentation only.
    pub heading: f64,
    /// Recent positions, newest first.
    pub history: History,
}

impl Body {
    /// Creates a body with an empty history.
    pub fn new(position: Coord<f64>, heading: f64) -> Self {
        Self {
            position,
            heading,
            history: History::default(),
        }
    }
}

/// The closed set of agent behaviors.
#[derive(Debug, Clone)]
pub enum AgentKind {
    /// Steers towards a randomly re-chosen heading (flowers, red lights).
    Wanderer(Wanderer),
    /// A massive wanderer that wraps around the world (planets).
    Planet(Planet),
    /// Seeks an attractor while keeping distance from its own kind (bees).
    Seeker(Seeker),
    /// Flees attackers, chases targets, separates from its own kind.
    Chaser(Chaser),
    /// Pulled by the nearest massive bodies.
    Spaceship(Spaceship),
    /// Drives along one axis and stops for obstacles.
    Car(Car),
}

impl AgentKind {
    /// Planet data when this is a planet.
    pub fn as_planet(&self) -> Option<&Planet> {
        match self {
            Self::Planet(planet) => Some(planet),
            _ => None,
        }
    }

    /// Current velocity, derived for heading-driven kinds.
    pub fn velocity(&self, heading: f64) -> Coord<f64> {
        match self {
            Self::Wanderer(w) => super::geometry::unit_from_heading(heading) * w.speed,
            Self::Planet(p) => super::geometry::unit_from_heading(heading) * p.motion.speed,
            Self::Seeker(s) => s.velocity,
            Self::Chaser(c) => c.velocity,
            Self::Spaceship(s) => s.velocity,
            Self::Car(c) => c.velocity(),
        }
    }

    /// Neighbors that influenced the last step, for drawing links.
    pub fn links(&self) -> &[Nearest] {
        match self {
            Self::Spaceship(ship) => &ship.pulled_by,
            _ => &[],
        }
    }
}

impl Behavior for AgentKind {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        match self {
            Self::Wanderer(kind) => kind.step(body, scope),
            Self::Planet(kind) => kind.step(body, scope),
            Self::Seeker(kind) => kind.step(body, scope),
            Self::Chaser(kind) => kind.step(body, scope),
            Self::Spaceship(kind) => kind.step(body, scope),
            Self::Car(kind) => kind.step(body, scope),
        }
    }
}

/// An autonomous simulated entity.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    tag: &'static str,
    body: Body,
    kind: AgentKind,
    subscriptions: Subscriptions,
}

impl Agent {
    /// Creates an agent with no subscriptions.
    ///
    /// # Arguments
    ///
    /// * `id` - Identity; must equal the agent's index in its population
    /// * `tag` - Presentation label such as `"bee"` or `"rock"`
    /// * `position` - Initial location
    /// * `heading` - Initial facing in radians
    /// * `kind` - Behavior and kinetic state
    pub fn new(
        id: AgentId,
        tag: &'static str,
        position: Coord<f64>,
        heading: f64,
        kind: AgentKind,
    ) -> Self {
        Self {
            id,
            tag,
            body: Body::new(position, heading),
            kind,
            subscriptions: Subscriptions::new(),
        }
    }

    /// Presentation label.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Shared body state.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable body state, for placing agents outside a frame.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Behavior and kinetic state.
    pub fn kind(&self) -> &AgentKind {
        &self.kind
    }

    /// Mutable behavior state.
    pub fn kind_mut(&mut self) -> &mut AgentKind {
        &mut self.kind
    }

    /// Recent positions, newest first.
    pub fn history(&self) -> &History {
        &self.body.history
    }

    /// Role wiring.
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Serves `role` from `group`, replacing any previous association.
    pub fn subscribe(&mut self, role: impl Into<String>, group: GroupId) {
        self.subscriptions.subscribe(role, group);
    }

    /// Drops the association for `role`.
    pub fn unsubscribe(&mut self, role: &str) -> Option<GroupId> {
        self.subscriptions.unsubscribe(role)
    }

    /// Nearest member of the group serving `role`, excluding this agent.
    pub fn find_nearest(
        &self,
        groups: &Groups,
        role: &str,
        max_distance: Option<f64>,
    ) -> Option<Nearest> {
        self.subscriptions.find_nearest_by_role(
            groups,
            role,
            self.id,
            self.body.position,
            max_distance,
        )
    }

    /// Members of the group serving `role` within `radius`, excluding this agent.
    pub fn nearby(&self, groups: &Groups, role: &str, radius: f64) -> Vec<Nearest> {
        self.subscriptions
            .within_by_role(groups, role, self.id, self.body.position, radius)
    }

    /// Advances this agent by one frame.
    ///
    /// # Arguments
    ///
    /// * `groups` - Every group of the world, refreshed for this frame
    /// * `peers` - The rest of the population
    /// * `bounds` - World extent for this frame
    /// * `dt` - Time scale (1.0 is one nominal frame)
    /// * `rng` - Simulation randomness
    pub fn step(
        &mut self,
        groups: &mut Groups,
        peers: Peers<'_>,
        bounds: WorldBounds,
        dt: f64,
        rng: &mut Pcg32,
    ) {
        let Self {
            id,
            body,
            kind,
            subscriptions,
            ..
        } = self;
        let mut scope = Scope {
            id: *id,
            subscriptions,
            groups,
            peers,
            bounds,
            dt,
            rng,
        };
        kind.step(body, &mut scope);
    }

    /// Appends the current position to the history.
    pub fn record(&mut self) {
        self.body.history.push(self.body.position);
    }
}

impl Locatable for Agent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> Coord<f64> {
        self.body.position
    }

    fn heading(&self) -> f64 {
        self.body.heading
    }
}
