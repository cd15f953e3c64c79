//! # Swarm - Shared Agent Swarm Simulation Core
//!
//! A simulation substrate for small populations of autonomous agents (bees
//! seeking flowers, rock/paper/scissors chase rings, predator/prey chains,
//! spaceships pulled by planets, cars stopping at red lights). Every frame each
//! agent asks "who is my nearest neighbor in group G?" and reacts with simple
//! force rules.
//!
//! ## Features
//!
//! - Nearest-neighbor groups backed by a linear scan, a quadtree or a k-d tree
//! - Role-based subscriptions that decouple agent logic from group wiring
//! - k-nearest queries emulated by transient removal and re-insertion
//! - Bounce, wrap and soft-clamp boundary policies
//! - A deterministic refresh → step → record frame loop with seeded randomness
//! - Five ready-made scenarios configurable through JSON
//!
//! ## Core Modules
//!
//! - [`simulation::spatial`] - Nearest-neighbor index strategies
//! - [`simulation::group`] - Queryable agent groups
//! - [`simulation::subscription`] - Role to group registry
//! - [`simulation::agent`] - Agent state and per-kind behavior
//! - [`simulation::swarm`] - World state and the per-frame update
//! - [`simulation::session`] - Start/stop/resize lifecycle around the frame loop
//! - [`simulation::scenario`] - Demo population wiring

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agents, their shared body state and per-kind behavior.
    pub mod agent;
    /// Boundary policies applied after integrating an agent's position.
    pub mod boundary;
    /// Error type shared by the whole crate.
    pub mod error;
    /// Force composition helpers with degenerate-distance guards.
    pub mod force;
    /// World bounds and small vector utilities.
    pub mod geometry;
    /// Queryable, identity-unique collections of agents.
    pub mod group;
    /// Bounded most-recent-first position history.
    pub mod history;
    /// Traits for entities that expose a position.
    ///
    /// Groups read member positions through [`locatable::PositionSource`] when
    /// they refresh their spatial index.
    pub mod locatable;
    /// Simulation parameters and per-scenario configuration.
    pub mod params;
    /// Scenario builders wiring populations, groups and roles.
    pub mod scenario;
    /// Start/stop lifecycle around the frame loop.
    pub mod session;
    /// Nearest-neighbor index strategies.
    pub mod spatial;
    /// Per-agent role registry.
    pub mod subscription;
    /// World state and the refresh → step → record frame.
    pub mod swarm;
}
