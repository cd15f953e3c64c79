//! Chasers flee the nearest attacker, chase the nearest target and separate
//! from the nearest member of their own population.
//!
//! Rock/paper/scissors rings and dog/cat/mouse chains are both built from this
//! one rule; only the role wiring and the coefficients differ.

use geo::{Coord, coord};

use super::super::boundary::BoundaryPolicy;
use super::super::force::{attract, flee, limit_speed, repel};
use super::super::geometry::heading_of;
use super::{Behavior, Body, Scope, roles};

/// Kinetic state of a chasing agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Chaser {
    /// Current velocity.
    pub velocity: Coord<f64>,
    /// Speed cap, applied before jitter.
    pub max_speed: f64,
    /// Separation distance from the nearest same-kind member.
    pub min_distance: f64,
    /// Separation push at contact.
    pub repulsion_strength: f64,
    /// Push away from the nearest attacker.
    pub flee_strength: f64,
    /// Pull towards the nearest target.
    pub chase_strength: f64,
    /// Width of the uniform random nudge added each frame.
    pub jitter: f64,
    /// Edge handling.
    pub policy: BoundaryPolicy,
}

impl Default for Chaser {
    fn default() -> Self {
        Self {
            velocity: Coord::zero(),
            max_speed: 2.0,
            min_distance: 60.0,
            repulsion_strength: 0.5,
            flee_strength: 0.3,
            chase_strength: 0.2,
            jitter: 0.1,
            policy: BoundaryPolicy::SoftClamp { margin: 0.1 },
        }
    }
}

impl Behavior for Chaser {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        let ts = scope.dt;
        let here = body.position;
        let mut force = Coord::zero();

        if let Some(hit) = scope.nearest(roles::ATTACKER, here, None) {
            force = force + flee(here, hit.position, hit.distance, self.flee_strength);
        }

        if let Some(hit) = scope.nearest(roles::TARGET, here, None) {
            force = force + attract(here, hit.position, hit.distance, self.chase_strength);
        }

        if let Some(hit) = scope.nearest(roles::SAME, here, Some(self.min_distance)) {
            force = force
                + repel(
                    here,
                    hit.position,
                    hit.distance,
                    self.min_distance,
                    self.repulsion_strength,
                );
        }

        self.velocity = limit_speed(self.velocity + force * ts, self.max_speed);

        // Keeps agents from settling into exact equilibria.
        let nudge = coord! { x: scope.jitter(self.jitter), y: scope.jitter(self.jitter) };
        self.velocity = self.velocity + nudge;

        body.position = here + self.velocity * ts;
        self.policy
            .apply(&mut body.position, &mut self.velocity, &scope.bounds);
        body.heading = heading_of(self.velocity);
    }
}
