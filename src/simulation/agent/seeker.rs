//! Seekers accelerate towards the nearest attractor and keep their distance
//! from the nearest member of their own population.

use geo::Coord;

use super::super::boundary::BoundaryPolicy;
use super::super::force::{attract, limit_speed, repel};
use super::super::geometry::heading_of;
use super::{Behavior, Body, Scope, roles};

/// Kinetic state of a seeking agent (bees).
#[derive(Debug, Clone, PartialEq)]
pub struct Seeker {
    /// Current velocity.
    pub velocity: Coord<f64>,
    /// Speed cap.
    pub max_speed: f64,
    /// Pull towards the nearest attractor.
    pub acceleration: f64,
    /// Separation distance from the nearest same-kind member.
    pub min_distance: f64,
    /// Separation push at contact.
    pub repulsion_strength: f64,
    /// Edge handling.
    pub policy: BoundaryPolicy,
}

impl Default for Seeker {
    fn default() -> Self {
        Self {
            velocity: Coord::zero(),
            max_speed: 1.5,
            acceleration: 0.05,
            min_distance: 80.0,
            repulsion_strength: 0.2,
            policy: BoundaryPolicy::Bounce { restitution: 0.8 },
        }
    }
}

impl Behavior for Seeker {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        let ts = scope.dt;
        let here = body.position;

        if let Some(hit) = scope.nearest(roles::ATTRACTOR, here, None) {
            let pull = attract(here, hit.position, hit.distance, self.acceleration);
            self.velocity = self.velocity + pull * ts;
        }

        // Nothing beyond the separation distance pushes, so bound the query by it.
        if let Some(hit) = scope.nearest(roles::SAME, here, Some(self.min_distance)) {
            let push = repel(
                here,
                hit.position,
                hit.distance,
                self.min_distance,
                self.repulsion_strength,
            );
            self.velocity = self.velocity + push * ts;
        }

        self.velocity = limit_speed(self.velocity, self.max_speed);
        body.position = here + self.velocity * ts;

        self.policy
            .apply(&mut body.position, &mut self.velocity, &scope.bounds);
        body.heading = heading_of(self.velocity);
    }
}
