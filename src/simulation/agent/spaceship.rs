//! Spaceships drift under the pull of the few nearest massive bodies and
//! bounce elastically off them.

use geo::Coord;

use super::super::boundary::BoundaryPolicy;
use super::super::force::{direction, gravity, limit_speed, reflect};
use super::super::geometry::heading_of;
use super::super::spatial::Nearest;
use super::{Behavior, Body, Scope, roles};

/// Kinetic state of a spaceship.
#[derive(Debug, Clone, PartialEq)]
pub struct Spaceship {
    /// Current velocity.
    pub velocity: Coord<f64>,
    /// Speed cap.
    pub max_speed: f64,
    /// Per-frame velocity retention.
    pub drag: f64,
    /// Collision radius.
    pub radius: f64,
    /// Speed kept after bouncing off a planet or an edge.
    pub restitution: f64,
    /// Gravitational constant.
    pub gravity: f64,
    /// Bodies at or beyond this distance do not pull.
    pub max_gravity_distance: f64,
    /// How many of the nearest massive bodies pull at once.
    pub attractor_count: usize,
    /// Bodies that pulled during the last step, closest first.
    pub pulled_by: Vec<Nearest>,
    /// Edge handling.
    pub policy: BoundaryPolicy,
}

impl Spaceship {
    /// Creates a spaceship with the given initial velocity.
    pub fn new(velocity: Coord<f64>) -> Self {
        Self {
            velocity,
            ..Self::default()
        }
    }
}

impl Default for Spaceship {
    fn default() -> Self {
        Self {
            velocity: Coord::zero(),
            max_speed: 2.0,
            drag: 0.999,
            radius: 12.0,
            restitution: 1.0,
            gravity: 10.0,
            max_gravity_distance: 500.0,
            attractor_count: 3,
            pulled_by: Vec::new(),
            policy: BoundaryPolicy::Bounce { restitution: 1.0 },
        }
    }
}

impl Behavior for Spaceship {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        let ts = scope.dt;
        let here = body.position;

        let mut nearby = scope.k_nearest(
            roles::MASSIVE,
            here,
            self.attractor_count,
            Some(self.max_gravity_distance),
        );
        nearby.retain(|hit| hit.distance < self.max_gravity_distance);

        let mut pull = Coord::zero();
        for hit in &nearby {
            // Bodies without planet data pull with unit mass and have no extent.
            let (mass, planet_radius) = scope
                .peer(hit.id)
                .and_then(|agent| agent.kind().as_planet())
                .map_or((1.0, 0.0), |planet| (planet.mass, planet.radius));

            pull = pull + gravity(here, hit.position, hit.distance, self.gravity, mass);

            let contact = self.radius + planet_radius;
            if hit.distance < contact
                && let Some(outward) = direction(hit.position, here, hit.distance)
            {
                self.velocity = reflect(self.velocity, outward) * self.restitution;
                body.position = hit.position + outward * contact;
            }
        }
        self.pulled_by = nearby;

        self.velocity = self.velocity + pull * ts;
        self.velocity = self.velocity * self.drag.powf(ts);
        self.velocity = limit_speed(self.velocity, self.max_speed);

        body.position = body.position + self.velocity * ts;
        if self.velocity != Coord::zero() {
            body.heading = heading_of(self.velocity);
        }

        self.policy
            .apply(&mut body.position, &mut self.velocity, &scope.bounds);
    }
}
