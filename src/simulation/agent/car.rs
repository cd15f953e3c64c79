//! Cars drive back and forth along one axis and stop for nearby obstacles.

use std::f64::consts::{FRAC_PI_2, PI};

use geo::{Coord, coord};
use serde::{Deserialize, Serialize};

use super::super::boundary::BoundaryPolicy;
use super::{Behavior, Body, Scope, roles};

/// Axis a car is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Drives left and right.
    Horizontal,
    /// Drives up and down.
    Vertical,
}

/// Kinetic state of a car.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    /// Axis of travel.
    pub axis: Axis,
    /// Cruising speed.
    pub speed: f64,
    /// `1.0` towards increasing coordinates, `-1.0` otherwise.
    pub direction: f64,
    /// Speed this frame; zero while stopped.
    pub current_speed: f64,
    /// Stop when an obstacle is closer than this.
    pub stop_distance: f64,
    /// Stop when crossing traffic is closer than this; `None` never yields.
    pub yield_distance: Option<f64>,
    /// Edge handling; the car turns around whenever an edge is crossed.
    pub policy: BoundaryPolicy,
}

impl Car {
    /// Creates a cruising car.
    pub fn new(axis: Axis, speed: f64, direction: f64) -> Self {
        Self {
            axis,
            speed,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            current_speed: speed,
            stop_distance: 120.0,
            yield_distance: match axis {
                Axis::Horizontal => Some(80.0),
                Axis::Vertical => None,
            },
            policy: BoundaryPolicy::Bounce { restitution: 1.0 },
        }
    }

    /// Velocity this frame.
    pub fn velocity(&self) -> Coord<f64> {
        let v = self.direction * self.current_speed;
        match self.axis {
            Axis::Horizontal => coord! { x: v, y: 0.0 },
            Axis::Vertical => coord! { x: 0.0, y: v },
        }
    }

    /// Facing along the direction of travel.
    pub fn heading(&self) -> f64 {
        match (self.axis, self.direction < 0.0) {
            (Axis::Horizontal, false) => 0.0,
            (Axis::Horizontal, true) => PI,
            (Axis::Vertical, false) => FRAC_PI_2,
            (Axis::Vertical, true) => -FRAC_PI_2,
        }
    }

    fn blocked(&self, body: &Body, scope: &Scope<'_>) -> bool {
        let near = |role: &str, limit: f64| {
            scope
                .nearest(role, body.position, Some(limit))
                .is_some_and(|hit| hit.distance < limit)
        };
        near(roles::OBSTACLE, self.stop_distance)
            || self
                .yield_distance
                .is_some_and(|limit| near(roles::CROSS_TRAFFIC, limit))
    }
}

impl Behavior for Car {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        self.current_speed = if self.blocked(body, scope) {
            0.0
        } else {
            self.speed
        };

        let mut velocity = self.velocity();
        body.position = body.position + velocity * scope.dt;

        let crossing = self
            .policy
            .apply(&mut body.position, &mut velocity, &scope.bounds);
        if crossing.any() {
            self.direction = -self.direction;
        }

        body.heading = self.heading();
    }
}
