//! Wandering motion: constant speed along a heading that turns, with momentum,
//! towards a target heading re-chosen at random.

use std::f64::consts::PI;

use super::super::boundary::BoundaryPolicy;
use super::super::geometry::{angle_difference, normalize_angle, unit_from_heading};
use super::{Behavior, Body, Scope};

/// Kinetic state of a wandering agent (flowers, red lights, planets).
#[derive(Debug, Clone, PartialEq)]
pub struct Wanderer {
    /// Distance travelled per frame.
    pub speed: f64,
    /// Largest heading change per frame, in radians. Its sign is ignored and
    /// NaN freezes the heading.
    pub max_turn_rate: f64,
    /// Heading the agent is currently turning towards.
    pub target_heading: f64,
    /// Current turn rate, in radians per frame.
    pub angular_velocity: f64,
    /// Gain from heading error to angular acceleration.
    pub angular_acceleration: f64,
    /// Per-frame decay of the angular velocity.
    pub angular_damping: f64,
    /// Per-frame probability of picking a new target heading.
    pub target_change_probability: f64,
    /// Edge handling.
    pub policy: BoundaryPolicy,
}

impl Wanderer {
    /// Creates a wanderer already aimed at `heading`.
    pub fn new(speed: f64, max_turn_rate: f64, heading: f64, policy: BoundaryPolicy) -> Self {
        Self {
            speed,
            max_turn_rate,
            target_heading: heading,
            angular_velocity: 0.0,
            angular_acceleration: 0.001,
            angular_damping: 0.95,
            target_change_probability: 0.02,
            policy,
        }
    }
}

impl Behavior for Wanderer {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        let ts = scope.dt;

        if scope.chance(self.target_change_probability * ts) {
            self.target_heading = scope.random_angle();
        }

        let error = angle_difference(body.heading, self.target_heading);
        self.angular_velocity += error * self.angular_acceleration * ts;
        self.angular_velocity *= self.angular_damping.powf(ts);
        let turn_cap = if self.max_turn_rate.is_nan() {
            0.0
        } else {
            self.max_turn_rate.abs()
        };
        self.angular_velocity = self.angular_velocity.clamp(-turn_cap, turn_cap);

        body.heading = normalize_angle(body.heading + self.angular_velocity * ts);

        let mut velocity = unit_from_heading(body.heading) * self.speed;
        body.position = body.position + velocity * ts;

        let crossing = self
            .policy
            .apply(&mut body.position, &mut velocity, &scope.bounds);

        if crossing.any() && matches!(self.policy, BoundaryPolicy::Bounce { .. }) {
            if crossing.x {
                body.heading = PI - body.heading;
            }
            if crossing.y {
                body.heading = -body.heading;
            }
            body.heading = normalize_angle(body.heading);
            self.target_heading = body.heading;
            self.angular_velocity = 0.0;
        }
    }
}
