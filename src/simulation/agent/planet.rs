//! Planets: massive wanderers that wrap around the world edges.

use super::super::boundary::BoundaryPolicy;
use super::{Behavior, Body, Scope, Wanderer};

/// A massive body pulling spaceships.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    /// Wandering motion; uses the wrap policy.
    pub motion: Wanderer,
    /// Relative size (roughly 0.8..2.3).
    pub size: f64,
    /// Gravitational mass, `2 * size²`.
    pub mass: f64,
    /// Collision radius, `⌊18 * size⌋`.
    pub radius: f64,
}

impl Planet {
    /// Creates a planet of the given relative size.
    pub fn new(size: f64, speed: f64, max_turn_rate: f64, heading: f64) -> Self {
        Self {
            motion: Wanderer::new(speed, max_turn_rate, heading, BoundaryPolicy::Wrap),
            size,
            mass: size * size * 2.0,
            radius: (18.0 * size).floor(),
        }
    }
}

impl Behavior for Planet {
    fn step(&mut self, body: &mut Body, scope: &mut Scope<'_>) {
        self.motion.step(body, scope);
    }
}
