//! Boundary policies applied after an agent integrates its position.
//!
//! The policy is chosen per agent kind at construction time and applied the same
//! way every frame.

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::geometry::WorldBounds;

/// What happens when an agent leaves the world rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clamp to the crossed edge and reflect the perpendicular velocity
    /// component, scaled by `restitution`.
    Bounce {
        /// Fraction of speed kept after the reflection (1.0 is elastic).
        restitution: f64,
    },
    /// Teleport to the opposite edge; velocity is untouched.
    Wrap,
    /// Clamp into the rectangle shrunk by `margin` on each side; velocity is untouched.
    SoftClamp {
        /// Fraction of the extent excluded on every side.
        margin: f64,
    },
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self::Bounce { restitution: 1.0 }
    }
}

/// Which axes hit an edge while a policy was applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    /// A left or right edge was crossed.
    pub x: bool,
    /// A top or bottom edge was crossed.
    pub y: bool,
}

impl Crossing {
    /// Whether any edge was crossed.
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

impl BoundaryPolicy {
    /// Applies the policy to a freshly integrated position.
    ///
    /// # Arguments
    ///
    /// * `position` - Position after integration, corrected in place
    /// * `velocity` - Velocity used for the integration, reflected in place by `Bounce`
    /// * `bounds` - Current world rectangle
    ///
    /// # Returns
    ///
    /// The axes on which an edge was crossed.
    pub fn apply(
        &self,
        position: &mut Coord<f64>,
        velocity: &mut Coord<f64>,
        bounds: &WorldBounds,
    ) -> Crossing {
        match *self {
            Self::Bounce { restitution } => {
                let min = bounds.min();
                let max = bounds.max();
                Crossing {
                    x: bounce_axis(&mut position.x, &mut velocity.x, min.x, max.x, restitution),
                    y: bounce_axis(&mut position.y, &mut velocity.y, min.y, max.y, restitution),
                }
            }
            Self::Wrap => {
                let min = bounds.min();
                let max = bounds.max();
                Crossing {
                    x: wrap_axis(&mut position.x, min.x, max.x),
                    y: wrap_axis(&mut position.y, min.y, max.y),
                }
            }
            Self::SoftClamp { margin } => {
                let area = bounds.inset(margin);
                let min = area.min();
                let max = area.max();
                Crossing {
                    x: clamp_axis(&mut position.x, min.x, max.x),
                    y: clamp_axis(&mut position.y, min.y, max.y),
                }
            }
        }
    }
}

fn bounce_axis(p: &mut f64, v: &mut f64, min: f64, max: f64, restitution: f64) -> bool {
    if *p < min {
        *p = min;
    } else if *p > max {
        *p = max;
    } else {
        return false;
    }
    *v = -*v * restitution;
    true
}

fn wrap_axis(p: &mut f64, min: f64, max: f64) -> bool {
    if *p < min {
        *p = max;
    } else if *p > max {
        *p = min;
    } else {
        return false;
    }
    true
}

fn clamp_axis(p: &mut f64, min: f64, max: f64) -> bool {
    if *p < min {
        *p = min;
    } else if *p > max {
        *p = max;
    } else {
        return false;
    }
    true
}
