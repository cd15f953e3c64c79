//! World bounds and small geometric helpers shared by agents and groups.

use std::f64::consts::{PI, TAU};

use geo::algorithm::Distance;
use geo::{Coord, Euclidean, Point, Rect, coord};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SwarmError};

/// The shared world rectangle.
///
/// Written only by the driver between frames (on resize); groups read it to
/// organize partitioned storage and agents read it for their boundary policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl WorldBounds {
    /// Creates bounds from an origin and an extent.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates bounds anchored at the origin, the usual canvas shape.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Checks that the origin is finite and the extent strictly positive.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(SwarmError::InvalidBounds(format!(
                "non-finite component in {self:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(SwarmError::InvalidBounds(format!(
                "extent must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Top-left corner.
    pub fn min(&self) -> Coord<f64> {
        coord! { x: self.x, y: self.y }
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Coord<f64> {
        coord! { x: self.x + self.width, y: self.y + self.height }
    }

    /// The same rectangle as a `geo` geometry.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(self.min(), self.max())
    }

    /// Whether `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Shrinks the rectangle by `margin` (a fraction of the extent) on every side.
    ///
    /// `inset(0.1)` yields the 10%..90% play area.
    pub fn inset(&self, margin: f64) -> Self {
        Self::new(
            self.x + self.width * margin,
            self.y + self.height * margin,
            self.width * (1.0 - 2.0 * margin),
            self.height * (1.0 - 2.0 * margin),
        )
    }

    /// Uniformly random point inside the rectangle.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Coord<f64> {
        coord! {
            x: self.x + rng.random::<f64>() * self.width,
            y: self.y + rng.random::<f64>() * self.height
        }
    }
}

/// Squared Euclidean distance between two points.
pub fn distance_squared(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two points.
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(Point::from(a), Point::from(b))
}

/// Length of a vector.
pub fn length(v: Coord<f64>) -> f64 {
    v.x.hypot(v.y)
}

/// Squared distance from `p` to the closest point of `rect`; zero when `p` is inside.
pub fn rect_distance_squared(rect: &Rect<f64>, p: Coord<f64>) -> f64 {
    let min = rect.min();
    let max = rect.max();
    let closest = coord! {
        x: p.x.clamp(min.x, max.x),
        y: p.y.clamp(min.y, max.y)
    };
    distance_squared(p, closest)
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Signed smallest rotation that turns `from` into `to`, in `[-π, π)`.
pub fn angle_difference(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Heading of a velocity vector; a zero vector faces angle 0.
pub fn heading_of(v: Coord<f64>) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Unit vector pointing along `heading`.
pub fn unit_from_heading(heading: f64) -> Coord<f64> {
    coord! { x: heading.cos(), y: heading.sin() }
}
