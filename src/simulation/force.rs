//! Force composition rules shared by the agent kinds.
//!
//! Every rule normalizes the direction to the neighbor before scaling it by a
//! strength coefficient. A neighbor at (near) zero distance has no direction,
//! so it contributes nothing for that frame instead of producing a non-finite
//! value.

use geo::{Coord, coord};

/// Distances at or below this are treated as coincident points.
pub const MIN_DISTANCE: f64 = 1e-9;

/// Unit vector from `from` towards `to`, or `None` when the points coincide.
///
/// `distance` is the already known distance between the two points.
pub fn direction(from: Coord<f64>, to: Coord<f64>, distance: f64) -> Option<Coord<f64>> {
    if !distance.is_finite() || distance <= MIN_DISTANCE {
        return None;
    }
    Some((to - from) / distance)
}

/// Pull of `strength` towards `to`.
pub fn attract(from: Coord<f64>, to: Coord<f64>, distance: f64, strength: f64) -> Coord<f64> {
    direction(from, to, distance).map_or_else(Coord::zero, |dir| dir * strength)
}

/// Push of `strength` away from `to`.
pub fn flee(from: Coord<f64>, to: Coord<f64>, distance: f64, strength: f64) -> Coord<f64> {
    -attract(from, to, distance, strength)
}

/// Separation push away from `to`, active only inside `min_distance`.
///
/// The push grows linearly from 0 at `min_distance` to `strength` at contact.
pub fn repel(
    from: Coord<f64>,
    to: Coord<f64>,
    distance: f64,
    min_distance: f64,
    strength: f64,
) -> Coord<f64> {
    if distance >= min_distance {
        return Coord::zero();
    }
    let factor = (min_distance - distance) / min_distance;
    flee(from, to, distance, factor * strength)
}

/// Newtonian pull `g * mass / distance²` towards a body at `to`.
pub fn gravity(from: Coord<f64>, to: Coord<f64>, distance: f64, g: f64, mass: f64) -> Coord<f64> {
    attract(from, to, distance, g * mass / (distance * distance))
}

/// Scales `velocity` down to `max_speed` when it is faster.
pub fn limit_speed(velocity: Coord<f64>, max_speed: f64) -> Coord<f64> {
    let speed_sq = velocity.x * velocity.x + velocity.y * velocity.y;
    if speed_sq > max_speed * max_speed {
        velocity * (max_speed / speed_sq.sqrt())
    } else {
        velocity
    }
}

/// Reflects `velocity` about the unit `normal`: `v - 2 (v·n) n`.
pub fn reflect(velocity: Coord<f64>, normal: Coord<f64>) -> Coord<f64> {
    let dot = velocity.x * normal.x + velocity.y * normal.y;
    coord! { x: velocity.x - 2.0 * dot * normal.x, y: velocity.y - 2.0 * dot * normal.y }
}
