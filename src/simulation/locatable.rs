//! Traits for entities that expose a position.
//!
//! Groups never own agents; they hold ids and read positions through a
//! [`PositionSource`] whenever their spatial index is refreshed.

use std::collections::BTreeMap;

use geo::Coord;

use super::agent::AgentId;

/// Trait for entities with an identity and a position in 2D space.
pub trait Locatable {
    /// Identity of the entity.
    fn id(&self) -> AgentId;

    /// Current position.
    fn position(&self) -> Coord<f64>;

    /// Current heading in radians (presentation only).
    fn heading(&self) -> f64;
}

/// Lookup of current positions by agent id.
pub trait PositionSource {
    /// Position of `id`, or `None` if no such agent exists.
    fn position_of(&self, id: AgentId) -> Option<Coord<f64>>;
}

/// A population stored so that each entity's id is its index.
impl<T: Locatable> PositionSource for [T] {
    fn position_of(&self, id: AgentId) -> Option<Coord<f64>> {
        self.get(id.index())
            .filter(|entity| entity.id() == id)
            .map(Locatable::position)
    }
}

impl PositionSource for BTreeMap<AgentId, Coord<f64>> {
    fn position_of(&self, id: AgentId) -> Option<Coord<f64>> {
        self.get(&id).copied()
    }
}
