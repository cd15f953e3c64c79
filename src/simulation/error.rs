//! Error taxonomy for the simulation core.
//!
//! Absent neighbors and unknown roles are not errors; queries report them as
//! `None`. Errors only arise while building a world from configuration or when
//! a spatial index refuses a point.

use thiserror::Error;

use super::agent::AgentId;
use super::group::GroupId;

/// Errors emitted while configuring or indexing a swarm.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// World bounds with a non-finite origin or a non-positive extent.
    #[error("invalid world bounds: {0}")]
    InvalidBounds(String),
    /// A configuration value that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An agent id that does not belong to this world.
    #[error("unknown agent {0:?}")]
    UnknownAgent(AgentId),
    /// A group id that does not belong to this world.
    #[error("unknown group {0:?}")]
    UnknownGroup(GroupId),
    /// The k-d tree backend rejected a point (wrong dimension, non-finite coordinate).
    #[error("spatial index rejected point: {0:?}")]
    Index(kdtree::ErrorKind),
    /// Reading or writing a configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration JSON could not be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<kdtree::ErrorKind> for SwarmError {
    fn from(kind: kdtree::ErrorKind) -> Self {
        Self::Index(kind)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SwarmError>;
