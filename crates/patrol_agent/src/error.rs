//! Error types for waypoint graphs and agents

use crate::mode::PathingMode;
use thiserror::Error;

/// Errors raised while resolving a waypoint graph
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// An identifier did not name a waypoint in the registry
    #[error("Unresolved waypoint: {0}")]
    UnresolvedWaypoint(String),

    /// More connection lists than waypoints
    #[error("Graph has {connections} connection lists for {waypoints} waypoints")]
    ConnectionCount { waypoints: usize, connections: usize },
}

/// Errors raised while configuring or starting an agent
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    /// The graph has no waypoints
    #[error("Waypoint graph is empty")]
    EmptyGraph,

    /// Too few waypoints for the pathing mode
    #[error("{mode:?} pathing needs at least 2 waypoints, graph has {count}")]
    DegenerateGraph { mode: PathingMode, count: usize },

    /// Starting index does not address a waypoint
    #[error("Start waypoint index {index} is out of range for {count} waypoints")]
    StartIndexOutOfRange { index: usize, count: usize },

    /// Configuration value out of range
    #[error("Invalid agent configuration: {0}")]
    InvalidConfig(String),

    /// Graph could not be resolved
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised while reading or writing waypoint collections
#[derive(Debug, Error)]
pub enum CollectionError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed collection document
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
