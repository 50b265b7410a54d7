//! Ordered waypoint list with optional side connections

use crate::error::{AgentError, GraphError};
use crate::mode::PathingMode;
use crate::waypoint::{Waypoint, WaypointId, WaypointRegistry};
use glam::Vec3;
use std::sync::Arc;

/// A patrol route
///
/// `waypoints` is the main route. `connections[i]` lists alternates an agent
/// may detour to after reaching `waypoints[i]`; there is always one list per
/// waypoint, possibly empty.
#[derive(Debug, Clone)]
pub struct WaypointGraph {
    registry: Arc<WaypointRegistry>,
    waypoints: Vec<WaypointId>,
    connections: Vec<Vec<WaypointId>>,
}

impl WaypointGraph {
    /// Build a graph, padding missing connection lists with empty ones
    pub fn new(
        registry: Arc<WaypointRegistry>,
        waypoints: Vec<WaypointId>,
        mut connections: Vec<Vec<WaypointId>>,
    ) -> Result<Self, GraphError> {
        if connections.len() > waypoints.len() {
            return Err(GraphError::ConnectionCount {
                waypoints: waypoints.len(),
                connections: connections.len(),
            });
        }

        if let Some(missing) = waypoints
            .iter()
            .chain(connections.iter().flatten())
            .find(|id| !registry.contains(**id))
        {
            return Err(GraphError::UnresolvedWaypoint(missing.to_string()));
        }

        connections.resize_with(waypoints.len(), Vec::new);

        Ok(Self {
            registry,
            waypoints,
            connections,
        })
    }

    /// Build a graph with no side connections from waypoint names
    pub fn from_names(registry: Arc<WaypointRegistry>, names: &[&str]) -> Result<Self, GraphError> {
        let waypoints = names
            .iter()
            .map(|name| registry.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(registry, waypoints, Vec::new())
    }

    /// Add an alternate reachable after `index` (builder pattern)
    ///
    /// Out-of-range indices and unknown ids are ignored with a warning.
    pub fn with_connection(mut self, index: usize, alternate: WaypointId) -> Self {
        if !self.registry.contains(alternate) {
            log::warn!("Ignoring connection to unknown waypoint {}", alternate);
            return self;
        }
        match self.connections.get_mut(index) {
            Some(list) => list.push(alternate),
            None => log::warn!("Ignoring connection from out-of-range index {}", index),
        }
        self
    }

    /// Registry the graph resolves against
    pub fn registry(&self) -> &Arc<WaypointRegistry> {
        &self.registry
    }

    /// Main route
    pub fn waypoint_ids(&self) -> &[WaypointId] {
        &self.waypoints
    }

    /// All connection lists, one per waypoint
    pub fn connection_lists(&self) -> &[Vec<WaypointId>] {
        &self.connections
    }

    /// Alternates reachable after `index`
    pub fn connections(&self, index: usize) -> &[WaypointId] {
        self.connections.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of waypoints on the main route
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the main route is empty
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint id at `index`
    pub fn id_at(&self, index: usize) -> Option<WaypointId> {
        self.waypoints.get(index).copied()
    }

    /// Waypoint at `index`
    pub fn waypoint_at(&self, index: usize) -> Option<&Waypoint> {
        self.id_at(index).and_then(|id| self.registry.get(id))
    }

    /// Look up any registry waypoint
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.registry.get(id)
    }

    /// First index of `id` on the main route
    pub fn index_of(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|&w| w == id)
    }

    /// Index of the main-route waypoint closest to `position`
    pub fn closest_index(&self, position: Vec3) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .filter_map(|(i, &id)| {
                self.registry
                    .get(id)
                    .map(|wp| (i, wp.position.distance_squared(position)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Check the graph can drive an agent in `mode` starting at `start_index`
    pub fn validate_for(&self, mode: PathingMode, start_index: usize) -> Result<(), AgentError> {
        if self.is_empty() {
            return Err(AgentError::EmptyGraph);
        }
        if self.len() < mode.min_waypoints() {
            return Err(AgentError::DegenerateGraph {
                mode,
                count: self.len(),
            });
        }
        if start_index >= self.len() {
            return Err(AgentError::StartIndexOutOfRange {
                index: start_index,
                count: self.len(),
            });
        }
        Ok(())
    }
}
