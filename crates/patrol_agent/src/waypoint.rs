//! Waypoints and the registry that owns them

use crate::error::GraphError;
use crate::events::{WaypointEventType, WaypointEvents};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable handle to a waypoint in a [`WaypointRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaypointId(pub u32);

impl std::fmt::Display for WaypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point an agent can travel to
pub struct Waypoint {
    /// Unique name, used by saved collections
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Facing the agent turns to on arrival
    pub rotation: Quat,
    /// Acceptance radius
    pub stopping_distance: f32,
    /// Dwell time in seconds
    pub wait_time: f32,
    hooks: WaypointEvents,
}

impl Waypoint {
    /// Default acceptance radius
    pub const DEFAULT_STOPPING_DISTANCE: f32 = 0.5;

    /// Create a waypoint at `position`
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
            stopping_distance: Self::DEFAULT_STOPPING_DISTANCE,
            wait_time: 0.0,
            hooks: WaypointEvents::new(),
        }
    }

    /// Set the arrival facing
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Face along `yaw_degrees` about +Y on arrival
    pub fn with_yaw(self, yaw_degrees: f32) -> Self {
        self.with_rotation(Quat::from_rotation_y(yaw_degrees.to_radians()))
    }

    /// Set the acceptance radius
    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.stopping_distance = distance.max(0.0);
        self
    }

    /// Set the dwell time
    pub fn with_wait_time(mut self, seconds: f32) -> Self {
        self.wait_time = seconds.max(0.0);
        self
    }

    /// Add a hook run when an agent reaches this waypoint on its route
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.add_enter_listener(callback);
        self
    }

    /// Add a hook run when an agent leaves this waypoint
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.add_exit_listener(callback);
        self
    }

    /// Direction the arrival facing looks along
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Hooks attached to this waypoint
    pub fn hooks(&self) -> &WaypointEvents {
        &self.hooks
    }

    pub(crate) fn fire(&self, event_type: WaypointEventType) {
        self.hooks.fire(event_type);
    }
}

impl std::fmt::Debug for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waypoint")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("stopping_distance", &self.stopping_distance)
            .field("wait_time", &self.wait_time)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Owns waypoints and resolves them by id or name
///
/// Usually built once, wrapped in an `Arc`, and shared by every graph and
/// agent in a scene.
#[derive(Debug, Default)]
pub struct WaypointRegistry {
    waypoints: Vec<Waypoint>,
    by_name: HashMap<String, WaypointId>,
}

impl WaypointRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a waypoint, returning its id
    ///
    /// A later waypoint with an existing name takes over name lookups.
    pub fn insert(&mut self, waypoint: Waypoint) -> WaypointId {
        let id = WaypointId(self.waypoints.len() as u32);
        if let Some(previous) = self.by_name.insert(waypoint.name.clone(), id) {
            log::warn!(
                "Waypoint name '{}' reused; {} now shadows {}",
                waypoint.name,
                id,
                previous
            );
        }
        self.waypoints.push(waypoint);
        id
    }

    /// Look up a waypoint
    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id.0 as usize)
    }

    /// Mutable access, e.g. to move a waypoint before sharing the registry
    pub fn get_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(id.0 as usize)
    }

    /// Find a waypoint id by name
    pub fn find(&self, name: &str) -> Option<WaypointId> {
        self.by_name.get(name).copied()
    }

    /// Find a waypoint id by name, failing if absent
    pub fn resolve(&self, name: &str) -> std::result::Result<WaypointId, GraphError> {
        self.find(name)
            .ok_or_else(|| GraphError::UnresolvedWaypoint(name.to_string()))
    }

    /// Whether `id` names a waypoint here
    pub fn contains(&self, id: WaypointId) -> bool {
        (id.0 as usize) < self.waypoints.len()
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterate over ids and waypoints
    pub fn iter(&self) -> impl Iterator<Item = (WaypointId, &Waypoint)> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| (WaypointId(i as u32), wp))
    }
}
