//! Navigation backend driven by a [`NavMesh`]

use crate::backend::{BackendKind, NavigationBackend, PathResult};
use crate::mesh::NavMesh;
use crate::path::NavPath;
use glam::Vec3;

/// Mesh-backed body that plans with A* and walks its path each step
#[derive(Debug, Clone)]
pub struct MeshBackend {
    /// Mesh used for planning and surface sampling
    mesh: NavMesh,
    /// Current position
    position: Vec3,
    /// Velocity over the last step
    velocity: Vec3,
    /// Movement speed
    speed: f32,
    /// Current path
    path: Option<NavPath>,
    /// Acceptance radius of the current destination
    stopping_distance: f32,
    /// Movement suspended
    halted: bool,
    /// Backend moves the body
    position_control: bool,
    /// Backend turns the body
    rotation_control: bool,
}

impl MeshBackend {
    /// Create a backend over `mesh` moving at `speed` units per second
    pub fn new(mesh: NavMesh, speed: f32) -> Self {
        Self {
            mesh,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            speed,
            path: None,
            stopping_distance: 0.0,
            halted: false,
            position_control: true,
            rotation_control: true,
        }
    }

    /// Set the starting position (builder pattern)
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// The mesh this backend plans over
    pub fn mesh(&self) -> &NavMesh {
        &self.mesh
    }

    /// Mutable access to the mesh, e.g. to block polygons at runtime
    pub fn mesh_mut(&mut self) -> &mut NavMesh {
        &mut self.mesh
    }

    /// Current path, if any
    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    /// Acceptance radius of the current destination
    pub fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}

impl NavigationBackend for MeshBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MeshBacked
    }

    fn set_destination(&mut self, target: Vec3, accept_radius: f32) -> PathResult {
        self.stopping_distance = accept_radius;

        match self.mesh.find_path_or_closest(self.position, target) {
            Some((path, complete)) => {
                let Some(destination) = path.destination() else {
                    self.path = None;
                    return PathResult::Unreachable;
                };
                log::debug!(
                    "Planned {} path to {} ({} corners)",
                    if complete { "complete" } else { "partial" },
                    destination,
                    path.points.len()
                );
                self.path = Some(path);
                if complete {
                    PathResult::Complete(destination)
                } else {
                    PathResult::Partial(destination)
                }
            }
            None => {
                log::debug!("No path from {} to {}: start is off the mesh", self.position, target);
                self.path = None;
                PathResult::Unreachable
            }
        }
    }

    fn reset_path(&mut self) {
        self.path = None;
        self.velocity = Vec3::ZERO;
    }

    fn remaining_distance(&self) -> f32 {
        match &self.path {
            Some(path) => path.remaining_distance_from(self.position),
            None => f32::INFINITY,
        }
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.path = None;
    }

    fn set_position_control(&mut self, enabled: bool) {
        self.position_control = enabled;
    }

    fn set_rotation_control(&mut self, enabled: bool) {
        self.rotation_control = enabled;
    }

    fn has_position_control(&self) -> bool {
        self.position_control
    }

    fn has_rotation_control(&self) -> bool {
        self.rotation_control
    }

    fn halt_movement(&mut self, halted: bool) {
        self.halted = halted;
        if halted {
            self.velocity = Vec3::ZERO;
        }
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn is_navigable(&self, point: Vec3, max_distance: f32) -> bool {
        self.mesh.sample_position(point, max_distance).is_some()
    }

    fn step(&mut self, delta_time: f32) {
        if self.halted || !self.position_control || delta_time <= 0.0 {
            self.velocity = Vec3::ZERO;
            return;
        }

        let Some(path) = self.path.as_mut() else {
            self.velocity = Vec3::ZERO;
            return;
        };

        let start = self.position;
        let mut budget = self.speed * delta_time;

        // Spend the move budget across corners so fast bodies don't overshoot
        while budget > 0.0 {
            let Some(point) = path.current_point() else {
                break;
            };

            let to_point = point - self.position;
            let distance = to_point.length();

            if distance <= budget {
                self.position = point;
                budget -= distance;
                path.advance();
            } else {
                self.position += to_point / distance * budget;
                budget = 0.0;
            }
        }

        self.velocity = (self.position - start) / delta_time;
    }
}
