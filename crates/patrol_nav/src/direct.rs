//! Direct-line backend for agents without a navigation mesh

use crate::backend::{BackendKind, NavigationBackend, PathResult};
use glam::Vec3;

/// Backend that never plans
///
/// Every destination is accepted as-is and the agent steers itself in a
/// straight line toward it. The body position is whatever the agent last
/// warped it to.
#[derive(Debug, Clone, Default)]
pub struct DirectLineBackend {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    halted: bool,
}

impl DirectLineBackend {
    /// Create a direct-line backend reporting `speed`
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Last destination handed to the backend
    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl NavigationBackend for DirectLineBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DirectLine
    }

    fn set_destination(&mut self, target: Vec3, _accept_radius: f32) -> PathResult {
        self.destination = Some(target);
        PathResult::Complete(target)
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|dest| dest.distance(self.position))
            .unwrap_or(f32::INFINITY)
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_position_control(&mut self, _enabled: bool) {}

    fn set_rotation_control(&mut self, _enabled: bool) {}

    fn has_position_control(&self) -> bool {
        false
    }

    fn has_rotation_control(&self) -> bool {
        false
    }

    fn halt_movement(&mut self, halted: bool) {
        self.halted = halted;
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn is_navigable(&self, _point: Vec3, _max_distance: f32) -> bool {
        true
    }

    fn step(&mut self, _delta_time: f32) {}
}
