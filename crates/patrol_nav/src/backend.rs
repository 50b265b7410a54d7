//! The movement backend seen by a patrol agent

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which movement capability a backend offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Paths are planned over a navigation mesh and the backend moves the body
    MeshBacked,
    /// No planning; the agent moves itself in a straight line
    DirectLine,
}

/// Verdict of a destination request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathResult {
    /// A full path was found; carries the destination the backend settled on
    Complete(Vec3),
    /// Only a path to the closest reachable point was found
    Partial(Vec3),
    /// The query has not finished yet
    Pending,
    /// No path could be computed
    Unreachable,
}

impl PathResult {
    /// Destination reported by the backend, if any
    pub fn destination(&self) -> Option<Vec3> {
        match self {
            Self::Complete(dest) | Self::Partial(dest) => Some(*dest),
            Self::Pending | Self::Unreachable => None,
        }
    }

    /// Whether the result is usable for a target with the given acceptance radius
    ///
    /// A backend may silently substitute the closest reachable point and still
    /// call the path complete, so the reported destination is checked against
    /// the requested target instead of trusting the status.
    pub fn is_acceptable(&self, target: Vec3, accept_radius: f32) -> bool {
        match self {
            Self::Complete(dest) => dest.distance(target) <= accept_radius,
            _ => false,
        }
    }
}

/// Path planning and body movement for an agent
///
/// All calls are synchronous. A backend that plans asynchronously answers
/// [`PathResult::Pending`] and the caller delivers the verdict later.
pub trait NavigationBackend {
    /// Capability of this backend
    fn kind(&self) -> BackendKind;

    /// Request a path to `target`, stopping within `accept_radius`
    fn set_destination(&mut self, target: Vec3, accept_radius: f32) -> PathResult;

    /// Drop the current path and stand still
    fn reset_path(&mut self);

    /// Distance left along the current path
    fn remaining_distance(&self) -> f32;

    /// Whether a path query is still in flight
    fn is_path_pending(&self) -> bool;

    /// Teleport the body without planning
    fn warp(&mut self, position: Vec3);

    /// Allow or forbid the backend to move the body
    fn set_position_control(&mut self, enabled: bool);

    /// Allow or forbid the backend to turn the body
    fn set_rotation_control(&mut self, enabled: bool);

    /// Whether the backend currently owns the body's position
    fn has_position_control(&self) -> bool;

    /// Whether the backend currently owns the body's facing
    fn has_rotation_control(&self) -> bool;

    /// Suspend or resume movement along the current path
    fn halt_movement(&mut self, halted: bool);

    /// Whether movement is suspended
    fn is_halted(&self) -> bool;

    /// Current body position
    fn position(&self) -> Vec3;

    /// Current body velocity
    fn velocity(&self) -> Vec3;

    /// Travel speed in units per second
    fn speed(&self) -> f32;

    /// Whether `point` lies within `max_distance` of a navigable surface
    fn is_navigable(&self, point: Vec3, max_distance: f32) -> bool;

    /// Advance the body along its path
    fn step(&mut self, delta_time: f32);
}

impl<B: NavigationBackend + ?Sized> NavigationBackend for Box<B> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn set_destination(&mut self, target: Vec3, accept_radius: f32) -> PathResult {
        (**self).set_destination(target, accept_radius)
    }

    fn reset_path(&mut self) {
        (**self).reset_path()
    }

    fn remaining_distance(&self) -> f32 {
        (**self).remaining_distance()
    }

    fn is_path_pending(&self) -> bool {
        (**self).is_path_pending()
    }

    fn warp(&mut self, position: Vec3) {
        (**self).warp(position)
    }

    fn set_position_control(&mut self, enabled: bool) {
        (**self).set_position_control(enabled)
    }

    fn set_rotation_control(&mut self, enabled: bool) {
        (**self).set_rotation_control(enabled)
    }

    fn has_position_control(&self) -> bool {
        (**self).has_position_control()
    }

    fn has_rotation_control(&self) -> bool {
        (**self).has_rotation_control()
    }

    fn halt_movement(&mut self, halted: bool) {
        (**self).halt_movement(halted)
    }

    fn is_halted(&self) -> bool {
        (**self).is_halted()
    }

    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn velocity(&self) -> Vec3 {
        (**self).velocity()
    }

    fn speed(&self) -> f32 {
        (**self).speed()
    }

    fn is_navigable(&self, point: Vec3, max_distance: f32) -> bool {
        (**self).is_navigable(point, max_distance)
    }

    fn step(&mut self, delta_time: f32) {
        (**self).step(delta_time)
    }
}
