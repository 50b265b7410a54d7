//! Body transform and rotation helpers

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and facing of an agent's body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl AgentTransform {
    /// Transform at `position` facing +Z
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Direction the body faces
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Body up axis
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for AgentTransform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

/// Rotation whose +Z looks along `forward` with +Y as close to `up` as possible
///
/// Returns `None` when `forward` is zero or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let right = up.cross(forward).try_normalize()?;
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Turn `from` toward `to` by at most `max_radians`
///
/// Lands exactly on `to` once within the step.
pub fn rotate_towards(from: Quat, to: Quat, max_radians: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_radians.max(0.0) || angle < 1e-5 {
        return to;
    }
    from.slerp(to, max_radians / angle).normalize()
}

/// Angle in degrees from `from` to `to`, signed by the rotation sense about `axis`
///
/// Zero when either vector is zero.
pub fn signed_angle_deg(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    if from.length_squared() < 1e-12 || to.length_squared() < 1e-12 {
        return 0.0;
    }
    let angle = from.angle_between(to).to_degrees();
    if axis.dot(from.cross(to)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Rotation facing `point` from `origin`, kept level about +Y
pub fn level_facing(origin: Vec3, point: Vec3) -> Option<Quat> {
    let mut direction = point - origin;
    direction.y = 0.0;
    look_rotation(direction, Vec3::Y)
}
