//! Tether cone test

use crate::config::TetherConfig;
use crate::motion::signed_angle_deg;
use glam::Vec3;

/// Result of checking an agent against its tether
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetherVerdict {
    /// Keep moving
    Free,
    /// Outside the radius and heading outside the allowed cone
    Suspend,
}

/// Check whether an agent at `position` heading for `target` strays from `anchor`
///
/// The heading angle is measured about +Y from the direction to the target to
/// the direction to the anchor. Inside `radius` the agent is always free.
pub fn evaluate(config: &TetherConfig, position: Vec3, target: Vec3, anchor: Vec3) -> TetherVerdict {
    let to_anchor = anchor - position;
    if to_anchor.length_squared() <= config.radius * config.radius {
        return TetherVerdict::Free;
    }

    let to_target = target - position;
    let angle = signed_angle_deg(to_target, to_anchor, Vec3::Y);

    if angle > config.start_angle || angle < config.end_angle {
        TetherVerdict::Suspend
    } else {
        TetherVerdict::Free
    }
}
