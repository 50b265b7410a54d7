//! Motion phase of an agent

use serde::{Deserialize, Serialize};

/// What the agent is doing between ticks
///
/// Exactly one phase holds at a time. Whether the agent is halted or paused
/// by its tether is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotionPhase {
    /// No target yet, or pulled off a waypoint without a new one
    #[default]
    Idle,
    /// Travelling toward the current target
    Moving,
    /// Arrived, turning to the waypoint's facing
    Rotating,
    /// Arrived, waiting out the dwell time
    Dwelling,
}

impl MotionPhase {
    /// Whether the agent is standing at a waypoint
    pub fn is_at_waypoint(self) -> bool {
        matches!(self, Self::Rotating | Self::Dwelling)
    }
}

/// How the current leg is being travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecoveryMode {
    /// Normal movement for the backend kind
    #[default]
    None,
    /// Backend gave up; the agent moves itself in a straight line
    LerpFallback,
}
