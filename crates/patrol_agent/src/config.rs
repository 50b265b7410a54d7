//! Agent configuration

use crate::error::{AgentError, Result};
use crate::mode::PathingMode;
use serde::{Deserialize, Serialize};

/// What an agent does when a main-route waypoint cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavFailureResponse {
    /// Halt pathing
    Stop,
    /// Ignore the backend and move straight at the waypoint
    Lerp,
    /// Move on to the following waypoint
    #[default]
    Skip,
}

impl std::fmt::Display for NavFailureResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Lerp => write!(f, "lerp"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for NavFailureResponse {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop" => Ok(Self::Stop),
            "lerp" => Ok(Self::Lerp),
            "skip" => Ok(Self::Skip),
            _ => Err(format!("Unknown failure response: {}", s)),
        }
    }
}

/// Leash that pauses an agent heading away from an anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Distance from the anchor inside which the agent is never paused
    pub radius: f32,
    /// Upper bound, in degrees, of the allowed heading relative to the anchor
    pub start_angle: f32,
    /// Lower bound, in degrees, of the allowed heading relative to the anchor
    pub end_angle: f32,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            start_angle: 90.0,
            end_angle: -90.0,
        }
    }
}

/// Patrol agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Waypoint ordering after each arrival
    pub pathing_mode: PathingMode,

    /// Index of the first waypoint targeted
    pub start_waypoint_index: usize,

    /// Probability of taking a random connection instead of the main route
    pub random_connection_chance: f32,

    /// Turn to each waypoint's facing before dwelling
    pub rotate_at_waypoints: bool,

    /// Turn rate in degrees per second
    pub turn_degrees_per_sec: f32,

    /// Start moving as soon as the agent starts
    pub begin_on_start: bool,

    /// Policy for unreachable waypoints
    pub failure_response: NavFailureResponse,

    /// Use a mesh backend's speed for direct movement
    pub inherit_backend_speed: bool,

    /// Direct movement speed in units per second
    pub move_speed: f32,

    /// Leash settings used while an anchor is set
    pub tether: TetherConfig,

    /// Search radius when checking whether a waypoint sits on a navigable surface
    pub ground_sample_distance: f32,

    /// Seed for random connections and random pathing
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            pathing_mode: PathingMode::Loop,
            start_waypoint_index: 0,
            random_connection_chance: 0.5,
            rotate_at_waypoints: true,
            turn_degrees_per_sec: 120.0,
            begin_on_start: true,
            failure_response: NavFailureResponse::Skip,
            inherit_backend_speed: true,
            move_speed: 3.5,
            tether: TetherConfig::default(),
            ground_sample_distance: 0.5,
            seed: 0,
        }
    }
}

impl AgentConfig {
    /// Walk the route once and halt on the first unreachable waypoint
    pub fn strict_single_run() -> Self {
        Self {
            pathing_mode: PathingMode::SingleRun,
            random_connection_chance: 0.0,
            failure_response: NavFailureResponse::Stop,
            ..Default::default()
        }
    }

    /// Wander between random segments without pausing to turn
    pub fn wanderer() -> Self {
        Self {
            pathing_mode: PathingMode::Random,
            random_connection_chance: 1.0,
            rotate_at_waypoints: false,
            ..Default::default()
        }
    }

    /// Set pathing mode
    pub fn with_mode(mut self, mode: PathingMode) -> Self {
        self.pathing_mode = mode;
        self
    }

    /// Set starting waypoint index
    pub fn with_start_index(mut self, index: usize) -> Self {
        self.start_waypoint_index = index;
        self
    }

    /// Set random connection chance
    pub fn with_random_connection_chance(mut self, chance: f32) -> Self {
        self.random_connection_chance = chance;
        self
    }

    /// Set arrival rotation
    pub fn with_rotation_at_waypoints(mut self, rotate: bool) -> Self {
        self.rotate_at_waypoints = rotate;
        self
    }

    /// Set turn rate
    pub fn with_turn_rate(mut self, degrees_per_sec: f32) -> Self {
        self.turn_degrees_per_sec = degrees_per_sec;
        self
    }

    /// Set whether the agent starts moving immediately
    pub fn with_begin_on_start(mut self, begin: bool) -> Self {
        self.begin_on_start = begin;
        self
    }

    /// Set failure policy
    pub fn with_failure_response(mut self, response: NavFailureResponse) -> Self {
        self.failure_response = response;
        self
    }

    /// Set direct movement speed, disabling backend speed inheritance
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self.inherit_backend_speed = false;
        self
    }

    /// Set tether leash
    pub fn with_tether(mut self, tether: TetherConfig) -> Self {
        self.tether = tether;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.random_connection_chance) {
            return Err(AgentError::InvalidConfig(format!(
                "random_connection_chance must be within [0, 1], got {}",
                self.random_connection_chance
            )));
        }
        if !(self.turn_degrees_per_sec > 0.0) {
            return Err(AgentError::InvalidConfig(format!(
                "turn_degrees_per_sec must be positive, got {}",
                self.turn_degrees_per_sec
            )));
        }
        if !(self.move_speed >= 0.0) {
            return Err(AgentError::InvalidConfig(format!(
                "move_speed must not be negative, got {}",
                self.move_speed
            )));
        }
        if !(self.ground_sample_distance >= 0.0) {
            return Err(AgentError::InvalidConfig(format!(
                "ground_sample_distance must not be negative, got {}",
                self.ground_sample_distance
            )));
        }
        if !(self.tether.radius >= 0.0) {
            return Err(AgentError::InvalidConfig(format!(
                "tether radius must not be negative, got {}",
                self.tether.radius
            )));
        }
        if !(0.0..=180.0).contains(&self.tether.start_angle) {
            return Err(AgentError::InvalidConfig(format!(
                "tether start_angle must be within [0, 180], got {}",
                self.tether.start_angle
            )));
        }
        if !(-180.0..=0.0).contains(&self.tether.end_angle) {
            return Err(AgentError::InvalidConfig(format!(
                "tether end_angle must be within [-180, 0], got {}",
                self.tether.end_angle
            )));
        }
        if self.failure_response == NavFailureResponse::Lerp
            && !self.inherit_backend_speed
            && !(self.move_speed > 0.0)
        {
            return Err(AgentError::InvalidConfig(format!(
                "lerp fallback needs a positive move_speed, got {}",
                self.move_speed
            )));
        }
        if self.tether.end_angle > self.tether.start_angle {
            return Err(AgentError::InvalidConfig(format!(
                "tether end_angle {} exceeds start_angle {}",
                self.tether.end_angle, self.tether.start_angle
            )));
        }
        Ok(())
    }
}
