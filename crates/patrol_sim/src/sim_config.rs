//! Simulation Configuration
//!
//! Describes one patrol scenario: the ground mesh, the waypoints, the route
//! and the agent settings.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment overrides: `PATROL_MODE`, `PATROL_FAILURE`, `PATROL_TICKS`,
//!    `PATROL_SEED`, `PATROL_BACKEND`
//! 2. Config file: path given on the command line, else `PATROL_SIM_CONFIG`,
//!    else `patrol.toml` in the working directory
//! 3. Built-in demo scenario
//!
//! # Example Config File
//!
//! ```toml
//! [sim]
//! ticks = 600
//! delta_time = 0.1
//! backend = "mesh"  # mesh, direct
//!
//! [mesh]
//! width = 40.0
//! depth = 40.0
//! cell_size = 5.0
//! blocked = [6]
//!
//! [agent]
//! pathing_mode = "ping_pong"
//! failure_response = "skip"
//!
//! [[waypoints]]
//! name = "gate"
//! position = [2.5, 0.0, 2.5]
//! wait_time = 1.0
//!
//! [route]
//! waypoints = ["gate", "tower"]
//! ```

use patrol_agent::{AgentConfig, NavFailureResponse, PathingMode, WaypointCollection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while setting up or running a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for a scenario
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Scenario is inconsistent
    #[error("Invalid scenario: {0}")]
    Config(String),

    /// Agent rejected the scenario
    #[error(transparent)]
    Agent(#[from] patrol_agent::AgentError),

    /// Route could not be resolved
    #[error(transparent)]
    Graph(#[from] patrol_agent::GraphError),

    /// Collection file could not be read or written
    #[error(transparent)]
    Collection(#[from] patrol_agent::CollectionError),
}

/// Movement backend to drive the agent with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Grid nav mesh with A* planning
    #[default]
    Mesh,
    /// Straight-line movement, no planning
    Direct,
}

impl std::fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mesh => write!(f, "mesh"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

impl std::str::FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mesh" | "navmesh" => Ok(Self::Mesh),
            "direct" | "line" | "none" => Ok(Self::Direct),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

/// Run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ticks to simulate
    pub ticks: u32,
    /// Seconds per tick
    pub delta_time: f32,
    /// Movement backend
    pub backend: BackendChoice,
    /// Load the route from this JSON collection instead of `[route]`
    pub collection: Option<PathBuf>,
    /// Write the resolved route to this JSON collection before running
    pub save_collection: Option<PathBuf>,
    /// Print the route overlay after the run
    pub inspect: bool,
    /// Log a status line every this many ticks (0 disables)
    pub report_every: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            delta_time: 0.1,
            backend: BackendChoice::Mesh,
            collection: None,
            save_collection: None,
            inspect: true,
            report_every: 50,
        }
    }
}

/// Ground mesh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub width: f32,
    pub depth: f32,
    pub cell_size: f32,
    /// Polygon indices to mark unwalkable
    pub blocked: Vec<usize>,
    /// Backend travel speed
    pub speed: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            depth: 40.0,
            cell_size: 5.0,
            blocked: Vec::new(),
            speed: 3.5,
        }
    }
}

/// One waypoint in the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointSpec {
    pub name: String,
    pub position: [f32; 3],
    /// Arrival facing about +Y in degrees
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub wait_time: f32,
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
}

fn default_stopping_distance() -> f32 {
    patrol_agent::Waypoint::DEFAULT_STOPPING_DISTANCE
}

impl WaypointSpec {
    pub fn new(name: &str, position: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            position,
            yaw: 0.0,
            wait_time: 0.0,
            stopping_distance: default_stopping_distance(),
        }
    }

    pub fn with_wait_time(mut self, seconds: f32) -> Self {
        self.wait_time = seconds;
        self
    }

    pub fn with_yaw(mut self, degrees: f32) -> Self {
        self.yaw = degrees;
        self
    }
}

/// Complete scenario description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub sim: RunConfig,
    pub mesh: MeshConfig,
    pub agent: AgentConfig,
    /// Starting position of the agent
    pub start_position: [f32; 3],
    /// Fixed tether anchor, if any
    pub tether_anchor: Option<[f32; 3]>,
    pub waypoints: Vec<WaypointSpec>,
    pub route: WaypointCollection,
    /// Where the config was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for SimConfig {
    /// Demo scenario: a square patrol with a raised lookout and one detour
    fn default() -> Self {
        Self {
            sim: RunConfig::default(),
            mesh: MeshConfig::default(),
            agent: AgentConfig::default(),
            start_position: [2.5, 0.0, 2.5],
            tether_anchor: None,
            waypoints: vec![
                WaypointSpec::new("gate", [2.5, 0.0, 2.5]).with_wait_time(1.0),
                WaypointSpec::new("yard", [32.5, 0.0, 2.5]).with_yaw(90.0),
                WaypointSpec::new("tower", [32.5, 0.0, 32.5]).with_wait_time(2.0),
                WaypointSpec::new("wall", [2.5, 0.0, 32.5]).with_yaw(180.0),
                WaypointSpec::new("well", [17.5, 0.0, 17.5]),
            ],
            route: WaypointCollection::new(["gate", "yard", "tower", "wall"]).with_connections(1, ["well"]),
            config_path: None,
        }
    }
}

impl SimConfig {
    /// Load from the first available source, then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self, SimError> {
        let env_path = std::env::var("PATROL_SIM_CONFIG").ok().map(PathBuf::from);
        let local = PathBuf::from("patrol.toml");

        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None if local.exists() => Self::load_from_file(&local)?,
            None => {
                log::info!("No scenario file; using the built-in demo");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load a scenario from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        log::info!("Loaded scenario from {}", path.display());
        Ok(config)
    }

    /// Parse a scenario from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PATROL_*` overrides looked up through `var`
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var("PATROL_MODE") {
            match value.parse::<PathingMode>() {
                Ok(mode) => {
                    self.agent.pathing_mode = mode;
                    log::info!("Pathing mode from env: {}", mode);
                }
                Err(err) => log::warn!("Ignoring PATROL_MODE: {}", err),
            }
        }

        if let Some(value) = var("PATROL_FAILURE") {
            match value.parse::<NavFailureResponse>() {
                Ok(response) => {
                    self.agent.failure_response = response;
                    log::info!("Failure response from env: {}", response);
                }
                Err(err) => log::warn!("Ignoring PATROL_FAILURE: {}", err),
            }
        }

        if let Some(value) = var("PATROL_BACKEND") {
            match value.parse::<BackendChoice>() {
                Ok(backend) => self.sim.backend = backend,
                Err(err) => log::warn!("Ignoring PATROL_BACKEND: {}", err),
            }
        }

        if let Some(value) = var("PATROL_TICKS") {
            match value.parse() {
                Ok(ticks) => self.sim.ticks = ticks,
                Err(_) => log::warn!("Ignoring PATROL_TICKS: not a number: {}", value),
            }
        }

        if let Some(value) = var("PATROL_SEED") {
            match value.parse() {
                Ok(seed) => self.agent.seed = seed,
                Err(_) => log::warn!("Ignoring PATROL_SEED: not a number: {}", value),
            }
        }
    }

    /// Check settings the agent itself does not
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.sim.delta_time > 0.0) {
            return Err(SimError::Config(format!(
                "delta_time must be positive, got {}",
                self.sim.delta_time
            )));
        }
        if !(self.mesh.cell_size > 0.0) {
            return Err(SimError::Config(format!(
                "cell_size must be positive, got {}",
                self.mesh.cell_size
            )));
        }
        if self.waypoints.is_empty() {
            return Err(SimError::Config("scenario has no waypoints".to_string()));
        }
        self.agent.validate()?;
        Ok(())
    }
}
