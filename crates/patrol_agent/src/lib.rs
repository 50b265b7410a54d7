//! Patrol Agent - Waypoint navigation for game characters
//!
//! An agent walks an ordered list of waypoints using a navigation backend,
//! optionally detouring to side connections, dwelling and turning at each
//! stop, and recovering when a waypoint cannot be reached.
//!
//! # Features
//!
//! - Single-run, loop, ping-pong and random pathing
//! - Random detours through per-waypoint connections
//! - Stop, lerp or skip on unreachable waypoints
//! - Tether leash around a moving anchor
//! - Enter and exit notifications per waypoint and for any waypoint
//! - JSON waypoint collections
//! - Route overlays for a single inspected agent
//!
//! # Example
//!
//! ```ignore
//! use patrol_agent::prelude::*;
//! use std::sync::Arc;
//!
//! let mut registry = WaypointRegistry::new();
//! registry.insert(Waypoint::new("gate", Vec3::new(2.5, 0.0, 2.5)));
//! registry.insert(Waypoint::new("tower", Vec3::new(17.5, 0.0, 2.5)).with_wait_time(2.0));
//! let graph = WaypointGraph::from_names(Arc::new(registry), &["gate", "tower"])?;
//!
//! let backend = MeshBackend::new(NavMesh::create_grid(20.0, 20.0, 5.0), 3.5);
//! let mut agent = PathingAgent::new("guard", AgentConfig::default(), graph, backend)?;
//! agent.start();
//!
//! loop {
//!     agent.update(1.0 / 60.0);
//! }
//! ```

pub mod agent;
pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod inspect;
pub mod mode;
pub mod motion;
pub mod phase;
pub mod tether;
pub mod waypoint;

pub mod prelude {
    pub use crate::agent::{PathTicket, PathingAgent};
    pub use crate::collection::WaypointCollection;
    pub use crate::config::{AgentConfig, NavFailureResponse, TetherConfig};
    pub use crate::error::{AgentError, CollectionError, GraphError};
    pub use crate::events::{WaypointEventType, WaypointEvents};
    pub use crate::graph::WaypointGraph;
    pub use crate::inspect::{AgentId, AgentInspector, PathOverlay};
    pub use crate::mode::{Cursor, PathingMode};
    pub use crate::motion::AgentTransform;
    pub use crate::phase::{MotionPhase, RecoveryMode};
    pub use crate::waypoint::{Waypoint, WaypointId, WaypointRegistry};
    pub use patrol_nav::prelude::*;
}

pub use prelude::*;
