//! Route overlays for the one agent being inspected

use crate::agent::PathingAgent;
use crate::graph::WaypointGraph;
use glam::Vec3;
use patrol_nav::NavigationBackend;
use serde::{Deserialize, Serialize};

/// Caller-chosen identity of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

/// Tracks which agent, if any, is under inspection
#[derive(Debug, Default)]
pub struct AgentInspector {
    inspected: Option<AgentId>,
}

impl AgentInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect `id`, replacing any previous selection
    pub fn inspect(&mut self, id: AgentId) {
        if self.inspected != Some(id) {
            log::debug!("Inspecting agent {:?}", id);
        }
        self.inspected = Some(id);
    }

    pub fn clear(&mut self) {
        self.inspected = None;
    }

    pub fn inspected(&self) -> Option<AgentId> {
        self.inspected
    }

    pub fn is_inspecting(&self, id: AgentId) -> bool {
        self.inspected == Some(id)
    }

    /// Overlay for `agent` if it is the one inspected
    pub fn overlay_for<B: NavigationBackend>(&self, id: AgentId, agent: &PathingAgent<B>) -> Option<PathOverlay> {
        if !self.is_inspecting(id) {
            return None;
        }
        let target = agent
            .current_target()
            .and_then(|t| agent.graph().waypoint(t))
            .map(|wp| wp.position);
        Some(PathOverlay::from_graph(agent.graph()).with_target(agent.position(), target))
    }
}

/// Text drawn above a waypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLabel {
    pub text: String,
    pub position: Vec3,
}

/// Line segments and labels describing a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathOverlay {
    /// 1-based order labels
    pub labels: Vec<OverlayLabel>,
    /// Consecutive main-route segments
    pub route: Vec<(Vec3, Vec3)>,
    /// Segments from each waypoint to its alternates
    pub connections: Vec<(Vec3, Vec3)>,
    /// Segment from the agent to its current target
    pub target: Option<(Vec3, Vec3)>,
}

impl PathOverlay {
    /// Height of labels above their waypoint
    pub const LABEL_HEIGHT: f32 = 1.0;

    pub fn from_graph(graph: &WaypointGraph) -> Self {
        let positions: Vec<Vec3> = (0..graph.len())
            .filter_map(|i| graph.waypoint_at(i).map(|wp| wp.position))
            .collect();

        let labels = positions
            .iter()
            .enumerate()
            .map(|(i, &position)| OverlayLabel {
                text: (i + 1).to_string(),
                position: position + Vec3::Y * Self::LABEL_HEIGHT,
            })
            .collect();

        let route = positions.windows(2).map(|pair| (pair[0], pair[1])).collect();

        let connections = positions
            .iter()
            .enumerate()
            .flat_map(|(i, &from)| {
                graph
                    .connections(i)
                    .iter()
                    .filter_map(|&id| graph.waypoint(id))
                    .map(move |wp| (from, wp.position))
            })
            .collect();

        Self {
            labels,
            route,
            connections,
            target: None,
        }
    }

    /// Add the agent-to-target segment (builder pattern)
    pub fn with_target(mut self, agent_position: Vec3, target: Option<Vec3>) -> Self {
        self.target = target.map(|t| (agent_position, t));
        self
    }

    /// Total number of segments
    pub fn segment_count(&self) -> usize {
        self.route.len() + self.connections.len() + usize::from(self.target.is_some())
    }
}
