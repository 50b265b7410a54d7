//! Saved waypoint collections
//!
//! A collection is the name-based, serializable form of a [`WaypointGraph`].
//! Loading resolves every name against a registry and fails as a whole if any
//! name is unknown.

use crate::error::{CollectionError, GraphError};
use crate::graph::WaypointGraph;
use crate::waypoint::WaypointRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Waypoint names and per-waypoint connection names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointCollection {
    pub waypoints: Vec<String>,
    #[serde(default)]
    pub connections: Vec<Vec<String>>,
}

impl WaypointCollection {
    /// Create a collection with no connections
    pub fn new<I, S>(waypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            waypoints: waypoints.into_iter().map(Into::into).collect(),
            connections: Vec::new(),
        }
    }

    /// Add connection names for the waypoint at `index` (builder pattern)
    pub fn with_connections<I, S>(mut self, index: usize, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.connections.len() <= index {
            self.connections.resize_with(index + 1, Vec::new);
        }
        self.connections[index].extend(names.into_iter().map(Into::into));
        self
    }

    /// Capture a graph by waypoint name
    pub fn from_graph(graph: &WaypointGraph) -> Self {
        let registry = graph.registry();
        let name_of = |id| {
            registry
                .get(id)
                .map(|wp| wp.name.clone())
                .unwrap_or_default()
        };
        Self {
            waypoints: graph.waypoint_ids().iter().copied().map(name_of).collect(),
            connections: graph
                .connection_lists()
                .iter()
                .map(|list| list.iter().copied().map(name_of).collect())
                .collect(),
        }
    }

    /// Resolve every name against `registry`
    pub fn resolve(&self, registry: &Arc<WaypointRegistry>) -> Result<WaypointGraph, GraphError> {
        let waypoints = self
            .waypoints
            .iter()
            .map(|name| registry.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        let connections = self
            .connections
            .iter()
            .map(|list| {
                list.iter()
                    .map(|name| registry.resolve(name))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        WaypointGraph::new(registry.clone(), waypoints, connections)
    }

    /// Drop repeated connection names across the whole collection
    ///
    /// The first occurrence is kept. Returns the number removed.
    pub fn dedup_connections(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut removed = 0;
        for list in &mut self.connections {
            let before = list.len();
            list.retain(|name| seen.insert(name.clone()));
            removed += before - list.len();
        }
        if removed > 0 {
            log::debug!("Removed {} duplicate connections", removed);
        }
        removed
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String, CollectionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json_str(json: &str) -> Result<Self, CollectionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to a JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), CollectionError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)?;
        log::info!("Saved waypoint collection to {}", path.display());
        Ok(())
    }

    /// Read from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CollectionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let collection = Self::from_json_str(&json)?;
        log::info!(
            "Loaded waypoint collection from {} ({} waypoints)",
            path.display(),
            collection.waypoints.len()
        );
        Ok(collection)
    }
}
