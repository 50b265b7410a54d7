//! Scenario assembly and the tick loop

use crate::sim_config::{BackendChoice, SimConfig, SimError};
use glam::Vec3;
use patrol_agent::{
    AgentId, AgentInspector, PathOverlay, PathingAgent, Waypoint, WaypointCollection, WaypointRegistry,
};
use patrol_nav::{DirectLineBackend, MeshBackend, NavMesh, NavigationBackend};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Backend type the simulation drives
pub type SimBackend = Box<dyn NavigationBackend>;

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub ticks: u32,
    pub arrivals: u32,
    pub departures: u32,
    pub finished: bool,
    pub final_position: Vec3,
}

/// A configured agent ready to run
pub struct Scenario {
    config: SimConfig,
    registry: Arc<WaypointRegistry>,
    agent: PathingAgent<SimBackend>,
    arrivals: Arc<AtomicU32>,
    departures: Arc<AtomicU32>,
    inspector: AgentInspector,
}

impl Scenario {
    const AGENT: AgentId = AgentId(1);

    /// Build the registry, route, backend and agent described by `config`
    pub fn build(config: SimConfig) -> Result<Self, SimError> {
        let registry = Arc::new(build_registry(&config));

        let collection = match &config.sim.collection {
            Some(path) => WaypointCollection::load_json(path)?,
            None => config.route.clone(),
        };
        let graph = collection.resolve(&registry)?;

        if let Some(path) = &config.sim.save_collection {
            WaypointCollection::from_graph(&graph).save_json(path)?;
        }

        let backend = build_backend(&config)?;
        let mut agent = PathingAgent::new("patrol", config.agent.clone(), graph, backend)?;

        if let Some(anchor) = config.tether_anchor {
            agent.set_tether_anchor(Some(Vec3::from_array(anchor)));
        }

        let arrivals = Arc::new(AtomicU32::new(0));
        let departures = Arc::new(AtomicU32::new(0));
        let counter = arrivals.clone();
        agent.on_any_enter(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let counter = departures.clone();
        agent.on_any_exit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let mut inspector = AgentInspector::new();
        if config.sim.inspect {
            inspector.inspect(Self::AGENT);
        }

        Ok(Self {
            config,
            registry,
            agent,
            arrivals,
            departures,
            inspector,
        })
    }

    pub fn agent(&self) -> &PathingAgent<SimBackend> {
        &self.agent
    }

    pub fn registry(&self) -> &Arc<WaypointRegistry> {
        &self.registry
    }

    /// Run the configured number of ticks
    pub fn run(&mut self) -> SimReport {
        let dt = self.config.sim.delta_time;
        let report_every = self.config.sim.report_every;

        self.agent.start();

        let mut ticks = 0;
        while ticks < self.config.sim.ticks {
            self.agent.update(dt);
            ticks += 1;

            if report_every > 0 && ticks % report_every == 0 {
                log::info!(
                    "tick {:>5}: {:?} at {:.2} heading for {}",
                    ticks,
                    self.agent.phase(),
                    self.agent.position(),
                    self.target_name()
                );
            }

            if self.agent.finished_pathing() && !self.agent.is_stopped_for_tether() {
                log::info!("Agent finished pathing after {} ticks", ticks);
                break;
            }
        }

        SimReport {
            ticks,
            arrivals: self.arrivals.load(Ordering::Relaxed),
            departures: self.departures.load(Ordering::Relaxed),
            finished: self.agent.finished_pathing(),
            final_position: self.agent.position(),
        }
    }

    /// Route overlay, when inspection is enabled
    pub fn overlay(&self) -> Option<PathOverlay> {
        self.inspector.overlay_for(Self::AGENT, &self.agent)
    }

    fn target_name(&self) -> &str {
        self.agent
            .current_target()
            .and_then(|id| self.registry.get(id))
            .map(|wp| wp.name.as_str())
            .unwrap_or("-")
    }
}

fn build_registry(config: &SimConfig) -> WaypointRegistry {
    let mut registry = WaypointRegistry::new();
    for spec in &config.waypoints {
        let enter_name = spec.name.clone();
        let exit_name = spec.name.clone();
        registry.insert(
            Waypoint::new(spec.name.clone(), Vec3::from_array(spec.position))
                .with_yaw(spec.yaw)
                .with_wait_time(spec.wait_time)
                .with_stopping_distance(spec.stopping_distance)
                .on_enter(move || log::info!("Reached {}", enter_name))
                .on_exit(move || log::info!("Leaving {}", exit_name)),
        );
    }
    registry
}

fn build_backend(config: &SimConfig) -> Result<SimBackend, SimError> {
    let start = Vec3::from_array(config.start_position);
    match config.sim.backend {
        BackendChoice::Mesh => {
            let mesh_config = &config.mesh;
            let mut mesh = NavMesh::create_grid(mesh_config.width, mesh_config.depth, mesh_config.cell_size);
            for &index in &mesh_config.blocked {
                if index >= mesh.polygons.len() {
                    return Err(SimError::Config(format!(
                        "blocked polygon {} is outside a mesh of {} polygons",
                        index,
                        mesh.polygons.len()
                    )));
                }
                mesh.set_walkable(index, false);
            }
            log::info!(
                "Built {}x{} nav mesh ({} polygons, {} blocked)",
                mesh_config.width,
                mesh_config.depth,
                mesh.polygons.len(),
                mesh_config.blocked.len()
            );
            Ok(Box::new(MeshBackend::new(mesh, mesh_config.speed).with_position(start)))
        }
        BackendChoice::Direct => {
            let mut backend = DirectLineBackend::new(config.agent.move_speed);
            backend.warp(start);
            Ok(Box::new(backend))
        }
    }
}

/// Render an overlay as plain text
pub fn describe_overlay(overlay: &PathOverlay) -> String {
    let mut out = String::new();
    for label in &overlay.labels {
        out.push_str(&format!("label {} at {:.1}\n", label.text, label.position));
    }
    for (from, to) in &overlay.route {
        out.push_str(&format!("route {:.1} -> {:.1}\n", from, to));
    }
    for (from, to) in &overlay.connections {
        out.push_str(&format!("detour {:.1} -> {:.1}\n", from, to));
    }
    if let Some((from, to)) = overlay.target {
        out.push_str(&format!("target {:.1} -> {:.1}\n", from, to));
    }
    out
}
