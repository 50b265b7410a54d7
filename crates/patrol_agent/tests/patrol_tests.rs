//! Integration tests for patrol_agent
//!
//! Drives agents tick by tick over real and scripted backends and checks
//! routes, failure policies, tethering and notifications.

use parking_lot::Mutex;
use patrol_agent::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const DT: f32 = 0.1;

type Journal = Arc<Mutex<Vec<String>>>;

/// Registry whose waypoints log "enter:<name>" and "exit:<name>" to a journal
fn journaled_registry(waypoints: &[(&str, Vec3)], journal: &Journal) -> WaypointRegistry {
    let mut registry = WaypointRegistry::new();
    for &(name, position) in waypoints {
        let enter_log = journal.clone();
        let exit_log = journal.clone();
        let enter_name = format!("enter:{}", name);
        let exit_name = format!("exit:{}", name);
        registry.insert(
            Waypoint::new(name, position)
                .on_enter(move || enter_log.lock().push(enter_name.clone()))
                .on_exit(move || exit_log.lock().push(exit_name.clone())),
        );
    }
    registry
}

fn entered(journal: &Journal) -> Vec<String> {
    journal
        .lock()
        .iter()
        .filter_map(|entry| entry.strip_prefix("enter:").map(str::to_string))
        .collect()
}

fn square() -> Vec<(&'static str, Vec3)> {
    vec![
        ("a", Vec3::new(2.5, 0.0, 2.5)),
        ("b", Vec3::new(17.5, 0.0, 2.5)),
        ("c", Vec3::new(17.5, 0.0, 17.5)),
    ]
}

fn mesh_backend(position: Vec3) -> MeshBackend {
    MeshBackend::new(NavMesh::create_grid(20.0, 20.0, 5.0), 5.0).with_position(position)
}

fn flat_config(mode: PathingMode) -> AgentConfig {
    AgentConfig::default()
        .with_mode(mode)
        .with_rotation_at_waypoints(false)
        .with_random_connection_chance(0.0)
}

/// Tick until `done` holds or the tick budget runs out
fn run_until<B, F>(agent: &mut PathingAgent<B>, max_ticks: usize, mut done: F) -> bool
where
    B: NavigationBackend,
    F: FnMut(&PathingAgent<B>) -> bool,
{
    for _ in 0..max_ticks {
        if done(agent) {
            return true;
        }
        agent.update(DT);
    }
    done(agent)
}

/// Agent standing on `a` (5s dwell) with `b`, `c` on the route and `lookout` off it
fn dwelling_agent(journal: &Journal) -> PathingAgent<DirectLineBackend> {
    let mut registry = journaled_registry(
        &[
            ("a", Vec3::ZERO),
            ("b", Vec3::new(4.0, 0.0, 0.0)),
            ("c", Vec3::new(0.0, 0.0, 4.0)),
            ("lookout", Vec3::new(0.0, 0.0, -4.0)),
        ],
        journal,
    );
    let a = registry.find("a").unwrap();
    registry.get_mut(a).unwrap().wait_time = 5.0;
    let graph = WaypointGraph::from_names(Arc::new(registry), &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "sentry",
        flat_config(PathingMode::Loop).with_move_speed(4.0),
        graph,
        DirectLineBackend::new(0.0),
    )
    .unwrap();
    agent.start();
    agent.update(DT);
    assert!(agent.is_at_waypoint());
    assert_eq!(*journal.lock(), vec!["enter:a"]);
    agent
}

/// Mesh-style backend answering every request with `Pending`
#[derive(Debug, Default)]
struct DeferredBackend {
    position: Vec3,
    destination: Option<Vec3>,
    requests: Vec<Vec3>,
    halted: bool,
}

impl NavigationBackend for DeferredBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MeshBacked
    }

    fn set_destination(&mut self, target: Vec3, _accept_radius: f32) -> PathResult {
        self.requests.push(target);
        self.destination = Some(target);
        PathResult::Pending
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|d| d.distance(self.position))
            .unwrap_or(f32::INFINITY)
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn warp(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_position_control(&mut self, _enabled: bool) {}

    fn set_rotation_control(&mut self, _enabled: bool) {}

    fn has_position_control(&self) -> bool {
        true
    }

    fn has_rotation_control(&self) -> bool {
        true
    }

    fn halt_movement(&mut self, halted: bool) {
        self.halted = halted;
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn speed(&self) -> f32 {
        1.0
    }

    fn is_navigable(&self, _point: Vec3, _max_distance: f32) -> bool {
        true
    }

    fn step(&mut self, _delta_time: f32) {}
}

#[test]
fn test_loop_patrol_on_mesh() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry.clone(), &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap();

    assert!(agent.start());
    assert_eq!(agent.current_target(), registry.find("a"));
    assert_eq!(agent.current_index(), None);

    agent.update(DT);
    assert_eq!(agent.current_index(), Some(0));
    assert_eq!(agent.next_index(), 1);
    assert!(agent.is_at_waypoint());

    assert!(run_until(&mut agent, 2000, |_| entered(&journal).len() >= 5));
    assert_eq!(entered(&journal), vec!["a", "b", "c", "a", "b"]);

    let log = journal.lock().clone();
    assert_eq!(&log[..4], &["enter:a", "exit:a", "enter:b", "exit:b"]);
    assert!(!agent.is_halted());
}

#[test]
fn test_any_waypoint_listeners_fire_with_hooks() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry, &["a", "b", "c"]).unwrap();

    let enters = Arc::new(AtomicU32::new(0));
    let exits = Arc::new(AtomicU32::new(0));
    let enters_clone = enters.clone();
    let exits_clone = exits.clone();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap()
    .with_events(
        WaypointEvents::new()
            .on_enter(move || {
                enters_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_exit(move || {
                exits_clone.fetch_add(1, Ordering::SeqCst);
            }),
    );

    agent.start();
    assert!(run_until(&mut agent, 2000, |_| entered(&journal).len() >= 3));

    assert_eq!(enters.load(Ordering::SeqCst), 3);
    assert_eq!(exits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_single_run_finishes() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry, &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "runner",
        flat_config(PathingMode::SingleRun),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap();

    agent.start();
    assert!(run_until(&mut agent, 2000, |a| a.finished_pathing()));

    assert_eq!(entered(&journal), vec!["a", "b", "c"]);
    assert_eq!(agent.next_index(), 2);
    assert!(agent.backend().is_halted());

    for _ in 0..50 {
        agent.update(DT);
    }
    assert_eq!(entered(&journal).len(), 3);
}

#[test]
fn test_ping_pong_with_direct_movement() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(
        &[
            ("p0", Vec3::ZERO),
            ("p1", Vec3::new(5.0, 0.0, 0.0)),
            ("p2", Vec3::new(10.0, 0.0, 0.0)),
        ],
        &journal,
    ));
    let graph = WaypointGraph::from_names(registry, &["p0", "p1", "p2"]).unwrap();
    let config = AgentConfig::default()
        .with_mode(PathingMode::PingPong)
        .with_random_connection_chance(0.0)
        .with_move_speed(10.0)
        .with_turn_rate(360.0);

    let mut agent = PathingAgent::new("sentry", config, graph, DirectLineBackend::new(0.0)).unwrap();
    assert_eq!(agent.move_speed(), 10.0);

    agent.start();
    assert!(run_until(&mut agent, 3000, |_| entered(&journal).len() >= 6));
    assert_eq!(entered(&journal), vec!["p0", "p1", "p2", "p1", "p0", "p1"]);
}

#[test]
fn test_rotates_to_waypoint_facing_before_dwelling() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("post", Vec3::ZERO).with_yaw(90.0).with_wait_time(5.0));
    registry.insert(Waypoint::new("far", Vec3::new(0.0, 0.0, 10.0)));
    let graph = WaypointGraph::from_names(Arc::new(registry), &["post", "far"]).unwrap();
    let config = AgentConfig::default().with_move_speed(2.0).with_turn_rate(90.0);

    let mut agent = PathingAgent::new("watch", config, graph, DirectLineBackend::new(0.0)).unwrap();
    agent.start();

    agent.update(DT);
    assert!(agent.is_rotating());

    assert!(run_until(&mut agent, 100, |a| a.phase() == MotionPhase::Dwelling));
    let forward = agent.transform().forward();
    assert!((forward.x - 1.0).abs() < 1e-3);
    assert!(agent.wait_remaining() > 3.0);
}

#[test]
fn test_skip_passes_blocked_waypoint() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry, &["a", "b", "c"]).unwrap();

    let mut backend = mesh_backend(Vec3::new(2.5, 0.0, 2.5));
    // Cell under "b"
    backend.mesh_mut().set_walkable(3, false);

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop).with_failure_response(NavFailureResponse::Skip),
        graph,
        backend,
    )
    .unwrap();

    agent.start();
    assert!(run_until(&mut agent, 3000, |_| entered(&journal).len() >= 4));
    assert_eq!(entered(&journal), vec!["a", "c", "a", "c"]);
    assert!(!agent.is_halted());
}

#[test]
fn test_skip_halts_when_nothing_reachable() {
    for mode in [PathingMode::Loop, PathingMode::SingleRun, PathingMode::PingPong, PathingMode::Random] {
        let journal: Journal = Arc::default();
        let registry = Arc::new(journaled_registry(&square(), &journal));
        let graph = WaypointGraph::from_names(registry, &["a", "b", "c"]).unwrap();

        let mut agent = PathingAgent::new(
            "lost",
            flat_config(mode),
            graph,
            mesh_backend(Vec3::new(-50.0, 0.0, -50.0)),
        )
        .unwrap();

        assert!(!agent.start(), "{:?} should give up", mode);
        assert!(agent.is_halted());
        assert!(entered(&journal).is_empty());
    }
}

#[test]
fn test_stop_policy_halts() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry.clone(), &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "strict",
        flat_config(PathingMode::Loop).with_failure_response(NavFailureResponse::Stop),
        graph,
        mesh_backend(Vec3::new(-50.0, 0.0, -50.0)),
    )
    .unwrap();

    assert!(!agent.start());
    assert!(agent.is_halted());
    assert_eq!(agent.current_target(), registry.find("a"));

    let position = agent.position();
    for _ in 0..20 {
        agent.update(DT);
    }
    assert_eq!(agent.position(), position);
}

#[test]
fn test_lerp_fallback_to_raised_waypoint() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(
        &[
            ("ground", Vec3::new(2.5, 0.0, 2.5)),
            ("ledge", Vec3::new(17.5, 5.0, 2.5)),
        ],
        &journal,
    ));
    let graph = WaypointGraph::from_names(registry, &["ground", "ledge"]).unwrap();

    let mut agent = PathingAgent::new(
        "climber",
        flat_config(PathingMode::Loop).with_failure_response(NavFailureResponse::Lerp),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap();

    agent.start();
    agent.update(DT);
    assert_eq!(entered(&journal), vec!["ground"]);

    agent.update(DT);
    assert!(agent.is_lerping_on_failure());
    assert!(!agent.backend().has_position_control());
    assert!(agent.position().y > 0.0);

    assert!(run_until(&mut agent, 500, |_| entered(&journal).len() >= 2));
    assert_eq!(entered(&journal), vec!["ground", "ledge"]);
    assert!(!agent.is_lerping_on_failure());
    assert!(!agent.is_grounded());
    assert!(!agent.backend().has_position_control());

    assert!(run_until(&mut agent, 500, |_| entered(&journal).len() >= 3));
    assert_eq!(entered(&journal), vec!["ground", "ledge", "ground"]);
    assert!(agent.is_grounded());
    assert!(agent.backend().has_position_control());
}

#[test]
fn test_random_connection_detour() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(
        &[
            ("a", Vec3::ZERO),
            ("b", Vec3::new(6.0, 0.0, 0.0)),
            ("side", Vec3::new(0.0, 0.0, 6.0)),
        ],
        &journal,
    ));
    let side = registry.find("side").unwrap();
    let graph = WaypointGraph::from_names(registry, &["a", "b"])
        .unwrap()
        .with_connection(0, side);

    let any_enters = Arc::new(AtomicU32::new(0));
    let counter = any_enters.clone();
    let config = flat_config(PathingMode::Loop)
        .with_random_connection_chance(1.0)
        .with_move_speed(10.0);

    let mut agent = PathingAgent::new("wanderer", config, graph, DirectLineBackend::new(0.0)).unwrap();
    agent.on_any_enter(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    agent.start();
    agent.update(DT);
    agent.update(DT);
    assert_eq!(agent.current_target(), Some(side));
    assert_eq!(agent.next_index(), 1);

    assert!(run_until(&mut agent, 200, |_| any_enters.load(Ordering::SeqCst) >= 2));
    // Alternates fire only the agent-wide listeners and leave the cursor alone
    assert_eq!(entered(&journal), vec!["a"]);
    assert_eq!(agent.current_index(), Some(0));
    assert_eq!(agent.next_index(), 1);
}

#[test]
fn test_navigate_to_waypoint_outside_graph() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(
        &[
            ("a", Vec3::ZERO),
            ("b", Vec3::new(4.0, 0.0, 0.0)),
            ("lookout", Vec3::new(0.0, 0.0, -4.0)),
        ],
        &journal,
    ));
    let lookout = registry.find("lookout").unwrap();
    let b = registry.find("b").unwrap();
    let graph = WaypointGraph::from_names(registry, &["a", "b"]).unwrap();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop).with_move_speed(4.0),
        graph,
        DirectLineBackend::new(0.0),
    )
    .unwrap();
    agent.start();
    let cursor = agent.cursor();

    assert!(agent.navigate_to_waypoint(lookout, 10.0));
    assert_eq!(agent.current_target(), Some(lookout));
    assert_eq!(agent.cursor(), cursor);

    assert!(run_until(&mut agent, 100, |a| a.is_at_waypoint()));
    assert!(agent.wait_remaining() > 9.0);
    assert!(entered(&journal).is_empty());

    assert!(agent.navigate_to_waypoint(b, 0.0));
    assert_eq!(agent.next_index(), 1);
    assert_eq!(agent.current_target(), Some(b));

    assert!(!agent.navigate_to_waypoint(WaypointId(99), 0.0));
}

#[test]
fn test_stop_at_next_waypoint_latch() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry, &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap();

    agent.start();
    agent.stop_at_next_waypoint_reached();
    assert!(agent.stops_at_next_waypoint());

    assert!(run_until(&mut agent, 500, |a| a.is_halted()));
    assert_eq!(entered(&journal), vec!["a"]);
    assert!(!agent.stops_at_next_waypoint());

    agent.resume_pathing();
    assert!(run_until(&mut agent, 500, |_| entered(&journal).len() >= 2));
    assert_eq!(entered(&journal), vec!["a", "b"]);
}

#[test]
fn test_tether_pauses_and_releases() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("home", Vec3::ZERO));
    registry.insert(Waypoint::new("away", Vec3::new(20.0, 0.0, 0.0)));
    let graph = WaypointGraph::from_names(Arc::new(registry), &["home", "away"]).unwrap();

    let mut agent = PathingAgent::new(
        "pet",
        flat_config(PathingMode::Loop).with_move_speed(5.0),
        graph,
        DirectLineBackend::new(0.0),
    )
    .unwrap();
    agent.start();
    agent.update(DT);
    agent.update(DT);
    assert!(agent.is_walking());

    agent.set_tether_anchor(Some(Vec3::new(-10.0, 0.0, 0.0)));
    agent.update(DT);
    assert!(agent.is_stopped_for_tether());
    assert!(agent.backend().is_halted());
    assert!(!agent.is_walking());

    let held = agent.position();
    for _ in 0..10 {
        agent.update(DT);
    }
    assert_eq!(agent.position(), held);

    agent.set_tether_anchor(Some(Vec3::new(30.0, 0.0, 0.0)));
    agent.update(DT);
    assert!(!agent.is_stopped_for_tether());
    assert!(!agent.backend().is_halted());
    assert!(agent.position().x > held.x);
}

#[test]
fn test_tether_release_keeps_explicit_halt() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("home", Vec3::ZERO));
    registry.insert(Waypoint::new("away", Vec3::new(20.0, 0.0, 0.0)));
    let graph = WaypointGraph::from_names(Arc::new(registry), &["home", "away"]).unwrap();

    let mut agent = PathingAgent::new(
        "pet",
        flat_config(PathingMode::Loop).with_move_speed(5.0),
        graph,
        DirectLineBackend::new(0.0),
    )
    .unwrap();
    agent.start();
    agent.update(DT);
    agent.update(DT);

    agent.set_tether_anchor(Some(Vec3::new(-10.0, 0.0, 0.0)));
    agent.update(DT);
    assert!(agent.is_stopped_for_tether());

    agent.stop_pathing();
    agent.set_tether_anchor(Some(Vec3::new(30.0, 0.0, 0.0)));
    let held = agent.position();
    for _ in 0..5 {
        agent.update(DT);
    }
    assert!(!agent.is_stopped_for_tether());
    assert!(agent.is_halted());
    assert!(agent.backend().is_halted());
    assert_eq!(agent.position(), held);

    agent.resume_pathing();
    agent.update(DT);
    assert!(agent.position().x > held.x);
}

#[test]
fn test_deferred_results_and_stale_tickets() {
    let mut registry = WaypointRegistry::new();
    let a = registry.insert(Waypoint::new("a", Vec3::ZERO));
    registry.insert(Waypoint::new("b", Vec3::new(5.0, 0.0, 0.0)));
    let graph = WaypointGraph::from_names(Arc::new(registry), &["a", "b"]).unwrap();

    let mut agent = PathingAgent::new(
        "async",
        flat_config(PathingMode::Loop).with_failure_response(NavFailureResponse::Stop),
        graph,
        DeferredBackend::default(),
    )
    .unwrap();

    assert!(agent.start());
    let first = agent.pending_ticket().unwrap();

    // No arrival while the request is outstanding
    agent.update(DT);
    assert!(!agent.is_at_waypoint());

    assert!(agent.resolve_pending(first, PathResult::Complete(Vec3::ZERO)));
    assert_eq!(agent.pending_ticket(), None);
    agent.update(DT);
    assert!(agent.is_at_waypoint());

    assert!(agent.navigate_to_waypoint(a, 0.0));
    let second = agent.pending_ticket().unwrap();
    assert_ne!(first, second);

    assert!(!agent.resolve_pending(first, PathResult::Unreachable));
    assert!(!agent.is_halted());
    assert_eq!(agent.pending_ticket(), Some(second));

    assert!(!agent.resolve_pending(second, PathResult::Unreachable));
    assert!(agent.is_halted());
    assert_eq!(agent.backend().requests.len(), 2);
}

#[test]
fn test_load_collection_is_atomic() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry.clone(), &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap();
    agent.start();

    let broken = WaypointCollection::new(["c", "nowhere"]);
    let err = agent.load_collection(&broken, &registry).unwrap_err();
    assert_eq!(
        err,
        AgentError::Graph(GraphError::UnresolvedWaypoint("nowhere".to_string()))
    );
    assert_eq!(agent.graph().len(), 3);

    let reversed = WaypointCollection::new(["c", "b"]);
    agent.load_collection(&reversed, &registry).unwrap();
    assert_eq!(agent.graph().len(), 2);
    assert_eq!(agent.current_target(), registry.find("c"));
    assert_eq!(agent.current_index(), None);
}

#[test]
fn test_collection_survives_disk() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry.clone(), &["a", "b", "c"])
        .unwrap()
        .with_connection(1, registry.find("a").unwrap());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("route.json");
    WaypointCollection::from_graph(&graph).save_json(&path).unwrap();

    let loaded = WaypointCollection::load_json(&path).unwrap().resolve(&registry).unwrap();
    assert_eq!(loaded.waypoint_ids(), graph.waypoint_ids());
    assert_eq!(loaded.connection_lists(), graph.connection_lists());
}

#[test]
fn test_degenerate_graphs_rejected() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("only", Vec3::ZERO));
    let registry = Arc::new(registry);

    for mode in [PathingMode::PingPong, PathingMode::Random] {
        let graph = WaypointGraph::from_names(registry.clone(), &["only"]).unwrap();
        let result = PathingAgent::new("x", flat_config(mode), graph, DirectLineBackend::new(1.0));
        assert!(matches!(result, Err(AgentError::DegenerateGraph { count: 1, .. })));
    }

    let empty = WaypointGraph::new(registry.clone(), Vec::new(), Vec::new()).unwrap();
    let result = PathingAgent::new("x", AgentConfig::default(), empty, DirectLineBackend::new(1.0));
    assert!(matches!(result, Err(AgentError::EmptyGraph)));

    let graph = WaypointGraph::from_names(registry, &["only"]).unwrap();
    let result = PathingAgent::new(
        "x",
        AgentConfig::default().with_start_index(3),
        graph,
        DirectLineBackend::new(1.0),
    );
    assert!(matches!(result, Err(AgentError::StartIndexOutOfRange { index: 3, count: 1 })));
}

#[test]
fn test_resume_at_closest_and_reset() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry.clone(), &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop).with_begin_on_start(false),
        graph,
        mesh_backend(Vec3::new(17.0, 0.0, 15.0)),
    )
    .unwrap();

    assert!(!agent.start());
    assert!(agent.is_halted());

    assert!(agent.resume_at_closest_waypoint());
    assert_eq!(agent.next_index(), 2);
    assert_eq!(agent.current_target(), registry.find("c"));
    assert!(!agent.is_halted());

    assert!(agent.reset_pathing());
    assert_eq!(agent.next_index(), 0);
    assert!(!agent.is_reversing());
    assert_eq!(agent.current_target(), registry.find("a"));
}

#[test]
fn test_dwell_commands() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("a", Vec3::ZERO).with_wait_time(1.0));
    registry.insert(Waypoint::new("b", Vec3::new(3.0, 0.0, 0.0)));
    let graph = WaypointGraph::from_names(Arc::new(registry), &["a", "b"]).unwrap();

    let mut agent = PathingAgent::new(
        "idler",
        flat_config(PathingMode::Loop).with_move_speed(3.0),
        graph,
        DirectLineBackend::new(0.0),
    )
    .unwrap();
    agent.start();
    agent.update(DT);
    assert!(agent.is_at_waypoint());

    agent.add_wait_at_waypoint_time(2.0);
    assert!((agent.wait_remaining() - 3.0).abs() < 1e-4);

    for _ in 0..20 {
        agent.update(DT);
    }
    assert!(agent.is_at_waypoint());

    agent.face_position(Vec3::new(0.0, 4.0, -5.0));
    let forward = agent.transform().forward();
    assert!((forward.z + 1.0).abs() < 1e-4);
    assert!(forward.y.abs() < 1e-4);

    assert!(agent.resume_at_next_waypoint());
    assert!(agent.is_walking());
    assert_eq!(agent.wait_remaining(), 0.0);
}

#[test]
fn test_inspector_overlay_for_selected_agent() {
    let journal: Journal = Arc::default();
    let registry = Arc::new(journaled_registry(&square(), &journal));
    let graph = WaypointGraph::from_names(registry, &["a", "b", "c"]).unwrap();

    let mut agent = PathingAgent::new(
        "guard",
        flat_config(PathingMode::Loop),
        graph,
        mesh_backend(Vec3::new(2.5, 0.0, 2.5)),
    )
    .unwrap();
    agent.start();

    let mut inspector = AgentInspector::new();
    assert!(inspector.overlay_for(AgentId(7), &agent).is_none());

    inspector.inspect(AgentId(7));
    let overlay = inspector.overlay_for(AgentId(7), &agent).unwrap();
    assert_eq!(overlay.labels.len(), 3);
    assert_eq!(overlay.route.len(), 2);
    assert_eq!(overlay.target, Some((agent.position(), Vec3::new(2.5, 0.0, 2.5))));
    assert!(inspector.overlay_for(AgentId(8), &agent).is_none());
}

#[test]
fn test_reset_while_dwelling_fires_exit() {
    let journal: Journal = Arc::default();
    let mut agent = dwelling_agent(&journal);
    let a = agent.graph().id_at(0);

    assert!(agent.reset_pathing());
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a"]);
    assert_eq!(agent.current_target(), a);
    assert_eq!(agent.current_index(), None);
    assert_eq!(agent.wait_remaining(), 5.0);

    agent.update(DT);
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a", "enter:a"]);
}

#[test]
fn test_stop_pathing_cancels_dwell() {
    let journal: Journal = Arc::default();
    let mut agent = dwelling_agent(&journal);
    let any_exits = Arc::new(AtomicU32::new(0));
    let counter = any_exits.clone();
    agent.on_any_exit(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    agent.stop_pathing();
    assert!(agent.is_halted());
    assert!(!agent.is_at_waypoint());
    assert_eq!(agent.wait_remaining(), 0.0);
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a"]);
    assert_eq!(any_exits.load(Ordering::SeqCst), 1);

    for _ in 0..10 {
        agent.update(DT);
    }
    assert_eq!(any_exits.load(Ordering::SeqCst), 1);
    assert_eq!(agent.position(), Vec3::ZERO);

    assert!(agent.navigate_to_next_waypoint(false, 0.0));
    assert!(!agent.is_halted());
    assert!(run_until(&mut agent, 100, |_| entered(&journal).len() >= 2));
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a", "enter:b"]);
}

#[test]
fn test_navigate_next_while_dwelling_fires_exits() {
    let journal: Journal = Arc::default();
    let mut agent = dwelling_agent(&journal);
    let any_exits = Arc::new(AtomicU32::new(0));
    let counter = any_exits.clone();
    agent.on_any_exit(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(agent.navigate_to_next_waypoint(false, 0.0));
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a"]);
    assert_eq!(any_exits.load(Ordering::SeqCst), 1);
    assert_eq!(agent.current_target(), agent.graph().id_at(1));
    assert!(agent.is_walking());
}

#[test]
fn test_navigate_to_waypoint_while_dwelling_fires_exits() {
    let journal: Journal = Arc::default();
    let mut agent = dwelling_agent(&journal);
    let any_exits = Arc::new(AtomicU32::new(0));
    let any_enters = Arc::new(AtomicU32::new(0));
    let counter = any_exits.clone();
    agent.on_any_exit(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = any_enters.clone();
    agent.on_any_enter(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let lookout = agent.graph().registry().find("lookout").unwrap();
    let c = agent.graph().registry().find("c").unwrap();

    assert!(agent.navigate_to_waypoint(lookout, 10.0));
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a"]);
    assert_eq!(any_exits.load(Ordering::SeqCst), 1);

    assert!(run_until(&mut agent, 100, |a| a.is_at_waypoint()));
    assert_eq!(any_enters.load(Ordering::SeqCst), 1);

    // Leaving a waypoint off the route only reaches the agent-wide listeners
    assert!(agent.navigate_to_waypoint(c, 0.0));
    assert_eq!(any_exits.load(Ordering::SeqCst), 2);
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a"]);

    assert!(run_until(&mut agent, 100, |_| entered(&journal).len() >= 2));
    assert_eq!(*journal.lock(), vec!["enter:a", "exit:a", "enter:c"]);
    assert_eq!(any_enters.load(Ordering::SeqCst), 2);
}

#[test]
fn test_tether_toggling_keeps_cursor() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("home", Vec3::ZERO));
    registry.insert(Waypoint::new("away", Vec3::new(20.0, 0.0, 0.0)));
    let graph = WaypointGraph::from_names(Arc::new(registry), &["home", "away"]).unwrap();

    let mut agent = PathingAgent::new(
        "pet",
        flat_config(PathingMode::Loop).with_move_speed(5.0),
        graph,
        DirectLineBackend::new(0.0),
    )
    .unwrap();
    agent.start();
    agent.update(DT);
    agent.update(DT);
    assert!(agent.is_walking());

    let cursor = agent.cursor();
    let target = agent.current_target();

    for _ in 0..4 {
        agent.set_tether_anchor(Some(Vec3::new(-10.0, 0.0, 0.0)));
        for _ in 0..3 {
            agent.update(DT);
            assert!(agent.is_stopped_for_tether());
        }
        assert_eq!(agent.cursor(), cursor);
        assert_eq!(agent.current_target(), target);
        assert!(!agent.is_halted());

        agent.set_tether_anchor(Some(Vec3::new(30.0, 0.0, 0.0)));
        agent.update(DT);
        assert!(!agent.is_stopped_for_tether());
        assert_eq!(agent.cursor(), cursor);
        assert_eq!(agent.current_target(), target);
        assert!(agent.is_walking());
    }
}

#[test]
fn test_self_moving_agent_needs_speed() {
    let mut registry = WaypointRegistry::new();
    registry.insert(Waypoint::new("a", Vec3::ZERO));
    registry.insert(Waypoint::new("b", Vec3::new(7.5, 0.0, 2.5)));
    let registry = Arc::new(registry);
    let graph = || WaypointGraph::from_names(registry.clone(), &["a", "b"]).unwrap();

    let result = PathingAgent::new(
        "x",
        flat_config(PathingMode::Loop).with_move_speed(0.0),
        graph(),
        DirectLineBackend::new(0.0),
    );
    assert!(matches!(result, Err(AgentError::InvalidConfig(_))));

    // Mesh-backed agents only move themselves under the lerp fallback
    let config = flat_config(PathingMode::Loop).with_move_speed(0.0);
    assert!(PathingAgent::new("x", config, graph(), mesh_backend(Vec3::ZERO)).is_ok());

    let config = flat_config(PathingMode::Loop).with_failure_response(NavFailureResponse::Lerp);
    let agent = PathingAgent::new("x", config, graph(), mesh_backend(Vec3::ZERO)).unwrap();
    assert_eq!(agent.move_speed(), 5.0);
}
