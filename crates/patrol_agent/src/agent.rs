//! The patrol agent state machine
//!
//! A [`PathingAgent`] owns a [`WaypointGraph`], a movement backend and its
//! body transform. Each [`PathingAgent::update`] runs one tick:
//!
//! 1. Tether check (may pause the agent)
//! 2. Skip the rest while halted or paused
//! 3. Count down the dwell time and depart once it runs out
//! 4. Turn toward the waypoint facing while rotating
//! 5. Move toward the target and detect arrival while moving
//!
//! Arrival fires the "any waypoint" enter listeners, then the waypoint's own
//! enter hooks when the target was the main-route waypoint, and advances the
//! cursor according to the pathing mode.

use crate::config::{AgentConfig, NavFailureResponse};
use crate::error::{AgentError, GraphError, Result};
use crate::collection::WaypointCollection;
use crate::events::{WaypointEventType, WaypointEvents};
use crate::graph::WaypointGraph;
use crate::mode::{self, Cursor};
use crate::motion::{self, AgentTransform};
use crate::phase::{MotionPhase, RecoveryMode};
use crate::tether::{self, TetherVerdict};
use crate::waypoint::{WaypointId, WaypointRegistry};
use glam::{Quat, Vec3};
use patrol_nav::{BackendKind, NavigationBackend, PathResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Identifies one destination request
///
/// A backend answering [`PathResult::Pending`] hands the verdict back through
/// [`PathingAgent::resolve_pending`] with the ticket of the request. Results
/// for superseded requests are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathTicket(u64);

/// Outcome of asking the backend for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Started,
    Pending,
    Failed,
}

/// What the failure policy decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Halted,
    Lerping,
    Retry { allow_random: bool },
}

/// Waypoint-following agent
pub struct PathingAgent<B: NavigationBackend> {
    name: String,
    config: AgentConfig,
    graph: WaypointGraph,
    backend: B,
    events: WaypointEvents,
    rng: ChaCha8Rng,
    transform: AgentTransform,
    cursor: Cursor,
    target: Option<WaypointId>,
    phase: MotionPhase,
    recovery: RecoveryMode,
    halted: bool,
    tether_suspended: bool,
    tether_anchor: Option<Vec3>,
    wait_remaining: f32,
    stop_at_next_waypoint: bool,
    is_grounded: bool,
    move_speed: f32,
    pending: Option<PathTicket>,
    requests: u64,
}

impl<B: NavigationBackend> PathingAgent<B> {
    /// Create an agent at the backend's current position
    pub fn new(name: impl Into<String>, config: AgentConfig, graph: WaypointGraph, backend: B) -> Result<Self> {
        let name = name.into();
        config.validate()?;
        graph.validate_for(config.pathing_mode, config.start_waypoint_index)?;

        let mesh_backed = backend.kind() == BackendKind::MeshBacked;
        let move_speed = if config.inherit_backend_speed && mesh_backed {
            backend.speed()
        } else {
            config.move_speed
        };
        let moves_itself = !mesh_backed || config.failure_response == NavFailureResponse::Lerp;
        if moves_itself && !(move_speed > 0.0) {
            return Err(AgentError::InvalidConfig(format!(
                "agent '{}' moves itself but its move speed is {}",
                name,
                move_speed
            )));
        }

        Ok(Self {
            name,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            transform: AgentTransform::from_position(backend.position()),
            cursor: Cursor::starting_at(config.start_waypoint_index),
            config,
            graph,
            backend,
            events: WaypointEvents::new(),
            target: None,
            phase: MotionPhase::Idle,
            recovery: RecoveryMode::None,
            halted: false,
            tether_suspended: false,
            tether_anchor: None,
            wait_remaining: 0.0,
            stop_at_next_waypoint: false,
            is_grounded: true,
            move_speed,
            pending: None,
            requests: 0,
        })
    }

    /// Set the initial facing (builder pattern)
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Attach "any waypoint" listeners (builder pattern)
    pub fn with_events(mut self, events: WaypointEvents) -> Self {
        self.events = events;
        self
    }

    /// Listen for arrival at any waypoint
    pub fn on_any_enter<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.add_enter_listener(callback);
    }

    /// Listen for departure from any waypoint
    pub fn on_any_exit<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.add_exit_listener(callback);
    }

    /// Snap the backend to the body and begin, if configured to
    ///
    /// Returns whether movement started. An agent not configured to begin on
    /// start is left halted until [`resume_pathing`](Self::resume_pathing) or a
    /// navigation command.
    pub fn start(&mut self) -> bool {
        self.backend.warp(self.transform.position);
        log::info!(
            "Agent '{}' starting {} patrol over {} waypoints",
            self.name,
            self.config.pathing_mode,
            self.graph.len()
        );

        if self.config.begin_on_start {
            self.navigate(None, false, 0.0)
        } else {
            self.halt();
            false
        }
    }

    /// Advance the agent by one tick
    pub fn update(&mut self, delta_time: f32) {
        if self.check_tether() {
            return;
        }
        if self.halted || self.tether_suspended {
            return;
        }

        if self.phase.is_at_waypoint() {
            self.wait_remaining = (self.wait_remaining - delta_time).max(0.0);
            if self.wait_remaining <= 0.0 && self.phase == MotionPhase::Dwelling {
                self.leave_waypoint();
            }
        }

        match self.phase {
            MotionPhase::Rotating => self.rotate_to_waypoint(delta_time),
            MotionPhase::Moving if !self.halted => {
                self.move_toward_target(delta_time);
                self.check_destination_reached();
            }
            _ => {}
        }
    }

    // -- Commands --------------------------------------------------------

    /// Pull the agent off its waypoint and head for the next one
    pub fn navigate_to_next_waypoint(&mut self, allow_random: bool, extra_wait: f32) -> bool {
        self.cancel_current_waypoint();
        self.navigate(None, allow_random, extra_wait)
    }

    /// Head for a specific waypoint
    ///
    /// A waypoint on the main route becomes the scheduled next waypoint. Any
    /// other registry waypoint is travelled to directly without touching the
    /// cursor.
    pub fn navigate_to_waypoint(&mut self, id: WaypointId, extra_wait: f32) -> bool {
        self.cancel_current_waypoint();

        if let Some(index) = self.graph.index_of(id) {
            self.cursor.next = index;
            return self.navigate(None, false, extra_wait);
        }

        if self.graph.waypoint(id).is_none() {
            log::warn!("Agent '{}' asked to navigate to unknown waypoint {}", self.name, id);
            return false;
        }

        log::debug!(
            "Agent '{}' navigating to {} outside its graph",
            self.name,
            id
        );
        self.navigate(Some(id), false, extra_wait)
    }

    /// Leave the current waypoint now, ignoring any remaining dwell time
    pub fn resume_at_next_waypoint(&mut self) -> bool {
        self.navigate_to_next_waypoint(true, 0.0)
    }

    /// Halt at the next arrival
    pub fn stop_at_next_waypoint_reached(&mut self) {
        self.stop_at_next_waypoint = true;
    }

    /// Halt the agent and its backend
    ///
    /// A dwell or turn in progress is cancelled and its exit notifications
    /// fire.
    pub fn stop_pathing(&mut self) {
        self.cancel_current_waypoint();
        self.halt();
    }

    /// Clear a halt
    ///
    /// The backend stays halted while the tether holds the agent.
    pub fn resume_pathing(&mut self) {
        self.halted = false;
        if !self.tether_suspended {
            self.backend.halt_movement(false);
        }
        log::debug!("Agent '{}' resumed pathing", self.name);
    }

    /// Re-enter the route at the waypoint nearest the body
    pub fn resume_at_closest_waypoint(&mut self) -> bool {
        if let Some(index) = self.graph.closest_index(self.transform.position) {
            self.cursor.next = index;
        }
        self.navigate_to_next_waypoint(false, 0.0)
    }

    /// Restart the route from the configured start index
    pub fn reset_pathing(&mut self) -> bool {
        // Exit hooks look at the cursor, so cancel before rewinding it
        self.cancel_current_waypoint();
        self.cursor = Cursor::starting_at(self.config.start_waypoint_index);
        self.navigate(None, false, 0.0)
    }

    /// Extend the current dwell
    pub fn add_wait_at_waypoint_time(&mut self, seconds: f32) {
        self.wait_remaining += seconds;
    }

    /// Turn the body to face `point`, keeping it level
    pub fn face_position(&mut self, point: Vec3) {
        if let Some(rotation) = motion::level_facing(self.transform.position, point) {
            self.transform.rotation = rotation;
        }
    }

    /// Set or clear the point the agent is leashed to
    pub fn set_tether_anchor(&mut self, anchor: Option<Vec3>) {
        self.tether_anchor = anchor;
    }

    /// Teleport the body and backend
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.backend.warp(position);
    }

    /// Replace the graph with a saved collection
    ///
    /// Every name must resolve; on failure the current graph and state are
    /// left untouched. On success pathing restarts from the start index.
    pub fn load_collection(
        &mut self,
        collection: &WaypointCollection,
        registry: &Arc<WaypointRegistry>,
    ) -> Result<()> {
        let graph = collection.resolve(registry).map_err(|err: GraphError| {
            log::error!("Agent '{}' could not load waypoint collection: {}", self.name, err);
            err
        })?;
        self.load_graph(graph)
    }

    /// Replace the graph and restart pathing
    pub fn load_graph(&mut self, graph: WaypointGraph) -> Result<()> {
        graph.validate_for(self.config.pathing_mode, self.config.start_waypoint_index)?;
        log::info!("Agent '{}' loaded a graph of {} waypoints", self.name, graph.len());
        self.graph = graph;
        self.reset_pathing();
        Ok(())
    }

    /// Deliver the verdict of a deferred destination request
    ///
    /// Returns whether the agent is travelling afterwards. Stale tickets are
    /// ignored.
    pub fn resolve_pending(&mut self, ticket: PathTicket, result: PathResult) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("Agent '{}' dropping stale path result {:?}", self.name, ticket);
            return false;
        }
        self.pending = None;

        let Some(target) = self.target else {
            return false;
        };

        match self.judge_result(target, result) {
            Attempt::Started => true,
            Attempt::Pending => {
                self.pending = Some(ticket);
                true
            }
            Attempt::Failed => {
                let is_main = self.is_main_target(target);
                let attempts = usize::from(is_main);
                match self.recover(target, is_main, attempts) {
                    Recovery::Halted => false,
                    Recovery::Lerping => true,
                    Recovery::Retry { allow_random } => self.run_attempts(None, allow_random, 0.0, attempts),
                }
            }
        }
    }

    // -- Accessors -------------------------------------------------------

    /// Agent name used in log output
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn graph(&self) -> &WaypointGraph {
        &self.graph
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn transform(&self) -> &AgentTransform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Waypoint most recently reached on the main route
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current
    }

    /// Main-route waypoint scheduled next
    pub fn next_index(&self) -> usize {
        self.cursor.next
    }

    pub fn is_reversing(&self) -> bool {
        self.cursor.reversing
    }

    /// Waypoint currently travelled to or stood at
    pub fn current_target(&self) -> Option<WaypointId> {
        self.target
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn recovery(&self) -> RecoveryMode {
        self.recovery
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether pathing has been halted, e.g. at the end of a single run
    pub fn finished_pathing(&self) -> bool {
        self.halted
    }

    pub fn is_stopped_for_tether(&self) -> bool {
        self.tether_suspended
    }

    pub fn is_at_waypoint(&self) -> bool {
        self.phase.is_at_waypoint()
    }

    pub fn is_rotating(&self) -> bool {
        self.phase == MotionPhase::Rotating
    }

    pub fn is_lerping_on_failure(&self) -> bool {
        self.recovery == RecoveryMode::LerpFallback
    }

    /// Whether the agent is travelling this tick
    pub fn is_walking(&self) -> bool {
        self.phase == MotionPhase::Moving && !self.halted && !self.tether_suspended
    }

    pub fn wait_remaining(&self) -> f32 {
        self.wait_remaining
    }

    /// Whether the body is on a navigable surface as far as the agent knows
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    /// Speed used when the agent moves itself
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn tether_anchor(&self) -> Option<Vec3> {
        self.tether_anchor
    }

    /// Ticket of the outstanding deferred request
    pub fn pending_ticket(&self) -> Option<PathTicket> {
        self.pending
    }

    /// Whether the stop-at-next latch is set
    pub fn stops_at_next_waypoint(&self) -> bool {
        self.stop_at_next_waypoint
    }

    // -- Target selection and failure handling ---------------------------

    fn is_mesh_backed(&self) -> bool {
        self.backend.kind() == BackendKind::MeshBacked
    }

    fn halt(&mut self) {
        self.halted = true;
        self.backend.halt_movement(true);
        log::debug!("Agent '{}' stopped pathing", self.name);
    }

    fn main_target(&self) -> Option<WaypointId> {
        let last = self.graph.len().saturating_sub(1);
        self.graph.id_at(self.cursor.next.min(last))
    }

    fn is_main_target(&self, target: WaypointId) -> bool {
        self.main_target() == Some(target)
    }

    fn select_next_target(&mut self, allow_random: bool) -> Option<WaypointId> {
        if allow_random {
            if let Some(current) = self.cursor.current {
                let alternates = self.graph.connections(current);
                if !alternates.is_empty() && self.rng.gen::<f32>() < self.config.random_connection_chance {
                    let pick = alternates[self.rng.gen_range(0..alternates.len())];
                    log::debug!("Agent '{}' taking random connection to {}", self.name, pick);
                    return Some(pick);
                }
            }
        }
        self.main_target()
    }

    /// Try targets until one starts, the policy halts, or retries run out
    fn navigate(&mut self, explicit: Option<WaypointId>, allow_random: bool, extra_wait: f32) -> bool {
        self.run_attempts(explicit, allow_random, extra_wait, 0)
    }

    fn run_attempts(
        &mut self,
        mut explicit: Option<WaypointId>,
        mut allow_random: bool,
        extra_wait: f32,
        mut main_attempts: usize,
    ) -> bool {
        loop {
            let Some(target) = explicit.take().or_else(|| self.select_next_target(allow_random)) else {
                self.halt();
                return false;
            };

            let is_main = self.is_main_target(target);
            if is_main {
                main_attempts += 1;
            }

            if self.begin_moving_to(target, extra_wait) != Attempt::Failed {
                return true;
            }

            match self.recover(target, is_main, main_attempts) {
                Recovery::Halted => return false,
                Recovery::Lerping => return true,
                Recovery::Retry { allow_random: next } => allow_random = next,
            }
        }
    }

    fn recover(&mut self, target: WaypointId, is_main: bool, main_attempts: usize) -> Recovery {
        match self.config.failure_response {
            NavFailureResponse::Stop => {
                log::error!("Agent '{}' cannot reach {}; stopping", self.name, target);
                self.halt();
                Recovery::Halted
            }
            NavFailureResponse::Lerp => {
                log::warn!(
                    "Agent '{}' cannot reach {}; moving directly",
                    self.name,
                    target
                );
                // Grounded status follows the body, which now travels to the target
                if let Some(waypoint) = self.graph.waypoint(target) {
                    self.is_grounded = self
                        .backend
                        .is_navigable(waypoint.position, self.config.ground_sample_distance);
                }
                self.recovery = RecoveryMode::LerpFallback;
                self.backend.set_position_control(false);
                self.backend.set_rotation_control(false);
                Recovery::Lerping
            }
            NavFailureResponse::Skip if is_main => {
                if main_attempts >= self.graph.len() {
                    log::warn!(
                        "Agent '{}' found no reachable waypoint after {} attempts; stopping",
                        self.name,
                        main_attempts
                    );
                    self.halt();
                    return Recovery::Halted;
                }
                let previous = self.cursor.next;
                if !self.advance_cursor() || self.cursor.next == previous {
                    self.halt();
                    return Recovery::Halted;
                }
                log::info!("Agent '{}' skipping unreachable {}", self.name, target);
                Recovery::Retry { allow_random: true }
            }
            NavFailureResponse::Skip => {
                log::info!(
                    "Agent '{}' cannot reach alternate {}; returning to route",
                    self.name,
                    target
                );
                Recovery::Retry { allow_random: false }
            }
        }
    }

    fn begin_moving_to(&mut self, target: WaypointId, extra_wait: f32) -> Attempt {
        let Some(waypoint) = self.graph.waypoint(target) else {
            return Attempt::Failed;
        };
        let (position, radius) = (waypoint.position, waypoint.stopping_distance);

        self.wait_remaining = extra_wait + waypoint.wait_time;
        self.halted = false;
        self.target = Some(target);
        self.phase = MotionPhase::Moving;
        self.recovery = RecoveryMode::None;
        self.pending = None;
        self.requests += 1;

        if !self.tether_suspended {
            self.backend.halt_movement(false);
        }
        if !self.is_mesh_backed() {
            self.backend.set_destination(position, radius);
            return Attempt::Started;
        }

        let result = self.backend.set_destination(position, radius);
        let attempt = self.judge_result(target, result);
        if attempt == Attempt::Pending {
            self.pending = Some(PathTicket(self.requests));
        }
        attempt
    }

    fn judge_result(&mut self, target: WaypointId, result: PathResult) -> Attempt {
        let Some(waypoint) = self.graph.waypoint(target) else {
            return Attempt::Failed;
        };
        let (position, radius) = (waypoint.position, waypoint.stopping_distance);

        if result == PathResult::Pending {
            return Attempt::Pending;
        }
        if result.is_acceptable(position, radius) && self.is_grounded {
            return Attempt::Started;
        }

        self.backend.reset_path();
        log::debug!(
            "Agent '{}' got {:?} for {} (radius {})",
            self.name,
            result,
            target,
            radius
        );
        Attempt::Failed
    }

    /// Advance the cursor, halting when the mode cannot continue
    fn advance_cursor(&mut self) -> bool {
        let step = mode::advance(self.config.pathing_mode, self.cursor, self.graph.len(), &mut self.rng);
        self.cursor = step.cursor;
        if !step.can_continue {
            log::info!("Agent '{}' finished its route", self.name);
            self.halt();
        }
        step.can_continue
    }

    // -- Waypoint enter and exit -----------------------------------------

    fn fire_exit(&self) {
        self.events.fire(WaypointEventType::Exit);
        let current_id = self.cursor.current.and_then(|i| self.graph.id_at(i));
        if let Some(target) = self.target.filter(|t| Some(*t) == current_id) {
            if let Some(waypoint) = self.graph.waypoint(target) {
                waypoint.fire(WaypointEventType::Exit);
            }
        }
    }

    fn cancel_current_waypoint(&mut self) {
        if !self.phase.is_at_waypoint() {
            return;
        }
        self.phase = MotionPhase::Idle;
        self.wait_remaining = 0.0;
        if self.is_mesh_backed() {
            self.backend.set_rotation_control(true);
        }
        self.fire_exit();
    }

    fn leave_waypoint(&mut self) {
        self.phase = MotionPhase::Idle;
        self.fire_exit();
        self.navigate(None, true, 0.0);
    }

    fn on_destination_reached(&mut self) {
        self.recovery = RecoveryMode::None;

        if self.is_mesh_backed() {
            self.backend.warp(self.transform.position);
            if self.is_grounded {
                self.backend.set_position_control(true);
                self.backend.set_rotation_control(true);
            }
        }

        if self.config.rotate_at_waypoints {
            self.phase = MotionPhase::Rotating;
            if self.is_mesh_backed() {
                self.backend.set_rotation_control(false);
            }
        } else {
            self.phase = MotionPhase::Dwelling;
        }

        if self.stop_at_next_waypoint {
            self.stop_at_next_waypoint = false;
            self.halt();
        }

        self.events.fire(WaypointEventType::Enter);

        let Some(target) = self.target else {
            return;
        };
        log::debug!("Agent '{}' reached {}", self.name, target);
        if self.is_main_target(target) {
            if let Some(waypoint) = self.graph.waypoint(target) {
                waypoint.fire(WaypointEventType::Enter);
            }
            self.advance_cursor();
        }
    }

    // -- Per-tick movement -----------------------------------------------

    fn target_waypoint(&self) -> Option<(Vec3, f32, Vec3)> {
        let waypoint = self.graph.waypoint(self.target?)?;
        Some((waypoint.position, waypoint.stopping_distance, waypoint.forward()))
    }

    fn moves_itself(&self) -> bool {
        !self.is_mesh_backed() || self.recovery == RecoveryMode::LerpFallback
    }

    fn turn_step(&self, delta_time: f32) -> f32 {
        (self.config.turn_degrees_per_sec * delta_time).to_radians()
    }

    fn rotate_to_waypoint(&mut self, delta_time: f32) {
        let Some((_, _, forward)) = self.target_waypoint() else {
            self.phase = MotionPhase::Dwelling;
            return;
        };

        let facing = motion::look_rotation(forward, self.transform.up()).unwrap_or(self.transform.rotation);
        self.transform.rotation = motion::rotate_towards(self.transform.rotation, facing, self.turn_step(delta_time));

        if self.transform.rotation == facing {
            self.phase = MotionPhase::Dwelling;
            if self.is_mesh_backed() {
                self.backend.set_rotation_control(true);
            }
            if self.wait_remaining <= 0.0 {
                self.leave_waypoint();
            }
        }
    }

    fn move_toward_target(&mut self, delta_time: f32) {
        if self.moves_itself() {
            let Some((position, _, _)) = self.target_waypoint() else {
                return;
            };
            let to_target = position - self.transform.position;
            let distance = to_target.length();
            if distance > 0.0 {
                let step = (self.move_speed * delta_time).min(distance);
                self.transform.position += to_target / distance * step;

                if let Some(facing) = motion::look_rotation(to_target, Vec3::Y) {
                    self.transform.rotation =
                        motion::rotate_towards(self.transform.rotation, facing, self.turn_step(delta_time));
                }
            }
            if !self.is_mesh_backed() {
                self.backend.warp(self.transform.position);
            }
            return;
        }

        self.backend.step(delta_time);
        if self.backend.has_position_control() {
            self.transform.position = self.backend.position();
        }
        if self.backend.has_rotation_control() {
            if let Some(facing) = motion::look_rotation(self.backend.velocity(), Vec3::Y) {
                self.transform.rotation = facing;
            }
        }
    }

    fn check_destination_reached(&mut self) {
        let Some((position, radius, _)) = self.target_waypoint() else {
            return;
        };

        let arrived = if self.moves_itself() {
            self.transform.position.distance_squared(position) <= radius * radius
        } else {
            self.pending.is_none()
                && !self.backend.is_path_pending()
                && self.backend.remaining_distance() <= radius
        };

        if arrived {
            self.on_destination_reached();
        }
    }

    // -- Tether ----------------------------------------------------------

    /// Returns `true` when the tether paused the agent this tick
    fn check_tether(&mut self) -> bool {
        let verdict = match (self.tether_anchor, self.target_waypoint()) {
            (Some(anchor), Some((target, _, _))) => {
                tether::evaluate(&self.config.tether, self.transform.position, target, anchor)
            }
            _ => TetherVerdict::Free,
        };

        match verdict {
            TetherVerdict::Suspend if !self.tether_suspended => {
                self.tether_suspended = true;
                self.backend.halt_movement(true);
                log::debug!("Agent '{}' held by tether", self.name);
                true
            }
            TetherVerdict::Suspend => false,
            TetherVerdict::Free => {
                if self.tether_suspended {
                    self.tether_suspended = false;
                    if !self.halted {
                        self.backend.halt_movement(false);
                    }
                    log::debug!("Agent '{}' released by tether", self.name);
                }
                false
            }
        }
    }
}

impl<B: NavigationBackend + std::fmt::Debug> std::fmt::Debug for PathingAgent<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathingAgent")
            .field("name", &self.name)
            .field("cursor", &self.cursor)
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("recovery", &self.recovery)
            .field("halted", &self.halted)
            .field("tether_suspended", &self.tether_suspended)
            .field("backend", &self.backend)
            .finish()
    }
}
