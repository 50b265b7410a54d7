//! Enter and exit notifications

use serde::{Deserialize, Serialize};

/// Kind of waypoint notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaypointEventType {
    /// The agent arrived at a waypoint
    Enter,
    /// The agent left, or was pulled away from, a waypoint
    Exit,
}

/// Callback type for waypoint notifications
pub type WaypointCallback = Box<dyn Fn() + Send + Sync>;

/// Listener lists for enter and exit notifications
///
/// Used both for per-waypoint hooks and for an agent's "any waypoint"
/// listeners. Listeners run in registration order.
#[derive(Default)]
pub struct WaypointEvents {
    on_enter: Vec<WaypointCallback>,
    on_exit: Vec<WaypointCallback>,
}

impl WaypointEvents {
    /// Create an empty listener set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enter listener (builder pattern)
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_enter.push(Box::new(callback));
        self
    }

    /// Add an exit listener (builder pattern)
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_exit.push(Box::new(callback));
        self
    }

    /// Register an enter listener
    pub fn add_enter_listener<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_enter.push(Box::new(callback));
    }

    /// Register an exit listener
    pub fn add_exit_listener<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_exit.push(Box::new(callback));
    }

    /// Invoke every listener for `event_type`
    pub fn fire(&self, event_type: WaypointEventType) {
        let listeners = match event_type {
            WaypointEventType::Enter => &self.on_enter,
            WaypointEventType::Exit => &self.on_exit,
        };
        for callback in listeners {
            callback();
        }
    }

    /// Number of listeners for `event_type`
    pub fn listener_count(&self, event_type: WaypointEventType) -> usize {
        match event_type {
            WaypointEventType::Enter => self.on_enter.len(),
            WaypointEventType::Exit => self.on_exit.len(),
        }
    }

    /// Whether no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.on_enter.is_empty() && self.on_exit.is_empty()
    }
}

impl std::fmt::Debug for WaypointEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointEvents")
            .field("on_enter", &self.on_enter.len())
            .field("on_exit", &self.on_exit.len())
            .finish()
    }
}
