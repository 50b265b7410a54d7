//! Pathing modes and the waypoint cursor they advance

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the next waypoint index is chosen after each arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathingMode {
    /// Visit each waypoint once, then stop
    SingleRun,
    /// Wrap from the last waypoint back to the first
    #[default]
    Loop,
    /// Walk to the end, then back to the start, forever
    PingPong,
    /// Jump to a random segment after every arrival
    Random,
}

impl PathingMode {
    /// Fewest waypoints this mode can run on
    pub fn min_waypoints(self) -> usize {
        match self {
            Self::SingleRun | Self::Loop => 1,
            Self::PingPong | Self::Random => 2,
        }
    }
}

impl std::fmt::Display for PathingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleRun => write!(f, "single_run"),
            Self::Loop => write!(f, "loop"),
            Self::PingPong => write!(f, "ping_pong"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for PathingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single_run" | "single" | "once" => Ok(Self::SingleRun),
            "loop" => Ok(Self::Loop),
            "ping_pong" | "pingpong" => Ok(Self::PingPong),
            "random" => Ok(Self::Random),
            _ => Err(format!("Unknown pathing mode: {}", s)),
        }
    }
}

/// Position of an agent in its waypoint list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    /// Waypoint most recently reached, `None` before the first arrival
    pub current: Option<usize>,
    /// Waypoint scheduled next
    pub next: usize,
    /// Ping-pong direction
    pub reversing: bool,
}

impl Cursor {
    /// Fresh cursor heading for `next`
    pub fn starting_at(next: usize) -> Self {
        Self {
            current: None,
            next,
            reversing: false,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

/// Outcome of one cursor advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub cursor: Cursor,
    /// `false` once a single run has reached its last waypoint
    pub can_continue: bool,
}

impl Advance {
    fn to(cursor: Cursor) -> Self {
        Self {
            cursor,
            can_continue: true,
        }
    }

    fn halt(cursor: Cursor) -> Self {
        Self {
            cursor,
            can_continue: false,
        }
    }
}

/// Move the cursor one arrival forward under `mode`
///
/// `count` is the number of waypoints. Modes needing two waypoints report
/// `can_continue = false` and leave the cursor alone when given fewer.
///
/// `Random` treats the route as a ring: the segment from the last waypoint
/// back to the first is a candidate like any other. With two waypoints and
/// `next == 1` it is the only segment that moves `next`, so dropping it
/// would leave the draw stuck.
pub fn advance<R: Rng + ?Sized>(mode: PathingMode, cursor: Cursor, count: usize, rng: &mut R) -> Advance {
    if count < mode.min_waypoints() {
        return Advance::halt(cursor);
    }

    let last = count - 1;
    let current = cursor.current.map_or(-1, |c| c as i64);
    let next = cursor.next;

    match mode {
        PathingMode::SingleRun => {
            if next >= last {
                return Advance::halt(cursor);
            }
            Advance::to(Cursor {
                current: Some((current + 1) as usize),
                next: next + 1,
                ..cursor
            })
        }
        PathingMode::Loop => {
            let (current, next) = if next >= last {
                (current + 1, 0)
            } else if next == 0 {
                (0, 1)
            } else {
                (current + 1, next + 1)
            };
            Advance::to(Cursor {
                current: Some(current.clamp(0, last as i64) as usize),
                next: next.min(count),
                ..cursor
            })
        }
        PathingMode::PingPong => {
            let (current, next, reversing) = if cursor.reversing {
                if next == 0 {
                    (current - 1, 1, false)
                } else {
                    (current - 1, next - 1, true)
                }
            } else if next >= last {
                (current + 1, count - 2, true)
            } else {
                (current + 1, next + 1, false)
            };
            Advance::to(Cursor {
                current: Some(current.clamp(0, last as i64) as usize),
                next,
                reversing,
            })
        }
        PathingMode::Random => {
            // Segment starts whose successor is the old `next` are excluded, so
            // draw over the remaining ones and shift past the gap.
            let start = if next < count {
                let excluded = (next + last) % count;
                let draw = rng.gen_range(0..last);
                if draw >= excluded {
                    draw + 1
                } else {
                    draw
                }
            } else {
                rng.gen_range(0..count)
            };
            Advance::to(Cursor {
                current: Some(start),
                next: (start + 1) % count,
                ..cursor
            })
        }
    }
}
