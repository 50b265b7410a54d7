//! Patrol Nav - Navigation backends for waypoint agents
//!
//! This crate provides the movement side of a patrol agent: something that can
//! be asked for a path to a point, reports how far along that path it is, and
//! moves a body along it.
//!
//! # Features
//!
//! - Grid navigation mesh with A* over polygon centres
//! - Partial paths to the closest reachable polygon
//! - Navigable-surface sampling
//! - Mesh-backed and direct-line backends behind one trait
//!
//! # Example
//!
//! ```ignore
//! use patrol_nav::prelude::*;
//!
//! let mesh = NavMesh::create_grid(20.0, 20.0, 5.0);
//! let mut backend = MeshBackend::new(mesh, 3.5);
//! backend.warp(Vec3::new(2.5, 0.0, 2.5));
//!
//! match backend.set_destination(Vec3::new(17.5, 0.0, 17.5), 0.5) {
//!     PathResult::Complete(dest) => println!("heading to {dest}"),
//!     other => println!("no usable path: {other:?}"),
//! }
//! ```

pub mod backend;
pub mod direct;
pub mod mesh;
pub mod mesh_backend;
pub mod path;

pub mod prelude {
    pub use crate::backend::{BackendKind, NavigationBackend, PathResult};
    pub use crate::direct::DirectLineBackend;
    pub use crate::mesh::{NavMesh, NavPolygon};
    pub use crate::mesh_backend::MeshBackend;
    pub use crate::path::NavPath;
    pub use glam::Vec3;
}

pub use prelude::*;
