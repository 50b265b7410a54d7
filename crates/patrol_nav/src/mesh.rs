//! Navigation mesh and polygon-graph pathfinding

use crate::path::NavPath;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A polygon in the navigation mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavPolygon {
    /// Vertex indices
    pub vertices: Vec<usize>,
    /// Center point
    pub center: Vec3,
    /// Neighboring polygon indices
    pub neighbors: Vec<usize>,
    /// Area cost multiplier (higher = harder to traverse)
    pub cost: f32,
    /// Whether this polygon is walkable
    pub walkable: bool,
}

impl NavPolygon {
    /// Create a new polygon
    pub fn new(vertices: Vec<usize>, center: Vec3) -> Self {
        Self {
            vertices,
            center,
            neighbors: Vec::new(),
            cost: 1.0,
            walkable: true,
        }
    }
}

/// Navigation mesh for pathfinding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavMesh {
    /// Vertices of the mesh
    pub vertices: Vec<Vec3>,
    /// Polygons of the mesh
    pub polygons: Vec<NavPolygon>,
    /// Grid cell size for spatial queries
    cell_size: f32,
    /// Spatial hash for quick polygon lookup
    #[serde(skip)]
    spatial_hash: HashMap<(i32, i32), Vec<usize>>,
}

impl NavMesh {
    /// Create a new empty nav mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            polygons: Vec::new(),
            cell_size: 5.0,
            spatial_hash: HashMap::new(),
        }
    }

    /// Create a flat grid nav mesh on the XZ plane
    pub fn create_grid(width: f32, depth: f32, cell_size: f32) -> Self {
        let mut mesh = Self::new();
        mesh.cell_size = cell_size;

        let cols = (width / cell_size).ceil() as i32;
        let rows = (depth / cell_size).ceil() as i32;

        for row in 0..=rows {
            for col in 0..=cols {
                let x = col as f32 * cell_size;
                let z = row as f32 * cell_size;
                mesh.vertices.push(Vec3::new(x, 0.0, z));
            }
        }

        // Quads, one per cell
        let stride = (cols + 1) as usize;
        for row in 0..rows {
            for col in 0..cols {
                let base = (row as usize * stride) + col as usize;
                let vertices = vec![base, base + 1, base + stride + 1, base + stride];

                let center_x = (col as f32 + 0.5) * cell_size;
                let center_z = (row as f32 + 0.5) * cell_size;
                let center = Vec3::new(center_x, 0.0, center_z);

                mesh.polygons.push(NavPolygon::new(vertices, center));
            }
        }

        let poly_stride = cols as usize;
        for row in 0..rows as usize {
            for col in 0..cols as usize {
                let idx = row * poly_stride + col;
                let mut neighbors = Vec::new();

                if col > 0 {
                    neighbors.push(idx - 1);
                }
                if col < poly_stride - 1 {
                    neighbors.push(idx + 1);
                }
                if row > 0 {
                    neighbors.push(idx - poly_stride);
                }
                if row < (rows as usize) - 1 {
                    neighbors.push(idx + poly_stride);
                }

                mesh.polygons[idx].neighbors = neighbors;
            }
        }

        mesh.rebuild_spatial_hash();
        mesh
    }

    /// Rebuild spatial hash for queries
    pub fn rebuild_spatial_hash(&mut self) {
        self.spatial_hash.clear();
        for (idx, poly) in self.polygons.iter().enumerate() {
            let cell = self.cell_of(poly.center);
            self.spatial_hash.entry(cell).or_default().push(idx);
        }
    }

    fn cell_of(&self, point: Vec3) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.z / self.cell_size).floor() as i32,
        )
    }

    /// Axis-aligned bounds of a polygon
    pub fn polygon_bounds(&self, polygon_idx: usize) -> (Vec3, Vec3) {
        let poly = &self.polygons[polygon_idx];
        poly.vertices.iter().map(|&v| self.vertices[v]).fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(v), max.max(v)),
        )
    }

    /// Closest point on a polygon's surface to `point`
    pub fn closest_point_in_polygon(&self, polygon_idx: usize, point: Vec3) -> Vec3 {
        let (min, max) = self.polygon_bounds(polygon_idx);
        point.clamp(min, max)
    }

    /// Check if a point lies over a walkable polygon (ignoring height)
    fn point_in_polygon(&self, point: Vec3, polygon_idx: usize) -> bool {
        if !self.polygons[polygon_idx].walkable {
            return false;
        }
        let (min, max) = self.polygon_bounds(polygon_idx);
        point.x >= min.x && point.x <= max.x && point.z >= min.z && point.z <= max.z
    }

    /// Find the walkable polygon a point lies over
    pub fn find_polygon(&self, point: Vec3) -> Option<usize> {
        let (cell_x, cell_z) = self.cell_of(point);

        for dx in -1..=1 {
            for dz in -1..=1 {
                if let Some(indices) = self.spatial_hash.get(&(cell_x + dx, cell_z + dz)) {
                    for &idx in indices {
                        if self.point_in_polygon(point, idx) {
                            return Some(idx);
                        }
                    }
                }
            }
        }

        // Fallback: check all polygons
        (0..self.polygons.len()).find(|&idx| self.point_in_polygon(point, idx))
    }

    /// Find the nearest point on any walkable polygon within `max_distance`
    pub fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        self.polygons
            .iter()
            .enumerate()
            .filter(|(_, poly)| poly.walkable)
            .map(|(idx, _)| self.closest_point_in_polygon(idx, point))
            .map(|closest| (closest, closest.distance_squared(point)))
            .filter(|(_, dist_sq)| *dist_sq <= max_distance * max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(closest, _)| closest)
    }

    /// Find a path between two points using A*
    ///
    /// Returns `None` unless both ends lie over walkable polygons and the goal
    /// is reachable.
    pub fn find_path(&self, start: Vec3, end: Vec3) -> Option<NavPath> {
        match self.find_path_or_closest(start, end) {
            Some((path, true)) => Some(path),
            _ => None,
        }
    }

    /// Find a path toward `end`, falling back to the closest reachable point
    ///
    /// The flag is `true` when the goal polygon itself was reached. When the
    /// goal is unreachable (or off the mesh) the path ends at the point of the
    /// closest polygon the search could reach. Returns `None` only when `start`
    /// is not on the mesh.
    pub fn find_path_or_closest(&self, start: Vec3, end: Vec3) -> Option<(NavPath, bool)> {
        let start_poly = self.find_polygon(start)?;
        let end_poly = self.find_polygon(end);

        let (polygons, reached_goal) = self.astar(start_poly, end_poly, end);

        let mut points = vec![start];
        if polygons.len() > 2 {
            for &idx in &polygons[1..polygons.len() - 1] {
                points.push(self.polygons[idx].center);
            }
        }
        let last = *polygons.last().unwrap_or(&start_poly);
        points.push(self.closest_point_in_polygon(last, end));

        Some((NavPath::new(points), reached_goal))
    }

    /// A* pathfinding on polygon graph
    ///
    /// On failure returns the route to the expanded polygon closest to
    /// `end_point`.
    fn astar(&self, start: usize, goal: Option<usize>, end_point: Vec3) -> (Vec<usize>, bool) {
        #[derive(Clone, Copy)]
        struct Node {
            idx: usize,
            f_score: f32,
        }

        impl PartialEq for Node {
            fn eq(&self, other: &Self) -> bool {
                self.idx == other.idx
            }
        }

        impl Eq for Node {}

        impl PartialOrd for Node {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for Node {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                other.f_score.total_cmp(&self.f_score)
            }
        }

        let reconstruct = |came_from: &HashMap<usize, usize>, last: usize| {
            let mut path = vec![last];
            let mut current_idx = last;
            while let Some(&prev) = came_from.get(&current_idx) {
                path.push(prev);
                current_idx = prev;
            }
            path.reverse();
            path
        };

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();
        let mut g_score: HashMap<usize, f32> = HashMap::new();
        let mut closed_set: HashSet<usize> = HashSet::new();

        let mut closest = start;
        let mut closest_dist = self.closest_point_in_polygon(start, end_point).distance(end_point);

        g_score.insert(start, 0.0);
        open_set.push(Node {
            idx: start,
            f_score: self.polygons[start].center.distance(end_point),
        });

        while let Some(current) = open_set.pop() {
            if Some(current.idx) == goal {
                return (reconstruct(&came_from, current.idx), true);
            }

            if !closed_set.insert(current.idx) {
                continue;
            }

            let dist = self
                .closest_point_in_polygon(current.idx, end_point)
                .distance(end_point);
            if dist < closest_dist {
                closest = current.idx;
                closest_dist = dist;
            }

            let current_g = *g_score.get(&current.idx).unwrap_or(&f32::MAX);
            let current_poly = &self.polygons[current.idx];

            for &neighbor_idx in &current_poly.neighbors {
                if closed_set.contains(&neighbor_idx) {
                    continue;
                }

                let neighbor_poly = &self.polygons[neighbor_idx];
                if !neighbor_poly.walkable {
                    continue;
                }

                let distance = current_poly.center.distance(neighbor_poly.center);
                let tentative_g = current_g + distance * neighbor_poly.cost;

                let neighbor_g = *g_score.get(&neighbor_idx).unwrap_or(&f32::MAX);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor_idx, current.idx);
                    g_score.insert(neighbor_idx, tentative_g);

                    let h = neighbor_poly.center.distance(end_point);
                    open_set.push(Node {
                        idx: neighbor_idx,
                        f_score: tentative_g + h,
                    });
                }
            }
        }

        (reconstruct(&came_from, closest), false)
    }

    /// Mark a polygon as walkable or blocked
    pub fn set_walkable(&mut self, polygon_idx: usize, walkable: bool) {
        if let Some(poly) = self.polygons.get_mut(polygon_idx) {
            poly.walkable = walkable;
        }
    }

    /// Set cost for a polygon
    pub fn set_cost(&mut self, polygon_idx: usize, cost: f32) {
        if let Some(poly) = self.polygons.get_mut(polygon_idx) {
            poly.cost = cost;
        }
    }
}
