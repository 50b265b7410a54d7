//! Paths produced by the navigation mesh

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A path through the navigation mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavPath {
    /// Corner points along the path
    pub points: Vec<Vec3>,
    /// Index of the point currently being approached
    pub current_index: usize,
}

impl NavPath {
    /// Create a path from its corner points
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            current_index: 0,
        }
    }

    /// Check if path is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if every point has been reached
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.points.len()
    }

    /// Point currently being approached
    pub fn current_point(&self) -> Option<Vec3> {
        self.points.get(self.current_index).copied()
    }

    /// Final destination
    pub fn destination(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Whether the point being approached is the final one
    pub fn is_on_last_leg(&self) -> bool {
        self.current_index + 1 >= self.points.len()
    }

    /// Advance to next point
    pub fn advance(&mut self) {
        if self.current_index < self.points.len() {
            self.current_index += 1;
        }
    }

    /// Distance left to travel from `position` along the rest of the path
    pub fn remaining_distance_from(&self, position: Vec3) -> f32 {
        let Some(current) = self.current_point() else {
            return 0.0;
        };

        let mut distance = position.distance(current);
        for i in self.current_index..self.points.len() - 1 {
            distance += self.points[i].distance(self.points[i + 1]);
        }
        distance
    }

    /// Get total path length
    pub fn total_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}
