//! Axis-aligned bounds handed to the collision layer
//!
//! The generator never resolves contacts itself; it only describes where
//! solid panels, spikes, hole triggers and pickups are.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Check overlap with a circle (player body, pickup collider)
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min(), self.max());
        closest.distance_squared(center) <= radius * radius
    }

    /// Check overlap with another box
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (other.center - self.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x <= reach.x && d.y <= reach.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps_circle() {
        let b = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert!(b.overlaps_circle(Vec2::new(1.4, 0.0), 0.5));
        assert!(!b.overlaps_circle(Vec2::new(1.6, 0.0), 0.5));
        // Diagonal: nearest point is the corner (1, 1)
        assert!(!b.overlaps_circle(Vec2::new(1.5, 1.5), 0.7));
        assert!(b.overlaps_circle(Vec2::new(1.4, 1.4), 0.7));
    }

    #[test]
    fn test_overlaps() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::new(Vec2::new(0.9, 0.0), Vec2::ONE);
        let c = Aabb::new(Vec2::new(1.1, 0.0), Vec2::ONE);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Touching edges count
        assert!(a.overlaps(&Aabb::new(Vec2::new(0.0, 1.0), Vec2::ONE)));
    }
}
