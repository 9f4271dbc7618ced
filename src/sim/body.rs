//! Axis-aligned bodies
//!
//! Screen coordinates: x grows right, y grows down. Bodies are positioned by
//! their center, so `bottom()` is `pos.y + size.y / 2`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Horizontal spans overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }
}

/// A simulated rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position
    pub pos: Vec2,
    /// Position at the start of the current step (for swept landing checks)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Resting on top of a platform after the last physics step
    pub touching_ground: bool,
    /// Keep the body inside the world rectangle
    pub collide_world_bounds: bool,
    /// Restitution in [0, 1]
    pub bounce: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            size,
            touching_ground: false,
            collide_world_bounds: false,
            bounce: 0.0,
        }
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Bounds at the start of the step
    #[inline]
    pub fn prev_aabb(&self) -> Aabb {
        Aabb::from_center(self.prev_pos, self.size)
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    /// Move to `pos` and stop; clears contact state (explicit reset)
    pub fn reset_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev_pos = pos;
        self.vel = Vec2::ZERO;
        self.touching_ground = false;
    }
}
