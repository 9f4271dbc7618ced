//! Motion integration
//!
//! Gravity, velocity and world-bounds clamping for every dynamic body, plus
//! the end-of-step ground contact pass. Platforms never move.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::state::{EntityRegistry, Platform};

/// How far a body's bottom may sit from a platform top and still count as resting
pub const GROUND_EPSILON: f32 = 0.5;

/// Gravity and world bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsWorld {
    /// World rectangle is (0, 0) to `size`
    pub size: Vec2,
    /// Downward acceleration
    pub gravity: f32,
    /// Frozen after the player is defeated
    paused: bool,
    /// Length of the last integrated step, seconds
    #[serde(default)]
    step_dt: f32,
}

impl PhysicsWorld {
    pub fn new(size: Vec2, gravity: f32) -> Self {
        Self {
            size,
            gravity,
            paused: false,
            step_dt: 0.0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop integrating; bodies keep their velocity but no longer move
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance every dynamic body by `dt` seconds
    pub fn integrate(&mut self, entities: &mut EntityRegistry, dt: f32) {
        if self.paused {
            return;
        }
        self.step_dt = dt;
        for body in entities.dynamic_bodies_mut() {
            body.prev_pos = body.pos;
            body.vel.y += self.gravity * dt;
            body.pos += body.vel * dt;
            if body.collide_world_bounds {
                self.clamp_to_bounds(body);
            }
        }
    }

    /// Keep `body` inside the world; the blocked velocity component is
    /// reflected and scaled by the body's bounce
    pub fn clamp_to_bounds(&self, body: &mut Body) {
        let half = body.half_size();

        if body.pos.x < half.x {
            body.pos.x = half.x;
            if body.vel.x < 0.0 {
                body.vel.x = -body.vel.x * body.bounce;
            }
        } else if body.pos.x > self.size.x - half.x {
            body.pos.x = self.size.x - half.x;
            if body.vel.x > 0.0 {
                body.vel.x = -body.vel.x * body.bounce;
            }
        }

        if body.pos.y < half.y {
            body.pos.y = half.y;
            if body.vel.y < 0.0 {
                body.vel.y = -body.vel.y * body.bounce;
            }
        } else if body.pos.y > self.size.y - half.y {
            body.pos.y = self.size.y - half.y;
            if body.vel.y > 0.0 {
                body.vel.y = -body.vel.y * body.bounce;
            }
        }
    }

    /// Vertical velocity after a perfectly elastic bounce.
    ///
    /// The integrator conserves `(vy + g*dt/2)^2 - 2*g*y` in free flight.
    /// `moved_y` is how far the contact pushed the body; the rebound keeps
    /// that quantity unchanged, so the body climbs back to the same height
    /// no matter how deep it sank into the surface this step.
    pub fn elastic_rebound(&self, vel_y: f32, moved_y: f32, upward: bool) -> f32 {
        let half_kick = self.gravity * self.step_dt * 0.5;
        let speed_sq = (vel_y + half_kick).powi(2) + 2.0 * self.gravity * moved_y;
        let speed = speed_sq.max(0.0).sqrt();
        if upward {
            -speed - half_kick
        } else {
            speed - half_kick
        }
    }

    /// Recompute `touching_ground` for every dynamic body from resolved positions
    pub fn update_ground_contacts(&self, entities: &mut EntityRegistry) {
        let (platforms, bodies) = entities.split_static_dynamic();
        for body in bodies {
            body.touching_ground =
                body.vel.y >= 0.0 && platforms.iter().any(|p| rests_on(body, p));
        }
    }
}

/// Bottom edge sits on the platform's top face and the spans overlap
pub fn rests_on(body: &Body, platform: &Platform) -> bool {
    (body.bottom() - platform.body.top()).abs() <= GROUND_EPSILON
        && body.aabb().overlaps_x(&platform.body.aabb())
}
