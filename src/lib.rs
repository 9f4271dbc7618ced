//! Starfall - a small side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game lifecycle)
//! - `config`: Data-driven world layout and tuning
//! - `audio`: Notification boundary for the sound collaborator
//! - `platform`: Input-source adapters (keyboard, touch buttons)

pub mod audio;
pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::{HazardTuning, PickupLayout, PlatformSpec, RestartPolicy, WorldConfig};
pub use error::ConfigError;

/// Default tuning constants (the reference layout)
pub mod consts {
    /// Nominal simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta a single tick will integrate
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 370.0;
    /// Downward acceleration, pixels/s²
    pub const GRAVITY: f32 = 800.0;

    /// Player sprite frame size
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 250.0;
    pub const PLAYER_BOUNCE: f32 = 0.1;
    /// Horizontal run speed (pixels/s)
    pub const MOVE_SPEED: f32 = 350.0;
    /// Upward velocity applied on jump (pixels/s)
    pub const JUMP_IMPULSE: f32 = 600.0;

    /// Pickup pool
    pub const PICKUP_COUNT: u32 = 12;
    pub const PICKUP_START_X: f32 = 12.0;
    pub const PICKUP_STEP_X: f32 = 70.0;
    pub const PICKUP_WIDTH: f32 = 24.0;
    pub const PICKUP_HEIGHT: f32 = 22.0;
    pub const PICKUP_BOUNCE_MIN: f32 = 0.4;
    pub const PICKUP_BOUNCE_MAX: f32 = 0.8;
    /// Points per collected pickup
    pub const PICKUP_SCORE: u64 = 10;

    /// Hazard spawn tuning
    pub const HAZARD_SIZE: f32 = 14.0;
    pub const HAZARD_SPAWN_Y: f32 = 16.0;
    pub const HAZARD_MAX_SPEED_X: f32 = 200.0;
    pub const HAZARD_FALL_SPEED: f32 = 20.0;

    /// Platform art size before scaling
    pub const PLATFORM_BASE_WIDTH: f32 = 400.0;
    pub const PLATFORM_BASE_HEIGHT: f32 = 32.0;

    /// Auto-restart delay after defeat (ms)
    pub const RESTART_DELAY_MS: u32 = 3000;
    /// How long the defeat banner stays up (ms)
    pub const DEFEAT_BANNER_MS: u32 = 2000;
    /// Banner offset above the player (pixels)
    pub const DEFEAT_BANNER_OFFSET_Y: f32 = 30.0;
    /// Tint applied to a defeated player
    pub const HIT_TINT: u32 = 0xD5031A;
}

/// Format the HUD score line
#[inline]
pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}
