//! World configuration
//!
//! Loaded once per session from JSON (or taken from defaults) and treated as
//! immutable afterwards. Every field has a default, so a config file only
//! needs the values it wants to change.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// When a defeated player gets put back into play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Restart during the same tick the player is defeated
    Immediate,
    /// Restart automatically once the delay has elapsed
    Delayed { delay_ms: u32 },
    /// Only an explicit restart request brings the game back
    Manual,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        RestartPolicy::Delayed {
            delay_ms: RESTART_DELAY_MS,
        }
    }
}

/// A static platform, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    /// Unscaled art width
    pub width: f32,
    /// Unscaled art height
    pub height: f32,
    pub scale: f32,
}

impl Default for PlatformSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: PLATFORM_BASE_WIDTH,
            height: PLATFORM_BASE_HEIGHT,
            scale: 1.0,
        }
    }
}

impl PlatformSpec {
    pub fn new(x: f32, y: f32, scale: f32) -> Self {
        Self {
            x,
            y,
            scale,
            ..Default::default()
        }
    }

    /// Size after scaling
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * self.scale
    }
}

/// Player spawn and movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub width: f32,
    pub height: f32,
    pub bounce: f32,
    pub move_speed: f32,
    pub jump_impulse: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn_x: PLAYER_SPAWN_X,
            spawn_y: PLAYER_SPAWN_Y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            bounce: PLAYER_BOUNCE,
            move_speed: MOVE_SPEED,
            jump_impulse: JUMP_IMPULSE,
        }
    }
}

impl PlayerTuning {
    pub fn spawn(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }
}

/// Pickup pool layout: `count` pickups in a row starting at `start_x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupLayout {
    pub count: u32,
    pub start_x: f32,
    pub step_x: f32,
    pub width: f32,
    pub height: f32,
    /// Each pickup draws its bounce from [bounce_min, bounce_max]
    pub bounce_min: f32,
    pub bounce_max: f32,
    pub score: u64,
}

impl Default for PickupLayout {
    fn default() -> Self {
        Self {
            count: PICKUP_COUNT,
            start_x: PICKUP_START_X,
            step_x: PICKUP_STEP_X,
            width: PICKUP_WIDTH,
            height: PICKUP_HEIGHT,
            bounce_min: PICKUP_BOUNCE_MIN,
            bounce_max: PICKUP_BOUNCE_MAX,
            score: PICKUP_SCORE,
        }
    }
}

impl PickupLayout {
    /// Home column of the pickup at `index`
    pub fn base_x(&self, index: u32) -> f32 {
        self.start_x + index as f32 * self.step_x
    }
}

/// Hazard spawn tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Vertical offset from the top of the world
    pub spawn_y: f32,
    pub size: f32,
    /// Horizontal speed is drawn from [-max_speed_x, max_speed_x]
    pub max_speed_x: f32,
    pub fall_speed: f32,
    pub bounce: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            spawn_y: HAZARD_SPAWN_Y,
            size: HAZARD_SIZE,
            max_speed_x: HAZARD_MAX_SPEED_X,
            fall_speed: HAZARD_FALL_SPEED,
            bounce: 1.0,
        }
    }
}

/// Complete world description for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub platforms: Vec<PlatformSpec>,
    pub player: PlayerTuning,
    pub pickups: PickupLayout,
    pub hazard: HazardTuning,
    pub restart: RestartPolicy,
    pub defeat_banner_ms: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            gravity: GRAVITY,
            platforms: vec![
                // Floor
                PlatformSpec::new(400.0, 330.0, 2.0),
                PlatformSpec::new(130.0, 110.0, 0.4),
                PlatformSpec::new(600.0, 220.0, 0.4),
                PlatformSpec::new(450.0, 100.0, 0.4),
                PlatformSpec::new(750.0, 110.0, 0.4),
                PlatformSpec::new(250.0, 220.0, 0.4),
            ],
            player: PlayerTuning::default(),
            pickups: PickupLayout::default(),
            hazard: HazardTuning::default(),
            restart: RestartPolicy::default(),
            defeat_banner_ms: DEFEAT_BANNER_MS,
        }
    }
}

impl WorldConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the built-in layout
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default world config");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        finite("gravity", self.gravity)?;

        if self.platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }
        for platform in &self.platforms {
            finite("platform.x", platform.x)?;
            finite("platform.y", platform.y)?;
            positive("platform.width", platform.width)?;
            positive("platform.height", platform.height)?;
            positive("platform.scale", platform.scale)?;
        }

        let player = &self.player;
        positive("player.width", player.width)?;
        positive("player.height", player.height)?;
        positive("player.move_speed", player.move_speed)?;
        positive("player.jump_impulse", player.jump_impulse)?;
        bounce("player.bounce", player.bounce)?;
        finite("player.spawn_x", player.spawn_x)?;
        finite("player.spawn_y", player.spawn_y)?;
        if !(0.0..=self.width).contains(&player.spawn_x)
            || !(0.0..=self.height).contains(&player.spawn_y)
        {
            return Err(ConfigError::SpawnOutsideWorld {
                x: player.spawn_x,
                y: player.spawn_y,
                width: self.width,
                height: self.height,
            });
        }

        let pickups = &self.pickups;
        if pickups.count == 0 {
            return Err(ConfigError::NoPickups);
        }
        finite("pickups.start_x", pickups.start_x)?;
        finite("pickups.step_x", pickups.step_x)?;
        positive("pickups.width", pickups.width)?;
        positive("pickups.height", pickups.height)?;
        bounce("pickups.bounce_min", pickups.bounce_min)?;
        bounce("pickups.bounce_max", pickups.bounce_max)?;
        if pickups.bounce_min > pickups.bounce_max {
            return Err(ConfigError::EmptyBounceRange {
                min: pickups.bounce_min,
                max: pickups.bounce_max,
            });
        }
        for index in 0..pickups.count {
            let x = pickups.base_x(index);
            if !(0.0..=self.width).contains(&x) {
                return Err(ConfigError::PickupOutsideWorld {
                    index,
                    x,
                    width: self.width,
                });
            }
        }

        let hazard = &self.hazard;
        positive("hazard.size", hazard.size)?;
        finite("hazard.spawn_y", hazard.spawn_y)?;
        finite("hazard.fall_speed", hazard.fall_speed)?;
        finite("hazard.max_speed_x", hazard.max_speed_x)?;
        if hazard.max_speed_x < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "hazard.max_speed_x",
                value: hazard.max_speed_x,
            });
        }
        bounce("hazard.bounce", hazard.bounce)?;
        if hazard.size >= self.width / 2.0 {
            return Err(ConfigError::HazardTooLarge {
                size: hazard.size,
                width: self.width,
            });
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn bounce(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::BounceOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.platforms.len(), 6);
        assert_eq!(config.pickups.count, 12);
        // Last pickup column stays inside the world
        assert!((config.pickups.base_x(11) - 782.0).abs() < 0.001);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "gravity": 500.0 }"#).unwrap();
        assert_eq!(config.gravity, 500.0);
        assert_eq!(config.width, WORLD_WIDTH);
        assert_eq!(config.restart, RestartPolicy::default());
    }

    #[test]
    fn test_restart_policy_json() {
        let config =
            WorldConfig::from_json_str(r#"{ "restart": { "mode": "manual" } }"#).unwrap();
        assert_eq!(config.restart, RestartPolicy::Manual);

        let config = WorldConfig::from_json_str(
            r#"{ "restart": { "mode": "delayed", "delay_ms": 500 } }"#,
        )
        .unwrap();
        assert_eq!(config.restart, RestartPolicy::Delayed { delay_ms: 500 });
    }

    #[test]
    fn test_zero_pickups_rejected() {
        let mut config = WorldConfig::default();
        config.pickups.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoPickups)));
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let mut config = WorldConfig::default();
        config.width = -800.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "width", .. })
        ));

        let mut config = WorldConfig::default();
        config.platforms[2].scale = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "platform.scale",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = WorldConfig::default();
        config.gravity = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "gravity" })
        ));
    }

    #[test]
    fn test_bounce_range_checked() {
        let mut config = WorldConfig::default();
        config.hazard.bounce = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BounceOutOfRange { .. })
        ));

        let mut config = WorldConfig::default();
        config.pickups.bounce_min = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBounceRange { .. })
        ));
    }

    #[test]
    fn test_spawn_and_pickups_must_fit() {
        let mut config = WorldConfig::default();
        config.player.spawn_x = 900.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutsideWorld { .. })
        ));

        let mut config = WorldConfig::default();
        config.pickups.count = 13;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PickupOutsideWorld { index: 12, .. })
        ));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            WorldConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = WorldConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = WorldConfig::load_or_default(None).unwrap();
        assert_eq!(config, WorldConfig::default());
    }
}
