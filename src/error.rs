//! Startup errors
//!
//! The simulation itself has no runtime failure modes; everything that can go
//! wrong is caught while loading and validating the world configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised before any simulation begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the expected layout
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric field is NaN or infinite
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// A size, speed or duration that must be strictly positive is not
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    /// A bounce coefficient outside [0, 1]
    #[error("{field} must be within [0, 1] (got {value})")]
    BounceOutOfRange { field: &'static str, value: f32 },

    /// Pickup bounce range is inverted
    #[error("pickup bounce range is empty ({min} > {max})")]
    EmptyBounceRange { min: f32, max: f32 },

    /// The level has no pickups to collect
    #[error("pickup count must be at least 1")]
    NoPickups,

    /// The level has no platforms to stand on
    #[error("platform layout is empty")]
    NoPlatforms,

    /// The player spawn point lies outside the world
    #[error("player spawn ({x}, {y}) is outside the {width}x{height} world")]
    SpawnOutsideWorld {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    /// A pickup column lies outside the world
    #[error("pickup {index} at x={x} is outside the world (width {width})")]
    PickupOutsideWorld { index: u32, x: f32, width: f32 },

    /// A hazard would not fit in either half of the world
    #[error("hazard size {size} does not fit in half of the world width {width}")]
    HazardTooLarge { size: f32, width: f32 },
}
