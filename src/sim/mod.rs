//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, strictly ordered
//! - Seeded RNG only
//! - Stable iteration order (registry order)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod input;
pub mod lifecycle;
pub mod physics;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use body::{Aabb, Body};
pub use collision::{Contact, Face, collect_pickup, find_contacts, on_contact, on_player_hit};
pub use input::{InputState, PlayerController};
pub use lifecycle::{DEFEAT_MESSAGE, DefeatBanner, GameStateMachine, request_restart};
pub use physics::PhysicsWorld;
pub use snapshot::{BannerView, EntityView, PlayerView, Snapshot};
pub use spawner::HazardSpawner;
pub use state::{
    AnimationIntent, EntityRef, EntityRegistry, EntityTag, GameEvent, GamePhase, GameSession,
    Hazard, Pickup, Platform, Player, PlayerTint,
};
pub use tick::tick;
