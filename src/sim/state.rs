//! Game state and core simulation types
//!
//! Everything a running game owns lives in one [`GameSession`]: the world
//! config, the physics world, every entity, the lifecycle state machine and
//! the seeded RNG. Components receive the session (or the part they need) by
//! reference; there are no globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::input::{InputState, PlayerController};
use super::lifecycle::{self, GameStateMachine};
use super::physics::PhysicsWorld;
use super::snapshot::Snapshot;
use super::spawner::HazardSpawner;
use super::tick::tick;
use crate::config::WorldConfig;
use crate::consts::HIT_TINT;
use crate::error::ConfigError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player was hit; simulation frozen until restart
    GameOver,
}

/// Which way the player sprite should animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationIntent {
    MovingLeft,
    MovingRight,
    #[default]
    Idle,
}

impl AnimationIntent {
    /// Derived purely from the sign of horizontal velocity
    pub fn from_velocity(vx: f32) -> Self {
        if vx < 0.0 {
            AnimationIntent::MovingLeft
        } else if vx > 0.0 {
            AnimationIntent::MovingRight
        } else {
            AnimationIntent::Idle
        }
    }
}

/// Player visual state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerTint {
    #[default]
    Normal,
    /// Red flash after touching a hazard
    Hit,
}

impl PlayerTint {
    /// RGB tint to apply, if any
    pub fn rgb(self) -> Option<u32> {
        match self {
            PlayerTint::Normal => None,
            PlayerTint::Hit => Some(HIT_TINT),
        }
    }
}

/// The single player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Where restarts put the player back
    pub spawn: Vec2,
    pub tint: PlayerTint,
    pub alive: bool,
    pub intent: AnimationIntent,
}

impl Player {
    /// Put the player back at spawn, alive and untinted
    pub fn respawn(&mut self) {
        self.body.reset_to(self.spawn);
        self.tint = PlayerTint::Normal;
        self.alive = true;
        self.intent = AnimationIntent::Idle;
    }
}

/// A static, immovable platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub body: Body,
}

/// A collectible from the fixed pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub body: Body,
    /// Inactive pickups are hidden and skip physics
    pub active: bool,
    /// Home column; never changes across resets
    pub base_x: f32,
}

impl Pickup {
    /// Re-enable at the top of its column
    pub fn reset(&mut self) {
        self.body.reset_to(Vec2::new(self.base_x, 0.0));
        self.active = true;
    }
}

/// A bouncing hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub body: Body,
    pub active: bool,
}

/// Entity kind, used to dispatch collision handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    Platform,
    Pickup,
    Hazard,
}

/// Index of an entity within its registry list (the player has index 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub tag: EntityTag,
    pub index: usize,
}

impl EntityRef {
    pub const PLAYER: EntityRef = EntityRef {
        tag: EntityTag::Player,
        index: 0,
    };

    pub fn platform(index: usize) -> Self {
        Self {
            tag: EntityTag::Platform,
            index,
        }
    }

    pub fn pickup(index: usize) -> Self {
        Self {
            tag: EntityTag::Pickup,
            index,
        }
    }

    pub fn hazard(index: usize) -> Self {
        Self {
            tag: EntityTag::Hazard,
            index,
        }
    }
}

/// Notifications for the audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Emitted once when the session is created
    BackgroundLoopStarted,
    PickupCollected { pickup_id: u32, score: u64 },
    HazardSpawned { hazard_id: u32, x: f32 },
    PlayerDefeated { x: f32, y: f32 },
    Restarted { manual: bool },
}

/// Owner of every body-bearing entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub player: Player,
    pub platforms: Vec<Platform>,
    /// Fixed-size pool, created once
    pub pickups: Vec<Pickup>,
    pub hazards: Vec<Hazard>,
    next_id: u32,
}

impl EntityRegistry {
    /// Build the static layout and pickup pool described by `config`
    pub fn from_config(config: &WorldConfig, rng: &mut Pcg32) -> Self {
        let tuning = &config.player;
        let player = Player {
            body: Body::new(tuning.spawn(), Vec2::new(tuning.width, tuning.height))
                .with_bounce(tuning.bounce)
                .with_world_bounds(),
            spawn: tuning.spawn(),
            tint: PlayerTint::Normal,
            alive: true,
            intent: AnimationIntent::Idle,
        };

        let mut registry = Self {
            player,
            platforms: Vec::with_capacity(config.platforms.len()),
            pickups: Vec::with_capacity(config.pickups.count as usize),
            hazards: Vec::new(),
            next_id: 1,
        };

        for spec in &config.platforms {
            let id = registry.next_entity_id();
            registry.platforms.push(Platform {
                id,
                body: Body::new(Vec2::new(spec.x, spec.y), spec.size()),
            });
        }

        let layout = &config.pickups;
        let size = Vec2::new(layout.width, layout.height);
        for index in 0..layout.count {
            let id = registry.next_entity_id();
            let base_x = layout.base_x(index);
            let bounce = rng.random_range(layout.bounce_min..=layout.bounce_max);
            registry.pickups.push(Pickup {
                id,
                body: Body::new(Vec2::new(base_x, 0.0), size).with_bounce(bounce),
                active: true,
                base_x,
            });
        }

        registry
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn active_pickup_count(&self) -> usize {
        self.pickups.iter().filter(|p| p.active).count()
    }

    pub fn active_hazard_count(&self) -> usize {
        self.hazards.iter().filter(|h| h.active).count()
    }

    /// Re-activate the whole pickup pool at the top of each column
    pub fn reset_pickups(&mut self) {
        for pickup in &mut self.pickups {
            pickup.reset();
        }
    }

    /// Destroy every hazard
    pub fn clear_hazards(&mut self) {
        self.hazards.clear();
    }

    /// Everything the integrator moves: the player plus active pickups/hazards
    pub fn dynamic_bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.split_static_dynamic().1
    }

    /// Platforms alongside the moving bodies, for passes that need both
    pub fn split_static_dynamic(&mut self) -> (&[Platform], impl Iterator<Item = &mut Body>) {
        let bodies = std::iter::once(&mut self.player.body)
            .chain(
                self.pickups
                    .iter_mut()
                    .filter(|p| p.active)
                    .map(|p| &mut p.body),
            )
            .chain(
                self.hazards
                    .iter_mut()
                    .filter(|h| h.active)
                    .map(|h| &mut h.body),
            );
        (&self.platforms, bodies)
    }

    /// Mutable body for a collision participant, if it still exists
    pub fn body_mut(&mut self, entity: EntityRef) -> Option<&mut Body> {
        match entity.tag {
            EntityTag::Player => Some(&mut self.player.body),
            EntityTag::Platform => None,
            EntityTag::Pickup => self.pickups.get_mut(entity.index).map(|p| &mut p.body),
            EntityTag::Hazard => self.hazards.get_mut(entity.index).map(|h| &mut h.body),
        }
    }
}

/// One running game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: WorldConfig,
    pub physics: PhysicsWorld,
    pub entities: EntityRegistry,
    pub machine: GameStateMachine,
    pub controller: PlayerController,
    pub spawner: HazardSpawner,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Notifications not yet handed to collaborators
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Validate `config` and build a fresh session in the Playing phase
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let entities = EntityRegistry::from_config(&config, &mut rng);
        log::info!(
            "Session started: seed={}, {} platforms, {} pickups",
            seed,
            entities.platforms.len(),
            entities.pickups.len()
        );

        Ok(Self {
            physics: PhysicsWorld::new(config.size(), config.gravity),
            machine: GameStateMachine::new(config.restart, config.defeat_banner_ms),
            controller: PlayerController::new(&config.player),
            spawner: HazardSpawner::new(config.hazard, config.width),
            entities,
            config,
            seed,
            rng,
            time_ticks: 0,
            events: vec![GameEvent::BackgroundLoopStarted],
        })
    }

    /// Advance one frame; returns the notifications raised since the last call
    pub fn tick(&mut self, input: &InputState, dt: f32) -> Vec<GameEvent> {
        tick(self, input, dt)
    }

    /// UI restart button; valid in any phase
    pub fn request_restart(&mut self) {
        lifecycle::request_restart(self);
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn score(&self) -> u64 {
        self.machine.score()
    }

    pub fn player(&self) -> &Player {
        &self.entities.player
    }

    /// Read-only view for the renderer/UI
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Take the pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
