//! Read-only frame snapshot for the render/UI collaborators

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lifecycle::DEFEAT_MESSAGE;
use super::state::{AnimationIntent, GamePhase, GameSession};
use crate::score_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub intent: AnimationIntent,
    /// RGB tint, if the sprite should be tinted
    pub tint: Option<u32>,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerView {
    pub text: String,
    pub pos: Vec2,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Run seed; replaying the same inputs with it reproduces the run
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// HUD line, e.g. "Score: 40"
    pub score_text: String,
    pub player: PlayerView,
    pub platforms: Vec<EntityView>,
    pub pickups: Vec<EntityView>,
    pub hazards: Vec<EntityView>,
    /// Show the restart button (hidden while an automatic restart is counting down)
    pub restart_available: bool,
    pub banner: Option<BannerView>,
}

impl Snapshot {
    pub fn capture(session: &GameSession) -> Self {
        let entities = &session.entities;
        let player = &entities.player;
        let machine = &session.machine;

        Self {
            tick: session.time_ticks,
            seed: session.seed,
            phase: machine.phase(),
            score: machine.score(),
            score_text: score_text(machine.score()),
            player: PlayerView {
                pos: player.body.pos,
                size: player.body.size,
                intent: player.intent,
                tint: player.tint.rgb(),
                alive: player.alive,
            },
            platforms: entities
                .platforms
                .iter()
                .map(|p| EntityView {
                    id: p.id,
                    pos: p.body.pos,
                    size: p.body.size,
                    active: true,
                })
                .collect(),
            pickups: entities
                .pickups
                .iter()
                .map(|p| EntityView {
                    id: p.id,
                    pos: p.body.pos,
                    size: p.body.size,
                    active: p.active,
                })
                .collect(),
            hazards: entities
                .hazards
                .iter()
                .map(|h| EntityView {
                    id: h.id,
                    pos: h.body.pos,
                    size: h.body.size,
                    active: h.active,
                })
                .collect(),
            restart_available: !machine.restart_pending(),
            banner: machine.defeat_banner().map(|b| BannerView {
                text: DEFEAT_MESSAGE.to_string(),
                pos: b.pos,
            }),
        }
    }
}
