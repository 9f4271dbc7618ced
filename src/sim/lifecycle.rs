//! Game lifecycle: Playing -> GameOver -> Playing
//!
//! The machine owns phase and score. Restarts come either from the UI
//! (`request_restart`) or from the one-shot timer armed on defeat; whichever
//! happens first consumes the timer, so a reset is never applied twice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameSession, PlayerTint};
use crate::config::RestartPolicy;
use crate::consts::DEFEAT_BANNER_OFFSET_Y;

/// Text shown above a defeated player
pub const DEFEAT_MESSAGE: &str = "OH NO!";

/// The "OH NO!" banner left where the player was hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefeatBanner {
    pub pos: Vec2,
    /// Seconds until it disappears
    pub remaining: f32,
}

/// Phase, score and pending restart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateMachine {
    phase: GamePhase,
    score: u64,
    policy: RestartPolicy,
    banner_secs: f32,
    /// Seconds until the automatic restart fires
    pending_restart: Option<f32>,
    banner: Option<DefeatBanner>,
}

impl GameStateMachine {
    pub fn new(policy: RestartPolicy, banner_ms: u32) -> Self {
        Self {
            phase: GamePhase::Playing,
            score: 0,
            policy,
            banner_secs: banner_ms as f32 / 1000.0,
            pending_restart: None,
            banner: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn policy(&self) -> RestartPolicy {
        self.policy
    }

    /// An automatic restart is scheduled
    pub fn restart_pending(&self) -> bool {
        self.pending_restart.is_some()
    }

    pub fn defeat_banner(&self) -> Option<&DefeatBanner> {
        self.banner.as_ref()
    }

    /// Add points; returns the new total
    pub fn add_score(&mut self, points: u64) -> u64 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Switch to GameOver and arm the restart timer per policy.
    /// Returns false if the game was already over.
    pub fn enter_game_over(&mut self, player_pos: Vec2) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.pending_restart = match self.policy {
            RestartPolicy::Immediate => Some(0.0),
            RestartPolicy::Delayed { delay_ms } => Some(delay_ms as f32 / 1000.0),
            RestartPolicy::Manual => None,
        };
        self.banner = Some(DefeatBanner {
            pos: player_pos - Vec2::new(0.0, DEFEAT_BANNER_OFFSET_Y),
            remaining: self.banner_secs,
        });
        true
    }

    /// Count down timers; returns true exactly once when the restart timer fires
    pub fn advance(&mut self, dt: f32) -> bool {
        if let Some(banner) = &mut self.banner {
            banner.remaining -= dt;
            if banner.remaining <= 0.0 {
                self.banner = None;
            }
        }

        match self.pending_restart {
            Some(remaining) if remaining - dt <= 0.0 => {
                self.pending_restart = None;
                true
            }
            Some(remaining) => {
                self.pending_restart = Some(remaining - dt);
                false
            }
            None => false,
        }
    }

    /// Back to a fresh Playing state; cancels any pending restart
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.pending_restart = None;
        self.banner = None;
    }
}

/// Player touched a hazard: freeze the world and enter GameOver.
/// Repeated calls while already over do nothing.
pub fn defeat_player(session: &mut GameSession) -> bool {
    let pos = session.entities.player.body.pos;
    if !session.machine.enter_game_over(pos) {
        return false;
    }

    session.physics.pause();
    let player = &mut session.entities.player;
    player.alive = false;
    player.tint = PlayerTint::Hit;

    log::info!(
        "Player defeated at ({:.1}, {:.1}) with score {}",
        pos.x,
        pos.y,
        session.machine.score()
    );
    session.emit(GameEvent::PlayerDefeated { x: pos.x, y: pos.y });
    true
}

/// Explicit restart from the UI; valid in any phase
pub fn request_restart(session: &mut GameSession) {
    restart(session, true);
}

/// End-of-tick timers; fires the automatic restart when due
pub fn housekeeping(session: &mut GameSession, dt: f32) {
    if session.machine.advance(dt) {
        restart(session, false);
    }
}

fn restart(session: &mut GameSession, manual: bool) {
    session.machine.reset();
    session.physics.resume();
    session.entities.player.respawn();
    session.entities.reset_pickups();
    session.entities.clear_hazards();

    let trigger = if manual { "manual" } else { "auto" };
    log::info!("Game restarted ({})", trigger);
    session.emit(GameEvent::Restarted { manual });
}
