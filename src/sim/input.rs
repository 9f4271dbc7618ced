//! Device-agnostic input and the player controller
//!
//! Every input source (keyboard, touch buttons, pointer) writes the same
//! held-state snapshot. The controller recomputes player velocity from it on
//! every Playing tick; nothing is queued or edge-triggered.

use serde::{Deserialize, Serialize};

use super::state::{AnimationIntent, Player};
use crate::config::PlayerTuning;

/// What the player is holding this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_requested: bool,
}

impl InputState {
    pub fn set_direction(&mut self, left: bool, right: bool) {
        self.move_left = left;
        self.move_right = right;
    }

    pub fn set_jump_requested(&mut self, jump: bool) {
        self.jump_requested = jump;
    }

    /// -1 for left, 1 for right, 0 for neither or both
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Combine two sources; a control is held if either source holds it
    pub fn merged(&self, other: &InputState) -> InputState {
        InputState {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            jump_requested: self.jump_requested || other.jump_requested,
        }
    }
}

/// Maps held input to player velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    pub move_speed: f32,
    pub jump_impulse: f32,
}

impl PlayerController {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            move_speed: tuning.move_speed,
            jump_impulse: tuning.jump_impulse,
        }
    }

    /// Set the player's velocity for this tick and return the animation intent.
    ///
    /// Jumping needs ground contact from the previous step, so holding jump in
    /// the air does nothing and each landing allows one impulse.
    pub fn apply(&self, input: &InputState, player: &mut Player) -> AnimationIntent {
        let body = &mut player.body;
        body.vel.x = input.direction() * self.move_speed;

        if input.jump_requested && body.touching_ground {
            body.vel.y = -self.jump_impulse;
        }

        player.intent = AnimationIntent::from_velocity(body.vel.x);
        player.intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::sim::state::GameSession;

    fn controller() -> PlayerController {
        PlayerController::new(&PlayerTuning::default())
    }

    fn player() -> Player {
        GameSession::new(WorldConfig::default(), 1)
            .unwrap()
            .entities
            .player
    }

    #[test]
    fn test_direction_from_held_state() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), 0.0);

        input.set_direction(true, false);
        assert_eq!(input.direction(), -1.0);

        input.set_direction(false, true);
        assert_eq!(input.direction(), 1.0);

        // Both cancel out
        input.set_direction(true, true);
        assert_eq!(input.direction(), 0.0);
    }

    #[test]
    fn test_horizontal_velocity_and_intent() {
        let controller = controller();
        let mut player = player();

        let mut input = InputState::default();
        input.set_direction(false, true);
        assert_eq!(
            controller.apply(&input, &mut player),
            AnimationIntent::MovingRight
        );
        assert_eq!(player.body.vel.x, 350.0);

        input.set_direction(true, false);
        assert_eq!(
            controller.apply(&input, &mut player),
            AnimationIntent::MovingLeft
        );
        assert_eq!(player.body.vel.x, -350.0);

        input.set_direction(false, false);
        assert_eq!(controller.apply(&input, &mut player), AnimationIntent::Idle);
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.intent, AnimationIntent::Idle);
    }

    #[test]
    fn test_jump_requires_ground() {
        let controller = controller();
        let mut player = player();
        let mut input = InputState::default();
        input.set_jump_requested(true);

        player.body.touching_ground = false;
        player.body.vel.y = 50.0;
        controller.apply(&input, &mut player);
        assert_eq!(player.body.vel.y, 50.0);

        player.body.touching_ground = true;
        controller.apply(&input, &mut player);
        assert_eq!(player.body.vel.y, -600.0);
    }

    #[test]
    fn test_merged_sources() {
        let mut keys = InputState::default();
        keys.set_direction(true, false);
        let mut touch = InputState::default();
        touch.set_jump_requested(true);

        let merged = keys.merged(&touch);
        assert!(merged.move_left);
        assert!(!merged.move_right);
        assert!(merged.jump_requested);
    }
}
