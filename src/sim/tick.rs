//! Per-frame simulation tick
//!
//! Strict order: input -> controller -> integrate -> contacts -> lifecycle
//! housekeeping. While the game is over only housekeeping runs.

use super::collision::{find_contacts, on_contact};
use super::input::InputState;
use super::lifecycle;
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::MAX_FRAME_DT;

/// Advance the session by one frame and return the notifications it raised
pub fn tick(session: &mut GameSession, input: &InputState, dt: f32) -> Vec<GameEvent> {
    if !dt.is_finite() || dt <= 0.0 {
        log::warn!("Ignoring tick with invalid dt {}", dt);
        return session.drain_events();
    }
    let dt = dt.min(MAX_FRAME_DT);

    session.time_ticks += 1;
    log::trace!("tick {} dt={:.4}", session.time_ticks, dt);

    if session.machine.phase() == GamePhase::Playing {
        session.controller.apply(input, &mut session.entities.player);
        session.physics.integrate(&mut session.entities, dt);

        for contact in find_contacts(session) {
            on_contact(session, contact.a, contact.b);
        }

        session.physics.update_ground_contacts(&mut session.entities);
    }

    lifecycle::housekeeping(session, dt);

    session.drain_events()
}
