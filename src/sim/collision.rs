//! Contact detection and collision rules
//!
//! `find_contacts` is the narrow phase: it reports every candidate pair for the
//! step, solid pairs first. `on_contact` then dispatches each pair on its
//! entity tags. Handlers re-check their preconditions, because an earlier
//! contact in the same step may already have separated the bodies or disabled
//! one of them.

use glam::Vec2;

use super::body::{Aabb, Body};
use super::lifecycle;
use super::state::{EntityRef, EntityTag, GameEvent, GamePhase, GameSession};

/// Edge tolerance when deciding which face a body came through
const FACE_TOLERANCE: f32 = 1.0;

/// Bounces slower than this settle instead of jittering on a platform
pub const RESTING_SPEED: f32 = 30.0;

/// A candidate pair reported by the narrow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityRef,
    pub b: EntityRef,
}

/// Which face of the platform a body was pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

/// Overlapping, or fell through the top face during this step
pub fn touches_platform(body: &Body, platform: &Aabb) -> bool {
    let aabb = body.aabb();
    if aabb.intersects(platform) {
        return true;
    }
    // Swept check so fast falls can't tunnel through thin platforms
    let prev_bottom = body.prev_aabb().max.y;
    body.vel.y >= 0.0
        && prev_bottom <= platform.min.y
        && aabb.max.y >= platform.min.y
        && aabb.overlaps_x(platform)
}

/// Push `body` out of `platform`, returning the face it was resolved against.
///
/// Velocity is left alone; the caller decides how the body reacts.
pub fn separate(body: &mut Body, platform: &Aabb) -> Option<Face> {
    if !touches_platform(body, platform) {
        return None;
    }

    let half = body.half_size();
    let prev = body.prev_aabb();

    let face = if prev.max.y <= platform.min.y + FACE_TOLERANCE && body.vel.y >= 0.0 {
        body.pos.y = platform.min.y - half.y;
        Face::Top
    } else if prev.min.y >= platform.max.y - FACE_TOLERANCE && body.vel.y <= 0.0 {
        body.pos.y = platform.max.y + half.y;
        Face::Bottom
    } else {
        let platform_center = (platform.min.x + platform.max.x) * 0.5;
        if body.pos.x < platform_center {
            body.pos.x = platform.min.x - half.x;
            Face::Left
        } else {
            body.pos.x = platform.max.x + half.x;
            Face::Right
        }
    };

    Some(face)
}

/// Narrow phase over the registry, in handler order:
/// player/platform, pickup/platform, player/pickup, hazard/platform, player/hazard
pub fn find_contacts(session: &GameSession) -> Vec<Contact> {
    let entities = &session.entities;
    let player = &entities.player.body;
    let player_box = player.aabb();
    let mut contacts = Vec::new();

    for (i, platform) in entities.platforms.iter().enumerate() {
        if touches_platform(player, &platform.body.aabb()) {
            contacts.push(Contact {
                a: EntityRef::PLAYER,
                b: EntityRef::platform(i),
            });
        }
    }

    for (i, pickup) in entities.pickups.iter().enumerate() {
        if !pickup.active {
            continue;
        }
        for (j, platform) in entities.platforms.iter().enumerate() {
            if touches_platform(&pickup.body, &platform.body.aabb()) {
                contacts.push(Contact {
                    a: EntityRef::pickup(i),
                    b: EntityRef::platform(j),
                });
            }
        }
    }

    for (i, pickup) in entities.pickups.iter().enumerate() {
        if pickup.active && player_box.intersects(&pickup.body.aabb()) {
            contacts.push(Contact {
                a: EntityRef::PLAYER,
                b: EntityRef::pickup(i),
            });
        }
    }

    for (i, hazard) in entities.hazards.iter().enumerate() {
        if !hazard.active {
            continue;
        }
        for (j, platform) in entities.platforms.iter().enumerate() {
            if touches_platform(&hazard.body, &platform.body.aabb()) {
                contacts.push(Contact {
                    a: EntityRef::hazard(i),
                    b: EntityRef::platform(j),
                });
            }
        }
    }

    for (i, hazard) in entities.hazards.iter().enumerate() {
        if hazard.active && player_box.intersects(&hazard.body.aabb()) {
            contacts.push(Contact {
                a: EntityRef::PLAYER,
                b: EntityRef::hazard(i),
            });
        }
    }

    contacts
}

/// Dispatch a contact to its handler. Pair order does not matter.
pub fn on_contact(session: &mut GameSession, a: EntityRef, b: EntityRef) {
    let (a, b) = if a.tag <= b.tag { (a, b) } else { (b, a) };

    match (a.tag, b.tag) {
        (EntityTag::Player, EntityTag::Platform) => player_platform(session, b.index),
        (EntityTag::Platform, EntityTag::Pickup) | (EntityTag::Platform, EntityTag::Hazard) => {
            bounce_off_platform(session, b, a.index)
        }
        (EntityTag::Player, EntityTag::Pickup) => {
            collect_pickup(session, b.index);
        }
        (EntityTag::Player, EntityTag::Hazard) => {
            on_player_hit(session, b.index);
        }
        // Pickups and hazards pass through each other
        _ => log::trace!("Ignoring contact {:?} / {:?}", a.tag, b.tag),
    }
}

/// Solid landing, head bump, or side push for the player
fn player_platform(session: &mut GameSession, platform_index: usize) {
    let Some(platform) = session.entities.platforms.get(platform_index) else {
        return;
    };
    let platform = platform.body.aabb();
    let body = &mut session.entities.player.body;

    match separate(body, &platform) {
        Some(Face::Top) => {
            if body.vel.y > 0.0 {
                body.vel.y = 0.0;
            }
        }
        // Jumping into the underside: kill upward velocity so we don't stick
        Some(Face::Bottom) => body.vel.y = 0.0,
        Some(Face::Left) | Some(Face::Right) => body.vel.x = 0.0,
        None => {}
    }
}

/// Plain restitution against a platform, no gameplay effect.
/// Perfectly elastic bodies keep their bounce height indefinitely.
fn bounce_off_platform(session: &mut GameSession, entity: EntityRef, platform_index: usize) {
    let Some(platform) = session.entities.platforms.get(platform_index) else {
        return;
    };
    let platform = platform.body.aabb();
    let active = match entity.tag {
        EntityTag::Pickup => session.entities.pickups.get(entity.index).map(|p| p.active),
        EntityTag::Hazard => session.entities.hazards.get(entity.index).map(|h| h.active),
        _ => None,
    };
    if active != Some(true) {
        return;
    }
    let physics = &session.physics;
    let Some(body) = session.entities.body_mut(entity) else {
        return;
    };

    let y_before = body.pos.y;
    match separate(body, &platform) {
        Some(face @ (Face::Top | Face::Bottom)) => {
            body.vel.y = if body.bounce >= 1.0 {
                let moved = body.pos.y - y_before;
                physics.elastic_rebound(body.vel.y, moved, face == Face::Top)
            } else {
                reflect(body.vel.y, body.bounce)
            };
        }
        Some(Face::Left) | Some(Face::Right) => {
            body.vel.x = reflect(body.vel.x, body.bounce);
        }
        None => {}
    }
}

/// Reflect one velocity component; inelastic bounces settle below `RESTING_SPEED`
fn reflect(v: f32, bounce: f32) -> f32 {
    let reflected = -v * bounce;
    if bounce < 1.0 && reflected.abs() < RESTING_SPEED {
        0.0
    } else {
        reflected
    }
}

/// Player overlaps a pickup. Returns false (and changes nothing) when the
/// pickup is missing, already collected, or the game is over.
pub fn collect_pickup(session: &mut GameSession, pickup_index: usize) -> bool {
    if session.machine.phase() != GamePhase::Playing {
        return false;
    }
    let Some(pickup) = session.entities.pickups.get_mut(pickup_index) else {
        log::warn!("collect_pickup: no pickup at index {}", pickup_index);
        return false;
    };
    if !pickup.active {
        return false;
    }

    pickup.active = false;
    pickup.body.vel = Vec2::ZERO;
    let pickup_id = pickup.id;

    let score = session.machine.add_score(session.config.pickups.score);
    log::debug!("Collected pickup {} (score {})", pickup_id, score);
    session.emit(GameEvent::PickupCollected { pickup_id, score });

    if session.entities.active_pickup_count() == 0 {
        let player_x = session.entities.player.body.pos.x;
        let hazard_id = session.spawner.on_pickup_pool_exhausted(
            &mut session.entities,
            &mut session.rng,
            player_x,
        );
        let spawned_x = session
            .entities
            .hazards
            .iter()
            .find(|h| h.id == hazard_id)
            .map(|h| h.body.pos.x);
        if let Some(x) = spawned_x {
            session.emit(GameEvent::HazardSpawned { hazard_id, x });
        }
    }

    true
}

/// Player overlaps a hazard. Returns true only on the transition into GameOver.
pub fn on_player_hit(session: &mut GameSession, hazard_index: usize) -> bool {
    match session.entities.hazards.get(hazard_index) {
        Some(hazard) if hazard.active => lifecycle::defeat_player(session),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::sim::state::Hazard;

    fn session() -> GameSession {
        let mut session = GameSession::new(WorldConfig::default(), 42).unwrap();
        session.drain_events();
        session
    }

    fn platform_box() -> Aabb {
        // 160 x 12.8 ledge, top at 213.6
        Aabb::from_center(Vec2::new(250.0, 220.0), Vec2::new(160.0, 12.8))
    }

    fn add_hazard(session: &mut GameSession, pos: Vec2) -> usize {
        let id = session.entities.next_entity_id();
        session.entities.hazards.push(Hazard {
            id,
            body: Body::new(pos, Vec2::splat(14.0)).with_bounce(1.0),
            active: true,
        });
        session.entities.hazards.len() - 1
    }

    #[test]
    fn test_separate_landing_from_above() {
        let mut body = Body::new(Vec2::new(250.0, 192.0), Vec2::new(32.0, 48.0));
        body.prev_pos = Vec2::new(250.0, 188.0);
        body.vel.y = 120.0;

        assert_eq!(separate(&mut body, &platform_box()), Some(Face::Top));
        assert!((body.bottom() - 213.6).abs() < 0.001);
    }

    #[test]
    fn test_separate_from_below() {
        let mut body = Body::new(Vec2::new(250.0, 248.0), Vec2::new(32.0, 48.0));
        body.prev_pos = Vec2::new(250.0, 252.0);
        body.vel.y = -400.0;

        assert_eq!(separate(&mut body, &platform_box()), Some(Face::Bottom));
        assert!((body.top() - 226.4).abs() < 0.001);
    }

    #[test]
    fn test_separate_from_side() {
        let mut body = Body::new(Vec2::new(160.0, 215.0), Vec2::new(32.0, 48.0));
        body.prev_pos = Vec2::new(150.0, 215.0);
        body.vel = Vec2::new(350.0, 0.0);

        assert_eq!(separate(&mut body, &platform_box()), Some(Face::Left));
        assert!((body.pos.x - 154.0).abs() < 0.001);
    }

    #[test]
    fn test_swept_landing_catches_tunneling() {
        // Started above the ledge, ended fully below it in one step
        let mut body = Body::new(Vec2::new(250.0, 240.0), Vec2::new(24.0, 8.0));
        body.prev_pos = Vec2::new(250.0, 200.0);
        body.vel.y = 1800.0;
        assert!(!body.aabb().intersects(&platform_box()));
        assert!(touches_platform(&body, &platform_box()));
        assert_eq!(separate(&mut body, &platform_box()), Some(Face::Top));
    }

    #[test]
    fn test_player_jump_into_underside_zeroes_velocity() {
        let mut session = session();
        // Ledge at index 5: (250, 220), bottom at 226.4
        let body = &mut session.entities.player.body;
        body.pos = Vec2::new(250.0, 248.0);
        body.prev_pos = Vec2::new(250.0, 252.0);
        body.vel = Vec2::new(0.0, -500.0);

        on_contact(&mut session, EntityRef::PLAYER, EntityRef::platform(5));
        assert_eq!(session.entities.player.body.vel.y, 0.0);
        assert!(session.entities.player.body.top() >= 226.4 - 0.001);
    }

    #[test]
    fn test_player_landing_stops_fall() {
        let mut session = session();
        let body = &mut session.entities.player.body;
        body.pos = Vec2::new(250.0, 190.0);
        body.prev_pos = Vec2::new(250.0, 187.0);
        body.vel = Vec2::new(0.0, 300.0);

        // Argument order must not matter
        on_contact(&mut session, EntityRef::platform(5), EntityRef::PLAYER);
        let body = &session.entities.player.body;
        assert_eq!(body.vel.y, 0.0);
        assert!((body.bottom() - 213.6).abs() < 0.001);
    }

    #[test]
    fn test_pickup_bounces_by_coefficient() {
        let mut session = session();
        let pickup = &mut session.entities.pickups[3];
        pickup.body.bounce = 0.5;
        pickup.body.pos = Vec2::new(250.0, 205.0);
        pickup.body.prev_pos = Vec2::new(250.0, 200.0);
        pickup.body.vel = Vec2::new(0.0, 300.0);

        on_contact(&mut session, EntityRef::pickup(3), EntityRef::platform(5));
        let body = &session.entities.pickups[3].body;
        assert_eq!(body.vel.y, -150.0);
        assert!((body.bottom() - 213.6).abs() < 0.001);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_slow_pickup_settles() {
        let mut session = session();
        let pickup = &mut session.entities.pickups[3];
        pickup.body.bounce = 0.6;
        pickup.body.pos = Vec2::new(250.0, 203.0);
        pickup.body.prev_pos = Vec2::new(250.0, 202.7);
        pickup.body.vel = Vec2::new(0.0, 13.0);

        on_contact(&mut session, EntityRef::pickup(3), EntityRef::platform(5));
        assert_eq!(session.entities.pickups[3].body.vel.y, 0.0);
    }

    #[test]
    fn test_hazard_bounce_is_elastic() {
        let mut session = session();
        // Sunk 0.4px into the ledge top at 213.6
        let index = add_hazard(&mut session, Vec2::new(250.0, 207.0));
        session.entities.hazards[index].body.prev_pos = Vec2::new(250.0, 204.0);
        session.entities.hazards[index].body.vel = Vec2::new(100.0, 180.0);
        let g = session.physics.gravity;
        let energy_before = 180.0f32.powi(2) - 2.0 * g * 207.0;

        on_contact(
            &mut session,
            EntityRef::hazard(index),
            EntityRef::platform(5),
        );

        let body = &session.entities.hazards[index].body;
        assert_eq!(body.vel.x, 100.0);
        assert!(body.vel.y < 0.0);
        assert!((body.bottom() - 213.6).abs() < 0.001);
        // Lifted out of the ledge without gaining or losing height
        let energy_after = body.vel.y.powi(2) - 2.0 * g * body.pos.y;
        assert!((energy_after - energy_before).abs() < 1.0);
    }

    #[test]
    fn test_collect_pickup_scores_once() {
        let mut session = session();

        assert!(collect_pickup(&mut session, 0));
        assert_eq!(session.score(), 10);
        assert!(!session.entities.pickups[0].active);

        // Stale second delivery is a no-op
        assert!(!collect_pickup(&mut session, 0));
        assert_eq!(session.score(), 10);

        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            GameEvent::PickupCollected { score: 10, .. }
        ));
    }

    #[test]
    fn test_collect_out_of_range_is_noop() {
        let mut session = session();
        assert!(!collect_pickup(&mut session, 99));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_last_pickup_spawns_hazard_and_resets_pool() {
        let mut session = session();
        for i in 0..12 {
            collect_pickup(&mut session, i);
        }

        assert_eq!(session.score(), 120);
        assert_eq!(session.entities.hazards.len(), 1);
        assert_eq!(session.entities.active_pickup_count(), 12);
        for pickup in &session.entities.pickups {
            assert_eq!(pickup.body.pos, Vec2::new(pickup.base_x, 0.0));
        }

        let events = session.drain_events();
        assert_eq!(events.len(), 13);
        assert!(matches!(events[12], GameEvent::HazardSpawned { .. }));
    }

    #[test]
    fn test_hazard_hit_is_idempotent() {
        let mut session = session();
        let index = add_hazard(&mut session, Vec2::new(100.0, 250.0));

        assert!(on_player_hit(&mut session, index));
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(!on_player_hit(&mut session, index));

        let defeated = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PlayerDefeated { .. }))
            .count();
        assert_eq!(defeated, 1);
    }

    #[test]
    fn test_no_collect_after_game_over() {
        let mut session = session();
        let index = add_hazard(&mut session, Vec2::new(100.0, 250.0));
        on_player_hit(&mut session, index);

        assert!(!collect_pickup(&mut session, 0));
        assert_eq!(session.score(), 0);
        assert!(session.entities.pickups[0].active);
    }

    #[test]
    fn test_find_contacts_order() {
        let mut session = session();
        let player_pos = Vec2::new(250.0, 190.0);
        let body = &mut session.entities.player.body;
        body.pos = player_pos;
        body.prev_pos = Vec2::new(250.0, 188.0);
        body.vel.y = 100.0;
        session.entities.pickups[0].body.pos = player_pos;
        add_hazard(&mut session, player_pos);

        let contacts = find_contacts(&session);
        let tags: Vec<(EntityTag, EntityTag)> =
            contacts.iter().map(|c| (c.a.tag, c.b.tag)).collect();
        assert_eq!(
            tags,
            vec![
                (EntityTag::Player, EntityTag::Platform),
                (EntityTag::Player, EntityTag::Pickup),
                (EntityTag::Player, EntityTag::Hazard),
            ]
        );
    }

    #[test]
    fn test_inactive_pickups_report_no_contacts() {
        let mut session = session();
        let player_pos = session.entities.player.body.pos;
        session.entities.pickups[0].body.pos = player_pos;
        session.entities.pickups[0].active = false;

        assert!(
            find_contacts(&session)
                .iter()
                .all(|c| c.b.tag != EntityTag::Pickup)
        );
    }
}
