//! Hazard spawning
//!
//! Once the pickup pool runs dry it is refilled and a hazard drops in on the
//! far side of the world from the player.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::state::{EntityRegistry, Hazard};
use crate::config::HazardTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardSpawner {
    pub tuning: HazardTuning,
    pub world_width: f32,
}

impl HazardSpawner {
    pub fn new(tuning: HazardTuning, world_width: f32) -> Self {
        Self {
            tuning,
            world_width,
        }
    }

    /// Horizontal span for the next hazard: the half opposite `player_x`,
    /// narrowed so the hazard starts fully inside the world
    pub fn spawn_span(&self, player_x: f32) -> (f32, f32) {
        let mid = self.world_width / 2.0;
        let half_size = self.tuning.size / 2.0;
        if player_x < mid {
            (mid, self.world_width - half_size)
        } else {
            (half_size, mid)
        }
    }

    /// Refill the pickup pool and spawn one hazard; returns the hazard ID
    pub fn on_pickup_pool_exhausted(
        &self,
        entities: &mut EntityRegistry,
        rng: &mut Pcg32,
        player_x: f32,
    ) -> u32 {
        entities.reset_pickups();

        let (lo, hi) = self.spawn_span(player_x);
        let x = rng.random_range(lo..=hi);
        let max_vx = self.tuning.max_speed_x;
        let vx = rng.random_range(-max_vx..=max_vx);

        let mut body = Body::new(
            Vec2::new(x, self.tuning.spawn_y),
            Vec2::splat(self.tuning.size),
        )
        .with_bounce(self.tuning.bounce)
        .with_world_bounds();
        body.vel = Vec2::new(vx, self.tuning.fall_speed);

        let id = entities.next_entity_id();
        entities.hazards.push(Hazard {
            id,
            body,
            active: true,
        });
        log::info!(
            "Pickups refilled; hazard {} spawned at x={:.1} (player at x={:.1})",
            id,
            x,
            player_x
        );
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::sim::state::GameSession;

    fn session() -> GameSession {
        GameSession::new(WorldConfig::default(), 2024).unwrap()
    }

    #[test]
    fn test_spawn_span_opposite_side() {
        let spawner = HazardSpawner::new(HazardTuning::default(), 800.0);
        assert_eq!(spawner.spawn_span(100.0), (400.0, 793.0));
        assert_eq!(spawner.spawn_span(400.0), (7.0, 400.0));
        assert_eq!(spawner.spawn_span(799.0), (7.0, 400.0));
    }

    #[test]
    fn test_hazard_spawn_properties() {
        let mut session = session();
        for pickup in &mut session.entities.pickups {
            pickup.active = false;
        }

        let spawner = session.spawner;
        let id = spawner.on_pickup_pool_exhausted(&mut session.entities, &mut session.rng, 100.0);

        let hazard = &session.entities.hazards[0];
        assert_eq!(hazard.id, id);
        assert!(hazard.active);
        assert!(hazard.body.pos.x >= 400.0);
        assert_eq!(hazard.body.pos.y, 16.0);
        assert!(hazard.body.vel.x.abs() <= 200.0);
        assert_eq!(hazard.body.vel.y, 20.0);
        assert_eq!(hazard.body.bounce, 1.0);
        assert!(hazard.body.collide_world_bounds);

        // Pool refilled at the top of each column
        assert_eq!(session.entities.active_pickup_count(), 12);
        for pickup in &session.entities.pickups {
            assert_eq!(pickup.body.pos, Vec2::new(pickup.base_x, 0.0));
            assert_eq!(pickup.body.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn test_hazard_left_half_when_player_right() {
        let mut session = session();
        let spawner = session.spawner;
        for _ in 0..20 {
            spawner.on_pickup_pool_exhausted(&mut session.entities, &mut session.rng, 650.0);
        }
        assert_eq!(session.entities.hazards.len(), 20);
        assert!(
            session
                .entities
                .hazards
                .iter()
                .all(|h| h.body.pos.x <= 400.0)
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hazard_spawns_opposite_the_player(
                seed in 0u64..10_000,
                player_x in 0.0f32..800.0
            ) {
                let mut session = GameSession::new(WorldConfig::default(), seed).unwrap();
                let spawner = session.spawner;
                let id = spawner.on_pickup_pool_exhausted(
                    &mut session.entities,
                    &mut session.rng,
                    player_x,
                );

                let hazard = &session.entities.hazards[0];
                prop_assert_eq!(hazard.id, id);
                let x = hazard.body.pos.x;
                if player_x < 400.0 {
                    prop_assert!(x >= 400.0, "player at {} but hazard at {}", player_x, x);
                } else {
                    prop_assert!(x <= 400.0, "player at {} but hazard at {}", player_x, x);
                }

                // Fully inside the world
                let aabb = hazard.body.aabb();
                prop_assert!(aabb.min.x >= 0.0 && aabb.max.x <= 800.0);
                prop_assert!(aabb.min.y >= 0.0 && aabb.max.y <= 370.0);
            }
        }
    }
}
