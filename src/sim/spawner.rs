//! Obstacle and coin spawning
//!
//! Time-gated and stochastic. Entities appear past the right edge of the
//! viewport and scroll left until culled.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::PlayerBody;
use super::state::{Coin, Obstacle, ObstacleKind};
use crate::consts::*;

/// Minimum time between obstacles: 600ms at spacing 100 up to 2400ms at spacing 0
pub fn min_interval_ms(spacing_percent: f32) -> f64 {
    let pct = if spacing_percent.is_finite() {
        spacing_percent.clamp(0.0, 100.0)
    } else {
        50.0
    };
    600.0 + (100.0 - pct as f64) * 18.0
}

/// Scroll speed (pixels/s): base speed ramped from 1.0x to 2.2x by distance
pub fn scroll_speed(base_speed: f32, distance: u64) -> f32 {
    let base = if base_speed.is_finite() { base_speed.max(0.0) } else { 0.0 };
    let ramp = 1.0 + (distance as f32 / 2000.0).min(1.2);
    (base * ramp).round()
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Spawner owning the live obstacles and coins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Jittered anchor the next interval is measured from (None = spawn now)
    last_spawn_ms: Option<f64>,
    #[serde(skip, default = "fresh_rng")]
    rng: Pcg32,
    next_id: u32,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            last_spawn_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            obstacles: Vec::new(),
            coins: Vec::new(),
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop every entity and reset the spawn timer
    pub fn reset(&mut self) {
        self.last_spawn_ms = None;
        self.obstacles.clear();
        self.coins.clear();
    }

    /// A few coins to look at before the first run
    pub fn seed_initial_coins(&mut self, player: &PlayerBody, ground_y: f32) {
        for i in 0..3 {
            let id = self.next_entity_id();
            self.coins.push(Coin {
                id,
                center: Vec2::new(500.0 + i as f32 * 200.0, coin_height(player, ground_y)),
                radius: COIN_RADIUS,
                collected: false,
            });
        }
    }

    /// Possibly emit an obstacle (and maybe a coin) at time `now_ms`.
    ///
    /// Returns the kind spawned, if any.
    pub fn maybe_spawn_obstacle(
        &mut self,
        now_ms: f64,
        spacing_percent: f32,
        viewport_width: f32,
        ground_y: f32,
        player: &PlayerBody,
    ) -> Option<ObstacleKind> {
        let interval = min_interval_ms(spacing_percent);
        if let Some(last) = self.last_spawn_ms {
            if now_ms - last < interval {
                return None;
            }
        }

        // Push the next window out by a random amount so spawns never look periodic
        let spread = (interval * 0.4).max(200.0);
        let jitter = (self.rng.random::<f64>() * spread - 200.0).max(0.0);
        self.last_spawn_ms = Some(now_ms + jitter);

        let kind = if self.rng.random_bool(ROCK_CHANCE) {
            ObstacleKind::Rock
        } else {
            ObstacleKind::Box
        };
        let width = if viewport_width.is_finite() && viewport_width > 0.0 {
            viewport_width
        } else {
            WIDE_REFERENCE_WIDTH
        };
        let scale = (width / WIDE_REFERENCE_WIDTH).max(1.0);
        let (w, h) = kind.base_size();
        let x = width + (width * 0.18).round().max(160.0);

        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(x, ground_y - OBSTACLE_GROUND_OFFSET),
            size: Vec2::new(w * scale, h * scale),
        });

        if self.rng.random_bool(COIN_CHANCE) {
            let id = self.next_entity_id();
            self.coins.push(Coin {
                id,
                center: Vec2::new(x + COIN_LEAD, coin_height(player, ground_y)),
                radius: COIN_RADIUS,
                collected: false,
            });
        }

        log::debug!("Spawned {:?} at t={:.0}ms (interval {:.0}ms)", kind, now_ms, interval);
        Some(kind)
    }

    /// Scroll everything left and cull what has left the screen
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let dx = if dt.is_finite() && speed.is_finite() {
            dt.max(0.0) * speed.max(0.0)
        } else {
            0.0
        };

        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= dx;
        }
        self.obstacles.retain(|o| o.pos.x + o.size.x > CULL_X);

        for coin in &mut self.coins {
            coin.center.x -= dx;
        }
        self.coins
            .retain(|c| !c.collected && c.center.x + c.radius > CULL_X);
    }
}

/// Coins float near the player's hip when standing, even if it is mid-jump
fn coin_height(player: &PlayerBody, ground_y: f32) -> f32 {
    player.resting_y(ground_y) + player.size.y - COIN_FOOT_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> PlayerBody {
        PlayerBody {
            pos: Vec2::new(115.0, 454.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_min_interval_mapping() {
        assert_eq!(min_interval_ms(100.0), 600.0);
        assert_eq!(min_interval_ms(0.0), 2400.0);
        assert_eq!(min_interval_ms(50.0), 1500.0);
        // Out of range clamps
        assert_eq!(min_interval_ms(250.0), 600.0);
        assert_eq!(min_interval_ms(-10.0), 2400.0);
    }

    #[test]
    fn test_scroll_speed_ramp() {
        assert_eq!(scroll_speed(160.0, 0), 160.0);
        assert_eq!(scroll_speed(160.0, 1000), 240.0);
        assert_eq!(scroll_speed(160.0, 2400), 352.0);
        assert_eq!(scroll_speed(160.0, 100_000), 352.0);
        assert_eq!(scroll_speed(-50.0, 500), 0.0);
    }

    #[test]
    fn test_first_spawn_is_immediate() {
        let mut spawner = Spawner::new(1);
        let kind = spawner.maybe_spawn_obstacle(0.0, 50.0, 1280.0, 518.0, &player());
        assert!(kind.is_some());
        assert_eq!(spawner.obstacles.len(), 1);

        let o = &spawner.obstacles[0];
        assert_eq!(o.pos.x, 1280.0 + 230.0);
        assert_eq!(o.pos.y, 518.0 - OBSTACLE_GROUND_OFFSET);
        let (w, h) = o.kind.base_size();
        assert_eq!(o.size, Vec2::new(w, h));
    }

    #[test]
    fn test_obstacles_scale_on_wide_viewports() {
        let mut spawner = Spawner::new(3);
        spawner.maybe_spawn_obstacle(0.0, 50.0, 2560.0, 700.0, &player());
        let o = &spawner.obstacles[0];
        let (w, h) = o.kind.base_size();
        assert_eq!(o.size, Vec2::new(w * 2.0, h * 2.0));
    }

    #[test]
    fn test_spawned_coin_leads_obstacle() {
        // Some seed among the first few must roll a coin
        let found = (0..32u64).any(|seed| {
            let mut spawner = Spawner::new(seed);
            spawner.maybe_spawn_obstacle(0.0, 50.0, 1280.0, 518.0, &player());
            match spawner.coins.first() {
                Some(coin) => {
                    let o = &spawner.obstacles[0];
                    assert_eq!(coin.center.x, o.pos.x + COIN_LEAD);
                    assert_eq!(coin.center.y, 454.0 + 64.0 - COIN_FOOT_OFFSET);
                    assert_eq!(coin.radius, COIN_RADIUS);
                    true
                }
                None => false,
            }
        });
        assert!(found);
    }

    #[test]
    fn test_coin_height_ignores_jump() {
        let airborne = PlayerBody {
            pos: Vec2::new(115.0, 340.0),
            vy: -400.0,
            on_ground: false,
            ..Default::default()
        };
        let found = (0..32u64).any(|seed| {
            let mut spawner = Spawner::new(seed);
            spawner.maybe_spawn_obstacle(0.0, 50.0, 1280.0, 518.0, &airborne);
            spawner
                .coins
                .first()
                .map(|coin| assert_eq!(coin.center.y, 518.0 - COIN_FOOT_OFFSET))
                .is_some()
        });
        assert!(found);

        let mut spawner = Spawner::new(3);
        spawner.seed_initial_coins(&airborne, 518.0);
        assert!(spawner.coins.iter().all(|c| c.center.y == 518.0 - COIN_FOOT_OFFSET));
    }

    #[test]
    fn test_advance_culls_offscreen() {
        let mut spawner = Spawner::new(1);
        spawner.maybe_spawn_obstacle(0.0, 50.0, 1280.0, 518.0, &player());
        spawner.seed_initial_coins(&player(), 518.0);
        spawner.advance(1.0, 100.0);
        assert!(!spawner.obstacles.is_empty());
        // Far enough to carry everything past the cull line
        spawner.advance(10.0, 1000.0);
        assert!(spawner.obstacles.is_empty());
        assert!(spawner.coins.is_empty());
    }

    #[test]
    fn test_collected_coins_are_removed() {
        let mut spawner = Spawner::new(1);
        spawner.seed_initial_coins(&player(), 518.0);
        spawner.coins[1].collected = true;
        spawner.advance(0.0, 160.0);
        assert_eq!(spawner.coins.len(), 2);
    }

    #[test]
    fn test_negative_speed_does_not_move() {
        let mut spawner = Spawner::new(1);
        spawner.seed_initial_coins(&player(), 518.0);
        spawner.advance(1.0, -300.0);
        assert_eq!(spawner.coins[0].center.x, 500.0);
    }

    proptest! {
        #[test]
        fn test_spawns_respect_min_interval(
            seed in any::<u64>(),
            spacing in 0.0f32..=100.0,
            steps in proptest::collection::vec(1.0f64..400.0, 1..300),
        ) {
            let mut spawner = Spawner::new(seed);
            let interval = min_interval_ms(spacing);
            let mut now = 0.0;
            let mut last: Option<f64> = None;
            for step in steps {
                now += step;
                if spawner
                    .maybe_spawn_obstacle(now, spacing, 1280.0, 518.0, &player())
                    .is_some()
                {
                    if let Some(prev) = last {
                        prop_assert!(now - prev >= interval);
                    }
                    last = Some(now);
                }
            }
        }
    }
}
