//! Coin pickups
//!
//! Coins come in two flavours: ground groups (a straight row resting just above
//! the ground line) and single airborne coins bobbing on a sine wave. The
//! spawner reads obstacle positions through [`ObstacleQuery`] so coins never
//! appear inside or right in front of an obstacle.
//!
//! # Lifecycle
//!
//! `spawned -> scrolling -> collected -> collect animation -> retired`, or
//! `spawned -> scrolling -> off-screen -> retired`. Retired coins are pruned in
//! the same tick.

use crate::collision::{Collidable, Rect};
use crate::config::CoinConfig;
use crate::obstacle::ObstacleQuery;
use rand::Rng;
use std::f32::consts::TAU;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoinKind {
    Ground,
    Airborne {
        original_y: f32,
        phase: f32,
        float_speed: f32,
        amplitude: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Coin {
    pub rect: Rect,
    pub kind: CoinKind,
    pub collected: bool,
    pub collect_animation: u32,
    pub active: bool,
}

impl Coin {
    pub fn ground(x: f32, y: f32, size: f32) -> Self {
        Coin {
            rect: Rect::new(x, y, size, size),
            kind: CoinKind::Ground,
            collected: false,
            collect_animation: 0,
            active: true,
        }
    }

    pub fn airborne<R: Rng + ?Sized>(x: f32, y: f32, size: f32, rng: &mut R) -> Self {
        Coin {
            rect: Rect::new(x, y, size, size),
            kind: CoinKind::Airborne {
                original_y: y,
                phase: rng.gen_range(0.0..TAU),
                float_speed: rng.gen_range(0.02..0.06),
                amplitude: rng.gen_range(2..=5) as f32,
            },
            collected: false,
            collect_animation: 0,
            active: true,
        }
    }

    pub fn is_ground_coin(&self) -> bool {
        matches!(self.kind, CoinKind::Ground)
    }

    /// Marks the coin collected. Only the first call returns true.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    /// 255 while scrolling, fading to 0 over the collect animation
    pub fn alpha(&self, animation_ticks: u32) -> u8 {
        if !self.collected || animation_ticks == 0 {
            return 255;
        }
        let progress = self.collect_animation.min(animation_ticks) * 255 / animation_ticks;
        (255 - progress) as u8
    }

    fn advance<R: Rng + ?Sized>(&mut self, scroll_speed: f32, animation_ticks: u32, rng: &mut R) {
        if self.collected {
            // Float up and fade out
            self.collect_animation += 1;
            self.rect.y -= 2.0;
            self.rect.x += rng.gen_range(-1..=1) as f32;

            if self.collect_animation >= animation_ticks {
                self.active = false;
            }
            return;
        }

        self.rect.x -= scroll_speed;

        if let CoinKind::Airborne { original_y, phase, float_speed, amplitude } = &mut self.kind {
            *phase += *float_speed;
            self.rect.y = *original_y + phase.sin() * *amplitude;
        }

        if self.rect.right() < 0.0 {
            self.active = false;
        }
    }
}

impl Collidable for Coin {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_solid(&self) -> bool {
        self.active && !self.collected
    }
}

pub struct CoinManager {
    coins: Vec<Coin>,
    spawn_timer: u32,
    spawn_interval: u32,
    waiting_after_obstacle: bool,
    viewport_width: f32,
    config: CoinConfig,
}

impl CoinManager {
    pub fn new(config: CoinConfig, viewport_width: f32) -> Self {
        CoinManager {
            coins: Vec::new(),
            spawn_timer: 0,
            spawn_interval: config.initial_interval,
            waiting_after_obstacle: false,
            viewport_width,
            config,
        }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub fn is_waiting_after_obstacle(&self) -> bool {
        self.waiting_after_obstacle
    }

    pub fn update<Q, R>(&mut self, scroll_speed: f32, obstacles: &Q, rng: &mut R)
    where
        Q: ObstacleQuery + ?Sized,
        R: Rng + ?Sized,
    {
        if obstacles.spawned_this_tick() {
            self.waiting_after_obstacle = true;
        }

        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_interval {
            if let Some(group) = self.try_spawn(obstacles, rng) {
                let (min, max) = if group[0].is_ground_coin() {
                    self.config.ground_interval
                } else {
                    self.config.airborne_interval
                };
                debug!(count = group.len(), ground = group[0].is_ground_coin(), "spawning coins");
                self.coins.extend(group);
                self.spawn_interval = rng.gen_range(min..=max);
                self.spawn_timer = 0;
            }
        }

        let animation_ticks = self.config.collect_animation_ticks;
        for coin in &mut self.coins {
            coin.advance(scroll_speed, animation_ticks, rng);
        }
        self.coins.retain(|coin| coin.active);
    }

    /// Returns `None` when this tick's spawn attempt is deferred
    fn try_spawn<Q, R>(&mut self, obstacles: &Q, rng: &mut R) -> Option<Vec<Coin>>
    where
        Q: ObstacleQuery + ?Sized,
        R: Rng + ?Sized,
    {
        let spawn_x = self.viewport_width;

        if self.waiting_after_obstacle {
            if self.spawn_timer < self.config.obstacle_wait_ticks
                || obstacles.last_within(self.config.obstacle_gap)
            {
                return None;
            }
            self.waiting_after_obstacle = false;
        }

        let mut ground_group = rng.gen_bool(self.config.ground_probability);
        if ground_group && obstacles.obstacle_near(spawn_x, self.config.lookahead) {
            ground_group = false;
        }

        if let Some(last) = self.coins.last() {
            if last.rect.x > spawn_x - self.config.min_spacing {
                return None;
            }
        }

        let group = if ground_group {
            self.ground_group(spawn_x, rng)
        } else {
            vec![self.airborne_coin(spawn_x, obstacles, rng)]
        };

        let margin = self.config.safety_margin;
        if group.iter().any(|coin| obstacles.overlaps_any(&coin.rect, margin)) {
            return None;
        }

        Some(group)
    }

    fn ground_group<R: Rng + ?Sized>(&self, x: f32, rng: &mut R) -> Vec<Coin> {
        let (min, max) = self.config.ground_count;
        let count = rng.gen_range(min..=max);

        (0..count)
            .map(|i| {
                Coin::ground(
                    x + i as f32 * self.config.ground_spacing,
                    self.config.ground_y,
                    self.config.size,
                )
            })
            .collect()
    }

    fn airborne_coin<Q, R>(&self, x: f32, obstacles: &Q, rng: &mut R) -> Coin
    where
        Q: ObstacleQuery + ?Sized,
        R: Rng + ?Sized,
    {
        let (min, max) = self.config.airborne_y;
        let mut y = rng.gen_range(min..=max) as f32;

        // Lift above an obstacle blocking the lane
        if let Some(top) = obstacles.obstacle_top_near(x, self.config.lift_radius) {
            y = top - self.config.lift_height;
        }

        Coin::airborne(x, y, self.config.size, rng)
    }

    /// Collects every uncollected coin touching the player.
    ///
    /// Returns the number collected this call times `multiplier`.
    pub fn check_collections(&mut self, player_rect: &Rect, multiplier: u32) -> u32 {
        let mut collected = 0;

        for coin in &mut self.coins {
            if coin.collides_with(player_rect) && coin.collect() {
                collected += 1;
            }
        }

        collected * multiplier
    }

    pub fn clear(&mut self) {
        self.coins.clear();
        self.spawn_timer = 0;
        self.spawn_interval = self.config.initial_interval;
        self.waiting_after_obstacle = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObstacleConfig;
    use crate::obstacle::{Obstacle, ObstacleManager};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn coins() -> CoinManager {
        CoinManager::new(CoinConfig::default(), 800.0)
    }

    fn no_obstacles() -> ObstacleManager {
        ObstacleManager::new(ObstacleConfig::default(), 800.0, 400.0)
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut coin = Coin::ground(0.0, 0.0, 25.0);
        assert!(coin.collect());
        assert!(!coin.collect());
        assert!(coin.collected);
    }

    #[test]
    fn test_check_collections_counts_once() {
        let mut manager = coins();
        manager.push(Coin::ground(100.0, 350.0, 25.0));
        manager.push(Coin::ground(130.0, 350.0, 25.0));
        manager.push(Coin::ground(500.0, 350.0, 25.0));
        let player = Rect::new(100.0, 340.0, 50.0, 50.0);

        assert_eq!(manager.check_collections(&player, 1), 2);
        assert_eq!(manager.check_collections(&player, 1), 0);
    }

    #[test]
    fn test_multiplier_applies() {
        let mut manager = coins();
        manager.push(Coin::ground(100.0, 350.0, 25.0));
        let player = Rect::new(100.0, 340.0, 50.0, 50.0);

        assert_eq!(manager.check_collections(&player, 2), 2);
    }

    #[test]
    fn test_collected_coin_animates_then_retires() {
        let mut rng = StdRng::seed_from_u64(5);
        let obstacles = no_obstacles();
        let mut manager = coins();
        manager.push(Coin::ground(400.0, 350.0, 25.0));
        manager.check_collections(&Rect::new(400.0, 350.0, 10.0, 10.0), 1);

        for _ in 0..9 {
            manager.update(8.0, &obstacles, &mut rng);
        }
        let coin = manager.coins().iter().find(|c| c.collected).unwrap();
        assert_eq!(coin.collect_animation, 9);
        assert_eq!(coin.rect.y, 350.0 - 18.0);
        assert!(coin.alpha(10) < 255);

        manager.update(8.0, &obstacles, &mut rng);
        assert!(manager.coins().iter().all(|c| !c.collected));
    }

    #[test]
    fn test_offscreen_coin_pruned_same_tick() {
        let mut rng = StdRng::seed_from_u64(5);
        let obstacles = no_obstacles();
        let mut manager = coins();
        manager.push(Coin::ground(-20.0, 350.0, 25.0));

        manager.update(8.0, &obstacles, &mut rng);
        assert!(manager.coins().iter().all(|c| c.rect.right() >= 0.0));
    }

    #[test]
    fn test_airborne_coin_floats_around_base() {
        let mut rng = StdRng::seed_from_u64(11);
        let obstacles = no_obstacles();
        let mut manager = coins();
        manager.push(Coin::airborne(700.0, 240.0, 25.0, &mut rng));

        for _ in 0..20 {
            manager.update(0.0, &obstacles, &mut rng);
            let coin = &manager.coins()[0];
            assert!((coin.rect.y - 240.0).abs() <= 5.0);
        }
    }

    #[test]
    fn test_spawns_on_initial_interval() {
        let mut rng = StdRng::seed_from_u64(21);
        let obstacles = no_obstacles();
        let mut manager = coins();

        for _ in 0..34 {
            manager.update(8.0, &obstacles, &mut rng);
        }
        assert!(manager.coins().is_empty());

        manager.update(8.0, &obstacles, &mut rng);
        assert!(!manager.coins().is_empty());

        let first = &manager.coins()[0];
        if first.is_ground_coin() {
            assert!((2..=5).contains(&manager.coins().len()));
            assert!(manager.coins().iter().all(|c| c.rect.y == 350.0));
        } else {
            assert_eq!(manager.coins().len(), 1);
        }
    }

    #[test]
    fn test_obstacle_spawn_defers_coins() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut obstacles = no_obstacles();
        let mut manager = coins();

        // Run up to the first obstacle spawn at tick 120
        for _ in 0..120 {
            obstacles.update(8.0, &mut rng);
            manager.update(8.0, &obstacles, &mut rng);
        }
        assert!(manager.is_waiting_after_obstacle());
        let before = manager.coins().len();

        // Obstacle is still within the gap for the next few ticks
        obstacles.update(8.0, &mut rng);
        manager.update(8.0, &obstacles, &mut rng);
        assert!(manager.coins().len() <= before);
        assert!(manager.is_waiting_after_obstacle());
    }

    #[test]
    fn test_ground_group_demoted_when_obstacle_ahead() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut obstacles = no_obstacles();
        obstacles.push(Obstacle::new(820.0, 310.0, 90.0, 90.0));
        let mut manager = CoinManager::new(
            CoinConfig {
                ground_probability: 1.0,
                ..CoinConfig::default()
            },
            800.0,
        );

        let group = manager.try_spawn(&obstacles, &mut rng).unwrap();
        assert_eq!(group.len(), 1);
        assert!(!group[0].is_ground_coin());
        assert!(!obstacles.overlaps_any(&group[0].rect, 10.0));
    }

    #[test]
    fn test_candidate_inside_safety_margin_discarded() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut obstacles = no_obstacles();
        obstacles.push(Obstacle::new(820.0, 310.0, 90.0, 90.0));
        let mut manager = CoinManager::new(
            CoinConfig {
                ground_probability: 0.0,
                lift_height: 30.0,
                ..CoinConfig::default()
            },
            800.0,
        );

        // Lifted to y = 280, bottom 305: within 10px of the obstacle top
        assert!(manager.try_spawn(&obstacles, &mut rng).is_none());
    }

    #[test]
    fn test_airborne_coin_lifted_over_obstacle() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut obstacles = no_obstacles();
        obstacles.push(Obstacle::new(760.0, 310.0, 90.0, 90.0));
        let manager = coins();

        let coin = manager.airborne_coin(800.0, &obstacles, &mut rng);
        assert_eq!(coin.rect.y, 310.0 - 40.0);
    }
}
