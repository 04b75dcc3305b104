//! Ground obstacles
//!
//! Obstacles appear at the right edge of the viewport, scroll left with the
//! world and retire once they are fully off the left edge. The manager also
//! answers read-only placement queries for the coin spawner.

use crate::collision::{Collidable, Rect, first_collision};
use crate::config::ObstacleConfig;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    pub active: bool,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Obstacle {
            rect: Rect::new(x, y, width, height),
            active: true,
        }
    }

    /// Shifts left by `scroll_speed`; retires once the right edge is past x = 0
    pub fn advance(&mut self, scroll_speed: f32) {
        self.rect.x -= scroll_speed;

        if self.rect.right() < 0.0 {
            self.active = false;
        }
    }
}

impl Collidable for Obstacle {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_solid(&self) -> bool {
        self.active
    }
}

/// Read-only placement queries other spawners may ask about obstacles.
///
/// Spawners never touch the obstacle list; they only look at it through this
/// trait, within the same tick and after the obstacle update ran.
pub trait ObstacleQuery {
    /// True if some obstacle's left edge lies in `[x, x + window]`
    fn obstacle_near(&self, x: f32, window: f32) -> bool;

    /// True if the most recently spawned obstacle is still within `gap` of the right edge
    fn last_within(&self, gap: f32) -> bool;

    /// Top edge of the first obstacle whose left edge is within `radius` of `x`
    fn obstacle_top_near(&self, x: f32, radius: f32) -> Option<f32>;

    /// True if `rect`, grown by `margin`, overlaps any obstacle
    fn overlaps_any(&self, rect: &Rect, margin: f32) -> bool;

    /// True if an obstacle was spawned during the latest update
    fn spawned_this_tick(&self) -> bool;
}

pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    spawn_timer: u32,
    spawn_interval: u32,
    spawned_this_tick: bool,
    viewport_width: f32,
    ground_y: f32,
    config: ObstacleConfig,
}

impl ObstacleManager {
    pub fn new(config: ObstacleConfig, viewport_width: f32, ground_y: f32) -> Self {
        ObstacleManager {
            obstacles: Vec::new(),
            spawn_timer: 0,
            spawn_interval: config.initial_interval,
            spawned_this_tick: false,
            viewport_width,
            ground_y,
            config,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Adds an obstacle directly, bypassing the spawn timer
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    fn spacing_allows_spawn(&self) -> bool {
        match self.obstacles.last() {
            Some(last) => last.rect.x <= self.viewport_width - self.config.min_spacing,
            None => true,
        }
    }

    fn spawn_obstacle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let width = rng.gen_range(self.config.size_min..=self.config.size_max) as f32;
        let height = rng.gen_range(self.config.size_min..=self.config.size_max) as f32;
        let y = self.ground_y - height;

        debug!(width, height, "spawning obstacle");
        self.obstacles.push(Obstacle::new(self.viewport_width, y, width, height));
    }

    pub fn update<R: Rng + ?Sized>(&mut self, scroll_speed: f32, rng: &mut R) {
        self.spawned_this_tick = false;

        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_interval && self.spacing_allows_spawn() {
            self.spawn_obstacle(rng);
            self.spawn_interval = rng.gen_range(self.config.interval_min..=self.config.interval_max);
            self.spawn_timer = 0;
            self.spawned_this_tick = true;
        }

        for obstacle in &mut self.obstacles {
            obstacle.advance(scroll_speed);
        }
        self.obstacles.retain(|obstacle| obstacle.active);
    }

    pub fn check_collisions(&self, player_rect: &Rect) -> bool {
        first_collision(player_rect, &self.obstacles).is_some()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.spawn_timer = 0;
        self.spawn_interval = self.config.initial_interval;
        self.spawned_this_tick = false;
    }
}

impl ObstacleQuery for ObstacleManager {
    fn obstacle_near(&self, x: f32, window: f32) -> bool {
        self.obstacles
            .iter()
            .any(|obstacle| obstacle.rect.x >= x && obstacle.rect.x <= x + window)
    }

    fn last_within(&self, gap: f32) -> bool {
        self.obstacles
            .last()
            .map(|last| last.rect.x > self.viewport_width - gap)
            .unwrap_or(false)
    }

    fn obstacle_top_near(&self, x: f32, radius: f32) -> Option<f32> {
        self.obstacles
            .iter()
            .find(|obstacle| (obstacle.rect.x - x).abs() < radius)
            .map(|obstacle| obstacle.rect.top())
    }

    fn overlaps_any(&self, rect: &Rect, margin: f32) -> bool {
        let grown = rect.inflate(margin);
        self.obstacles.iter().any(|obstacle| obstacle.rect.intersects(&grown))
    }

    fn spawned_this_tick(&self) -> bool {
        self.spawned_this_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn manager() -> ObstacleManager {
        ObstacleManager::new(ObstacleConfig::default(), 800.0, 400.0)
    }

    #[test]
    fn test_first_spawn_after_initial_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut obstacles = manager();

        for _ in 0..119 {
            obstacles.update(8.0, &mut rng);
        }
        assert!(obstacles.obstacles().is_empty());

        obstacles.update(8.0, &mut rng);
        assert!(obstacles.spawned_this_tick());
        assert_eq!(obstacles.obstacles().len(), 1);

        let spawned = &obstacles.obstacles()[0];
        // Spawned at the right edge, then moved once
        assert_eq!(spawned.rect.x, 792.0);
        assert_eq!(spawned.rect.bottom(), 400.0);
        assert!((40.0..=90.0).contains(&spawned.rect.w));
        assert!((40.0..=90.0).contains(&spawned.rect.h));
    }

    #[test]
    fn test_spacing_blocks_spawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut obstacles = manager();
        obstacles.push(Obstacle::new(790.0, 350.0, 50.0, 50.0));

        for _ in 0..120 {
            obstacles.update(0.0, &mut rng);
        }

        // Last obstacle still inside the spacing window
        assert_eq!(obstacles.obstacles().len(), 1);
    }

    #[test]
    fn test_deactivates_only_when_fully_off_screen() {
        let mut obstacle = Obstacle::new(-45.0, 350.0, 50.0, 50.0);

        obstacle.advance(5.0); // right edge = 0
        assert!(obstacle.active);

        obstacle.advance(0.5); // right edge = -0.5
        assert!(!obstacle.active);
    }

    #[test]
    fn test_spawned_obstacle_retires_exactly_when_right_below_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut obstacles = manager();
        let obstacle = Obstacle::new(750.0, 350.0, 50.0, 50.0);
        obstacles.push(obstacle);

        // right edge starts at 800; after 100 ticks at speed 8 it sits at 0
        for _ in 0..100 {
            obstacles.update(8.0, &mut rng);
        }
        assert!(obstacles.obstacles().iter().any(|o| o.rect.right() == 0.0));

        obstacles.update(8.0, &mut rng);
        assert!(obstacles.obstacles().iter().all(|o| o.rect.right() >= 0.0));
        assert!(obstacles.obstacles().iter().all(|o| o.active));
    }

    #[test]
    fn test_check_collisions() {
        let mut obstacles = manager();
        let player = Rect::new(100.0, 350.0, 50.0, 50.0);

        assert!(!obstacles.check_collisions(&player));

        obstacles.push(Obstacle::new(300.0, 350.0, 50.0, 50.0));
        assert!(!obstacles.check_collisions(&player));

        obstacles.push(Obstacle::new(140.0, 360.0, 40.0, 40.0));
        assert!(obstacles.check_collisions(&player));
    }

    #[test]
    fn test_queries() {
        let mut obstacles = manager();
        obstacles.push(Obstacle::new(900.0, 330.0, 70.0, 70.0));

        assert!(obstacles.obstacle_near(800.0, 260.0));
        assert!(!obstacles.obstacle_near(500.0, 100.0));
        assert!(obstacles.last_within(140.0));
        assert_eq!(obstacles.obstacle_top_near(850.0, 120.0), Some(330.0));
        assert_eq!(obstacles.obstacle_top_near(500.0, 120.0), None);

        let coin = Rect::new(880.0, 350.0, 25.0, 25.0);
        assert!(obstacles.overlaps_any(&coin, 0.0));
        let far_coin = Rect::new(500.0, 350.0, 25.0, 25.0);
        assert!(!obstacles.overlaps_any(&far_coin, 10.0));
    }

    #[test]
    fn test_clear_resets_timer() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut obstacles = manager();
        for _ in 0..120 {
            obstacles.update(8.0, &mut rng);
        }
        assert!(!obstacles.obstacles().is_empty());

        obstacles.clear();
        assert!(obstacles.obstacles().is_empty());
        assert!(!obstacles.spawned_this_tick());
    }
}
