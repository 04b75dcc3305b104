//! Walking enemies and player bullets
//!
//! Only one enemy type exists: a slow sheep that walks towards the player while
//! the world scrolls. Its only way to hurt the player is a cooldown-gated melee
//! attack; the player answers with bullets.

use crate::collision::{Collidable, Rect, first_collision};
use crate::config::EnemyConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletDirection {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
    pub direction: BulletDirection,
    pub speed: f32,
    pub damage: i32,
    pub active: bool,
}

impl Bullet {
    pub fn new(rect: Rect, direction: BulletDirection, speed: f32, damage: i32) -> Self {
        Bullet {
            rect,
            direction,
            speed,
            damage,
            active: true,
        }
    }

    /// Moves along its direction and retires once outside `[min_x, max_x]`
    pub fn advance(&mut self, min_x: f32, max_x: f32) {
        match self.direction {
            BulletDirection::Right => self.rect.x += self.speed,
            BulletDirection::Left => self.rect.x -= self.speed,
        }

        if self.rect.x > max_x || self.rect.x < min_x {
            self.active = false;
        }
    }
}

impl Collidable for Bullet {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_solid(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub rect: Rect,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: u32,
    pub is_alive: bool,
    pub is_attacking: bool,
    cooldown_reset: u32,
}

impl Monster {
    pub fn new(x: f32, y: f32, config: &EnemyConfig) -> Self {
        Monster {
            rect: Rect::new(x, y, config.size, config.size),
            health: config.health,
            max_health: config.health,
            damage: config.damage,
            speed: config.speed,
            attack_range: config.attack_range,
            attack_cooldown: 0,
            is_alive: true,
            is_attacking: false,
            cooldown_reset: config.attack_cooldown,
        }
    }

    pub fn update(&mut self, scroll_speed: f32) {
        if !self.is_alive {
            return;
        }

        self.rect.x -= scroll_speed + self.speed;
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.is_attacking = false;
    }

    /// Returns true when this hit killed the monster
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.health -= damage;
        if self.health <= 0 {
            self.is_alive = false;
            return true;
        }
        false
    }

    /// Attacks when the player is within horizontal range and the cooldown has run out
    pub fn attack(&mut self, player_rect: &Rect) -> bool {
        if self.attack_cooldown > 0 {
            return false;
        }

        let distance = (self.rect.center_x() - player_rect.center_x()).abs();
        if distance <= self.attack_range {
            self.is_attacking = true;
            self.attack_cooldown = self.cooldown_reset;
            return true;
        }
        false
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health.max(0) as f32 / self.max_health as f32
    }
}

impl Collidable for Monster {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_solid(&self) -> bool {
        self.is_alive
    }
}

/// What happened to the player during one enemy tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnemyReport {
    pub player_hit: bool,
    pub kills: u32,
}

pub struct EnemyManager {
    monsters: Vec<Monster>,
    player_bullets: Vec<Bullet>,
    spawn_timer: u32,
    spawn_interval: u32,
    viewport_width: f32,
    ground_y: f32,
    config: EnemyConfig,
}

impl EnemyManager {
    pub fn new(config: EnemyConfig, viewport_width: f32, ground_y: f32) -> Self {
        EnemyManager {
            monsters: Vec::new(),
            player_bullets: Vec::new(),
            spawn_timer: 0,
            spawn_interval: config.initial_interval,
            viewport_width,
            ground_y,
            config,
        }
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.player_bullets
    }

    pub fn push_monster(&mut self, monster: Monster) {
        self.monsters.push(monster);
    }

    fn spawn_monster(&mut self) {
        let y = self.ground_y - self.config.size;
        debug!("spawning monster");
        self.monsters.push(Monster::new(self.viewport_width, y, &self.config));
    }

    pub fn spawn_player_bullet(&mut self, player_rect: &Rect, damage: i32) {
        let rect = Rect::new(
            player_rect.right(),
            player_rect.center_y() - self.config.bullet_height / 2.0,
            self.config.bullet_width,
            self.config.bullet_height,
        );
        self.player_bullets.push(Bullet::new(
            rect,
            BulletDirection::Right,
            self.config.bullet_speed,
            damage,
        ));
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        scroll_speed: f32,
        player_rect: Option<&Rect>,
        rng: &mut R,
    ) -> EnemyReport {
        let mut report = EnemyReport::default();

        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_monster();
            self.spawn_interval = rng.gen_range(self.config.interval_min..=self.config.interval_max);
            self.spawn_timer = 0;
        }

        for monster in &mut self.monsters {
            monster.update(scroll_speed);
        }
        self.monsters
            .retain(|monster| monster.is_alive && monster.rect.right() >= 0.0);

        let max_x = self.viewport_width + 200.0;
        for bullet in &mut self.player_bullets {
            bullet.advance(-50.0, max_x);
            if !bullet.active {
                continue;
            }

            // First live monster hit absorbs the bullet
            if let Some(index) = first_collision(&bullet.rect, &self.monsters) {
                bullet.active = false;
                if self.monsters[index].take_damage(bullet.damage) {
                    report.kills += 1;
                }
            }
        }
        self.player_bullets.retain(|bullet| bullet.active);
        self.monsters.retain(|monster| monster.is_alive);

        if let Some(player_rect) = player_rect {
            for monster in &mut self.monsters {
                if monster.attack(player_rect) {
                    report.player_hit = true;
                }
            }
        }

        report
    }

    pub fn reset(&mut self) {
        self.monsters.clear();
        self.player_bullets.clear();
        self.spawn_timer = 0;
        self.spawn_interval = self.config.initial_interval;
    }
}
