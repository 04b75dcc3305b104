//! Scripted boss battles
//!
//! Crossing a score threshold freezes the scrolling world and starts a duel
//! with a stationary boss. Both sides shoot on independent cooldowns until one
//! runs out of health. Each threshold can be won at most once per run.
//!
//! # State Machine
//!
//! `Idle --check_trigger()/start()--> Active --update() = Victory|Defeat--> finish() --> Idle`

use crate::collision::{Collidable, Rect};
use crate::config::BattleConfig;
use crate::enemy::{Bullet, BulletDirection};
use std::collections::BTreeSet;
use tracing::info;

const BULLET_WIDTH: f32 = 20.0;
const BULLET_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    Victory,
    Defeat,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub rect: Rect,
    pub health: i32,
    pub max_health: i32,
    pub fire_cooldown: u32,
}

impl Collidable for Boss {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_solid(&self) -> bool {
        self.is_alive()
    }
}

impl Boss {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_hit(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// One running duel
#[derive(Debug, Clone)]
pub struct Battle {
    pub threshold: u32,
    pub boss: Boss,
    pub player_health: i32,
    pub player_max_health: i32,
    pub player_bullets: Vec<Bullet>,
    pub boss_bullets: Vec<Bullet>,
    player_fire_cooldown: u32,
}

pub struct BattleSystem {
    active: Option<Battle>,
    completed: BTreeSet<u32>,
    viewport_width: f32,
    ground_y: f32,
    config: BattleConfig,
}

impl BattleSystem {
    pub fn new(config: BattleConfig, viewport_width: f32, ground_y: f32) -> Self {
        BattleSystem {
            active: None,
            completed: BTreeSet::new(),
            viewport_width,
            ground_y,
            config,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.active.as_ref()
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    /// Lowest reached threshold that has not been won yet
    pub fn check_trigger(&self, score: f32) -> Option<u32> {
        if self.active.is_some() {
            return None;
        }

        self.config
            .thresholds
            .iter()
            .copied()
            .filter(|threshold| score >= *threshold as f32 && !self.completed.contains(threshold))
            .min()
    }

    pub fn start(&mut self, threshold: u32) {
        let size = self.config.boss_size;
        let boss = Boss {
            rect: Rect::new(self.config.boss_x, self.ground_y - size, size, size),
            health: self.config.boss_health,
            max_health: self.config.boss_health,
            fire_cooldown: self.config.boss_fire_cooldown,
        };

        info!(threshold, "boss battle started");
        self.active = Some(Battle {
            threshold,
            boss,
            player_health: self.config.player_health,
            player_max_health: self.config.player_health,
            player_bullets: Vec::new(),
            boss_bullets: Vec::new(),
            player_fire_cooldown: 0,
        });
    }

    /// Fires a player bullet if the player's cooldown allows it
    pub fn player_fire(&mut self, player_rect: &Rect) -> bool {
        let Some(battle) = self.active.as_mut() else {
            return false;
        };
        if battle.player_fire_cooldown > 0 {
            return false;
        }

        let rect = Rect::new(
            player_rect.right(),
            player_rect.center_y() - BULLET_HEIGHT / 2.0,
            BULLET_WIDTH,
            BULLET_HEIGHT,
        );
        battle.player_bullets.push(Bullet::new(
            rect,
            BulletDirection::Right,
            self.config.player_bullet_speed,
            self.config.bullet_damage,
        ));
        battle.player_fire_cooldown = self.config.player_fire_cooldown;
        true
    }

    pub fn update(&mut self, player_rect: &Rect, player_invincible: bool) -> BattleOutcome {
        let min_x = -50.0 - BULLET_WIDTH;
        let max_x = self.viewport_width + 50.0;
        let config = &self.config;
        let Some(battle) = self.active.as_mut() else {
            return BattleOutcome::Ongoing;
        };

        battle.player_fire_cooldown = battle.player_fire_cooldown.saturating_sub(1);
        battle.boss.fire_cooldown = battle.boss.fire_cooldown.saturating_sub(1);

        if battle.boss.is_alive() && battle.boss.fire_cooldown == 0 {
            let rect = Rect::new(
                battle.boss.rect.left() - BULLET_WIDTH,
                player_rect.center_y() - BULLET_HEIGHT / 2.0,
                BULLET_WIDTH,
                BULLET_HEIGHT,
            );
            battle.boss_bullets.push(Bullet::new(
                rect,
                BulletDirection::Left,
                config.boss_bullet_speed,
                config.bullet_damage,
            ));
            battle.boss.fire_cooldown = config.boss_fire_cooldown;
        }

        for bullet in &mut battle.player_bullets {
            bullet.advance(min_x, max_x);
            if bullet.is_solid() && battle.boss.collides_with(&bullet.rect) {
                bullet.active = false;
                battle.boss.take_hit(bullet.damage);
            }
        }
        battle.player_bullets.retain(|bullet| bullet.active);

        for bullet in &mut battle.boss_bullets {
            bullet.advance(min_x, max_x);
            if bullet.collides_with(player_rect) {
                bullet.active = false;
                if !player_invincible {
                    battle.player_health = (battle.player_health - bullet.damage).max(0);
                }
            }
        }
        battle.boss_bullets.retain(|bullet| bullet.active);

        if !battle.boss.is_alive() {
            BattleOutcome::Victory
        } else if battle.player_health <= 0 {
            BattleOutcome::Defeat
        } else {
            BattleOutcome::Ongoing
        }
    }

    /// Ends the current battle and returns the score bonus earned.
    ///
    /// The bonus is paid only the first time a threshold is won.
    pub fn finish(&mut self, outcome: BattleOutcome) -> u32 {
        let Some(battle) = self.active.take() else {
            return 0;
        };

        match outcome {
            BattleOutcome::Victory => {
                info!(threshold = battle.threshold, "boss defeated");
                if self.completed.insert(battle.threshold) {
                    self.config.victory_bonus
                } else {
                    0
                }
            }
            BattleOutcome::Defeat => {
                info!(threshold = battle.threshold, "player lost boss battle");
                0
            }
            BattleOutcome::Ongoing => {
                // Not finished: put it back
                self.active = Some(battle);
                0
            }
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> BattleSystem {
        BattleSystem::new(BattleConfig::default(), 800.0, 400.0)
    }

    fn player_rect() -> Rect {
        Rect::new(100.0, 350.0, 50.0, 50.0)
    }

    #[test]
    fn test_trigger_picks_lowest_open_threshold() {
        let mut battles = system();
        assert_eq!(battles.check_trigger(299.9), None);
        assert_eq!(battles.check_trigger(1200.0), Some(300));

        battles.start(300);
        assert_eq!(battles.check_trigger(1200.0), None);

        let bonus = battles.finish(BattleOutcome::Victory);
        assert_eq!(bonus, 300);
        assert_eq!(battles.check_trigger(1200.0), Some(1000));
    }

    #[test]
    fn test_bonus_paid_once_per_threshold() {
        let mut battles = system();
        battles.start(300);
        assert_eq!(battles.finish(BattleOutcome::Victory), 300);

        battles.start(300);
        assert_eq!(battles.finish(BattleOutcome::Victory), 0);
        assert_eq!(battles.completed().len(), 1);
    }

    #[test]
    fn test_defeat_leaves_threshold_open() {
        let mut battles = system();
        battles.start(300);
        assert_eq!(battles.finish(BattleOutcome::Defeat), 0);
        assert!(!battles.is_active());
        assert_eq!(battles.check_trigger(300.0), Some(300));
    }

    #[test]
    fn test_player_fire_cooldown() {
        let mut battles = system();
        let player = player_rect();
        assert!(!battles.player_fire(&player));

        battles.start(300);
        assert!(battles.player_fire(&player));
        assert!(!battles.player_fire(&player));

        for _ in 0..15 {
            battles.update(&player, false);
        }
        assert!(battles.player_fire(&player));
    }

    #[test]
    fn test_player_wins_by_shooting() {
        let mut battles = system();
        let player = player_rect();
        battles.start(300);

        let mut outcome = BattleOutcome::Ongoing;
        for _ in 0..2000 {
            battles.player_fire(&player);
            // Invincible so the boss can't win first
            outcome = battles.update(&player, true);
            if outcome != BattleOutcome::Ongoing {
                break;
            }
        }

        assert_eq!(outcome, BattleOutcome::Victory);
        assert_eq!(battles.battle().unwrap().player_health, 5);
    }

    #[test]
    fn test_boss_wins_against_idle_player() {
        let mut battles = system();
        let player = player_rect();
        battles.start(1000);

        let mut outcome = BattleOutcome::Ongoing;
        for _ in 0..2000 {
            outcome = battles.update(&player, false);
            if outcome != BattleOutcome::Ongoing {
                break;
            }
        }

        assert_eq!(outcome, BattleOutcome::Defeat);
        assert_eq!(battles.battle().unwrap().boss.health, 20);
    }

    #[test]
    fn test_finish_ongoing_keeps_battle() {
        let mut battles = system();
        battles.start(300);
        assert_eq!(battles.finish(BattleOutcome::Ongoing), 0);
        assert!(battles.is_active());
    }

    #[test]
    fn test_reset_clears_completed() {
        let mut battles = system();
        battles.start(300);
        battles.finish(BattleOutcome::Victory);
        battles.reset();
        assert!(battles.completed().is_empty());
    }
}
