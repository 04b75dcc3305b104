//! Tunable game configuration
//!
//! All gameplay constants live here so they can be overridden from a JSON file
//! (`runner.json` next to the executable). Every section is `#[serde(default)]`,
//! so a config file only needs to name the values it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default config file looked up by the binary
pub const DEFAULT_CONFIG_FILE: &str = "runner.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

fn check_range(name: &str, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::Invalid(format!("{name}: min {min} is above max {max}")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub obstacles: ObstacleConfig,
    pub coins: CoinConfig,
    pub enemies: EnemyConfig,
    pub battle: BattleConfig,
    pub shop: ShopConfig,
    pub saves: SaveConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the spawners would panic on: inverted random ranges,
    /// empty coin groups and probabilities outside 0..=1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let obstacles = &self.obstacles;
        check_range("obstacles.interval", (obstacles.interval_min, obstacles.interval_max))?;
        check_range("obstacles.size", (obstacles.size_min, obstacles.size_max))?;

        let coins = &self.coins;
        check_range("coins.ground_interval", coins.ground_interval)?;
        check_range("coins.airborne_interval", coins.airborne_interval)?;
        check_range("coins.airborne_y", coins.airborne_y)?;
        check_range("coins.ground_count", coins.ground_count)?;
        if coins.ground_count.0 == 0 {
            return Err(ConfigError::Invalid("coins.ground_count: min must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&coins.ground_probability) {
            return Err(ConfigError::Invalid(format!(
                "coins.ground_probability: {} is outside 0..=1",
                coins.ground_probability
            )));
        }

        check_range("enemies.interval", (self.enemies.interval_min, self.enemies.interval_max))?;
        Ok(())
    }

    /// Loads `path` if it exists, otherwise (or on any error) falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return GameConfig::default();
        }

        match GameConfig::load_from_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "bad config file, using defaults");
                GameConfig::default()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Y coordinate every grounded entity rests on
    pub ground_y: f32,
    pub fps: u32,
    pub base_scroll_speed: f32,
    pub score_per_tick: f32,
    pub kill_score: f32,
    /// Ticks the game-over screen stays up before returning to the menu
    pub game_over_ticks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            viewport_width: 800.0,
            viewport_height: 600.0,
            ground_y: 400.0,
            fps: 60,
            base_scroll_speed: 8.0,
            score_per_tick: 0.1,
            kill_score: 50.0,
            game_over_ticks: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_x: f32,
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    /// Negative: up is towards y = 0
    pub jump_power: f32,
    /// Fraction of `jump_power` applied by the second jump
    pub double_jump_factor: f32,
    pub health: u32,
    pub attack_power: i32,
    pub ticks_per_frame: u32,
    pub shoot_pose_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            start_x: 100.0,
            width: 50.0,
            height: 50.0,
            gravity: 0.5,
            jump_power: -12.0,
            double_jump_factor: 0.8,
            health: 3,
            attack_power: 25,
            ticks_per_frame: 10,
            shoot_pose_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub initial_interval: u32,
    pub interval_min: u32,
    pub interval_max: u32,
    pub min_spacing: f32,
    pub size_min: u32,
    pub size_max: u32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        ObstacleConfig {
            initial_interval: 120,
            interval_min: 80,
            interval_max: 150,
            min_spacing: 200.0,
            size_min: 40,
            size_max: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub size: f32,
    pub initial_interval: u32,
    pub ground_interval: (u32, u32),
    pub airborne_interval: (u32, u32),
    pub ground_probability: f64,
    pub ground_count: (u32, u32),
    pub ground_spacing: f32,
    pub ground_y: f32,
    pub airborne_y: (u32, u32),
    pub min_spacing: f32,
    /// Ticks to hold coin spawns after an obstacle appears
    pub obstacle_wait_ticks: u32,
    pub obstacle_gap: f32,
    pub lookahead: f32,
    pub lift_radius: f32,
    pub lift_height: f32,
    pub safety_margin: f32,
    pub collect_animation_ticks: u32,
}

impl Default for CoinConfig {
    fn default() -> Self {
        CoinConfig {
            size: 25.0,
            initial_interval: 35,
            ground_interval: (50, 100),
            airborne_interval: (30, 60),
            ground_probability: 0.7,
            ground_count: (2, 5),
            ground_spacing: 30.0,
            ground_y: 350.0,
            airborne_y: (220, 260),
            min_spacing: 80.0,
            obstacle_wait_ticks: 60,
            obstacle_gap: 140.0,
            lookahead: 260.0,
            lift_radius: 120.0,
            lift_height: 40.0,
            safety_margin: 10.0,
            collect_animation_ticks: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub initial_interval: u32,
    pub interval_min: u32,
    pub interval_max: u32,
    pub size: f32,
    pub health: i32,
    pub damage: i32,
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: u32,
    pub bullet_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        EnemyConfig {
            initial_interval: 120,
            interval_min: 100,
            interval_max: 160,
            size: 60.0,
            health: 80,
            damage: 8,
            speed: 1.0,
            attack_range: 40.0,
            attack_cooldown: 30,
            bullet_speed: 10.0,
            bullet_width: 15.0,
            bullet_height: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Score values that start a boss battle, each at most once per run
    pub thresholds: Vec<u32>,
    pub victory_bonus: u32,
    pub boss_size: f32,
    pub boss_x: f32,
    pub boss_health: i32,
    pub player_health: i32,
    pub player_fire_cooldown: u32,
    pub boss_fire_cooldown: u32,
    pub player_bullet_speed: f32,
    pub boss_bullet_speed: f32,
    pub bullet_damage: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            thresholds: vec![300, 1000, 2000],
            victory_bonus: 300,
            boss_size: 80.0,
            boss_x: 620.0,
            boss_health: 20,
            player_health: 5,
            player_fire_cooldown: 15,
            boss_fire_cooldown: 60,
            player_bullet_speed: 12.0,
            boss_bullet_speed: 8.0,
            bullet_damage: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub coin_doubler_price: u32,
    pub start_shield_price: u32,
    pub extra_life_price: u32,
    pub start_shield_ticks: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            coin_doubler_price: 50,
            start_shield_price: 30,
            extra_life_price: 40,
            start_shield_ticks: 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub file_name: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        SaveConfig {
            file_name: "game_saves.json".to_string(),
        }
    }
}
