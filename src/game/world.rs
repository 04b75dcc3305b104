// GameWorld struct and per-tick simulation
//
// This module contains the GameWorld struct which owns the player and every
// entity manager, plus the WorldState counters for the current run. One call to
// GameWorld::tick advances the open world in a fixed order:
// player -> obstacles -> coins -> enemies -> collision resolution.

use crate::battle::{BattleOutcome, BattleSystem};
use crate::coin::CoinManager;
use crate::config::{GameConfig, WorldConfig};
use crate::enemy::{EnemyManager, EnemyReport};
use crate::obstacle::ObstacleManager;
use crate::player::{Character, Player};
use rand::Rng;
use tracing::info;

/// Counters for the current run plus the session wallet
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub score: f32,
    /// Coins picked up this run
    pub run_coins: u32,
    /// Coins banked across runs for the shop; not persisted
    pub wallet: u32,
    pub tick: u64,
    pub scroll_speed: f32,
}

impl WorldState {
    pub fn new(scroll_speed: f32) -> Self {
        WorldState {
            score: 0.0,
            run_coins: 0,
            wallet: 0,
            tick: 0,
            scroll_speed,
        }
    }

    /// Clears per-run counters; the wallet carries over
    pub fn reset_run(&mut self, scroll_speed: f32) {
        self.score = 0.0;
        self.run_coins = 0;
        self.tick = 0;
        self.scroll_speed = scroll_speed;
    }

    pub fn add_coins(&mut self, coins: u32) {
        self.run_coins += coins;
        self.wallet += coins;
    }
}

/// What one tick decided about the flow of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    GameOver,
    /// Score crossed an open battle threshold. The duel starts when the
    /// Battle screen is entered.
    BattleTriggered(u32),
    BattleWon { bonus: u32 },
    BattleLost,
}

/// Everything the collision step needs besides the entities themselves
#[derive(Debug, Clone, Copy)]
pub struct TickRules {
    pub coin_multiplier: u32,
    pub score_per_tick: f32,
    pub kill_score: f32,
}

impl TickRules {
    pub fn from_world(world: &WorldConfig, coin_multiplier: u32) -> Self {
        TickRules {
            coin_multiplier,
            score_per_tick: world.score_per_tick,
            kill_score: world.kill_score,
        }
    }
}

/// GameWorld owns every entity of a run
pub struct GameWorld {
    pub player: Player,
    pub obstacles: ObstacleManager,
    pub coins: CoinManager,
    pub enemies: EnemyManager,
    pub battles: BattleSystem,
    pub state: WorldState,
    config: GameConfig,
}

impl GameWorld {
    pub fn new(config: &GameConfig) -> Self {
        let world = &config.world;
        GameWorld {
            player: Player::new(Character::Single, &config.player, world.ground_y),
            obstacles: ObstacleManager::new(
                config.obstacles.clone(),
                world.viewport_width,
                world.ground_y,
            ),
            coins: CoinManager::new(config.coins.clone(), world.viewport_width),
            enemies: EnemyManager::new(config.enemies.clone(), world.viewport_width, world.ground_y),
            battles: BattleSystem::new(config.battle.clone(), world.viewport_width, world.ground_y),
            state: WorldState::new(world.base_scroll_speed),
            config: config.clone(),
        }
    }

    /// Empties every manager and starts a fresh run with `player`
    pub fn start_run(&mut self, player: Player) {
        self.clear();
        info!(character = player.character.name(), "run started");
        self.player = player;
    }

    /// Drops all entities and per-run counters; the wallet is kept
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.coins.clear();
        self.enemies.reset();
        self.battles.reset();
        self.state.reset_run(self.config.world.base_scroll_speed);
        self.player
            .reset_position(self.config.player.start_x, self.config.world.ground_y);
    }

    /// The speed every scrolling entity moves left this tick
    pub fn effective_scroll_speed(&self) -> f32 {
        self.state.scroll_speed * self.player.speed_multiplier
    }

    /// Fires a player bullet in the open world
    pub fn shoot(&mut self) {
        self.enemies
            .spawn_player_bullet(&self.player.rect, self.player.attack_power);
        self.player
            .trigger_shooting_pose(self.config.player.shoot_pose_ticks);
    }

    /// Fires at the boss; returns false while the cooldown runs
    pub fn shoot_in_battle(&mut self) -> bool {
        let fired = self.battles.player_fire(&self.player.rect);
        if fired {
            self.player
                .trigger_shooting_pose(self.config.player.shoot_pose_ticks);
        }
        fired
    }

    /// One open-world tick
    pub fn tick<R: Rng + ?Sized>(&mut self, rules: TickRules, rng: &mut R) -> TickOutcome {
        self.state.tick += 1;
        self.player.update();

        let scroll_speed = self.effective_scroll_speed();
        self.obstacles.update(scroll_speed, rng);
        self.coins.update(scroll_speed, &self.obstacles, rng);
        let report = self
            .enemies
            .update(scroll_speed, Some(&self.player.rect), rng);

        let outcome = resolve_collisions(
            &mut self.state,
            &mut self.player,
            &self.obstacles,
            &mut self.coins,
            report,
            rules,
        );
        if outcome != TickOutcome::Continue {
            return outcome;
        }

        match self.battles.check_trigger(self.state.score) {
            Some(threshold) => TickOutcome::BattleTriggered(threshold),
            None => TickOutcome::Continue,
        }
    }

    /// Starts the duel for the lowest open threshold the score has reached
    pub fn begin_battle(&mut self) -> Option<u32> {
        let threshold = self.battles.check_trigger(self.state.score)?;
        self.battles.start(threshold);
        Some(threshold)
    }

    /// One battle tick. Scrolling is frozen; only the player and the duel move.
    pub fn battle_tick(&mut self) -> TickOutcome {
        self.state.tick += 1;
        self.player.update();

        let outcome = self
            .battles
            .update(&self.player.rect, self.player.is_invincible());
        match outcome {
            BattleOutcome::Ongoing => TickOutcome::Continue,
            BattleOutcome::Victory => {
                let bonus = self.battles.finish(outcome);
                self.state.score += bonus as f32;
                TickOutcome::BattleWon { bonus }
            }
            BattleOutcome::Defeat => {
                self.battles.finish(outcome);
                TickOutcome::BattleLost
            }
        }
    }
}

/// Applies this tick's contacts to the run counters and the player
pub fn resolve_collisions(
    state: &mut WorldState,
    player: &mut Player,
    obstacles: &ObstacleManager,
    coins: &mut CoinManager,
    report: EnemyReport,
    rules: TickRules,
) -> TickOutcome {
    if obstacles.check_collisions(&player.rect) && !player.is_invincible() {
        return TickOutcome::GameOver;
    }

    let collected = coins.check_collections(&player.rect, rules.coin_multiplier);
    state.add_coins(collected);

    if report.player_hit && player.take_hit() {
        return TickOutcome::GameOver;
    }

    state.score += report.kills as f32 * rules.kill_score;
    state.score += rules.score_per_tick;

    TickOutcome::Continue
}
