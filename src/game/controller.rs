// Game struct: screen flow, input dispatch and run bookkeeping
//
// Game owns the world, the save system, the shop and the RNG. The frontend
// feeds it discrete GameInput events and calls update() once per frame.

use super::input::{GameInput, MenuAction, MenuLayout};
use super::state::Screen;
use super::world::{GameWorld, TickOutcome, TickRules};
use crate::config::GameConfig;
use crate::player::{Character, Player};
use crate::save::SaveSystem;
use crate::shop::{Shop, ShopItem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct Game<R: Rng = StdRng> {
    config: GameConfig,
    screen: Screen,
    pending_screen: Option<Screen>,
    /// Set while the pending screen came from the game itself; input
    /// cannot replace it
    pending_from_game: bool,
    world: GameWorld,
    saves: SaveSystem,
    shop: Shop,
    layout: MenuLayout,
    selected_character: Character,
    /// Animation frame counts the frontend loaded, per character
    frame_counts: [usize; 2],
    game_over_ticks: u32,
    run_recorded: bool,
    running: bool,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(config: GameConfig, save_path: impl AsRef<Path>) -> Self {
        Self::with_rng(config, save_path, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(config: GameConfig, save_path: impl AsRef<Path>, rng: R) -> Self {
        Game {
            world: GameWorld::new(&config),
            saves: SaveSystem::open(save_path),
            shop: Shop::new(config.shop.clone()),
            layout: MenuLayout::default(),
            screen: Screen::Title,
            pending_screen: None,
            pending_from_game: false,
            selected_character: Character::Single,
            frame_counts: [0; 2],
            game_over_ticks: 0,
            run_recorded: false,
            running: true,
            config,
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn pending_screen(&self) -> Option<Screen> {
        self.pending_screen
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn saves(&self) -> &SaveSystem {
        &self.saves
    }

    pub fn saves_mut(&mut self) -> &mut SaveSystem {
        &mut self.saves
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    pub fn selected_character(&self) -> Character {
        self.selected_character
    }

    /// Ticks left before the game over screen returns to the menu
    pub fn game_over_ticks_left(&self) -> u32 {
        self.config
            .world
            .game_over_ticks
            .saturating_sub(self.game_over_ticks)
    }

    /// Records how many run frames the frontend found for `character`
    pub fn set_frame_count(&mut self, character: Character, frame_count: usize) {
        self.frame_counts[usize::from(character.id() - 1)] = frame_count;
        if self.world.player.character == character {
            self.world.player.set_frame_count(frame_count);
        }
    }

    /// Queues a screen change for the start of the next update
    pub fn request_screen(&mut self, screen: Screen) {
        if screen != self.screen {
            debug!(from = self.screen.name(), to = screen.name(), "screen change requested");
        }
        self.pending_screen = Some(screen);
    }

    /// Queues a transition decided by the simulation (collision, battle end)
    fn queue_game_transition(&mut self, screen: Screen) {
        self.request_screen(screen);
        self.pending_from_game = true;
    }

    pub fn handle_input(&mut self, input: GameInput) {
        if input == GameInput::Quit {
            self.running = false;
            return;
        }
        if self.pending_from_game {
            debug!(?input, "input dropped while a game transition is pending");
            return;
        }

        match self.screen {
            Screen::Title => match input {
                GameInput::Confirm | GameInput::Jump | GameInput::Click { .. } => {
                    self.request_screen(Screen::Menu)
                }
                GameInput::Back => self.running = false,
                _ => {}
            },
            Screen::Menu => self.handle_menu_input(input),
            Screen::Shop => self.handle_shop_input(input),
            Screen::Playing => match input {
                GameInput::Jump => {
                    self.world.player.jump();
                }
                GameInput::Shoot => self.world.shoot(),
                GameInput::Pause => self.request_screen(Screen::Paused),
                GameInput::Back => self.return_to_menu(),
                _ => {}
            },
            Screen::Paused => match input {
                GameInput::Pause | GameInput::Confirm => self.request_screen(Screen::Playing),
                GameInput::Back => self.return_to_menu(),
                _ => {}
            },
            Screen::Battle => match input {
                GameInput::Jump => {
                    self.world.player.jump();
                }
                GameInput::Shoot => {
                    self.world.shoot_in_battle();
                }
                _ => {}
            },
            Screen::GameOver => match input {
                GameInput::Restart => self.start_game(self.selected_character),
                GameInput::Back | GameInput::Confirm => self.return_to_menu(),
                _ => {}
            },
        }
    }

    fn handle_menu_input(&mut self, input: GameInput) {
        match input {
            GameInput::Select(id) => {
                if let Some(character) = Character::from_id(id) {
                    self.start_game(character);
                }
            }
            GameInput::Click { x, y } => match self.layout.menu_action_at(x, y) {
                Some(MenuAction::StartWith(character)) => self.start_game(character),
                Some(MenuAction::Quit) => self.running = false,
                None => {}
            },
            GameInput::OpenShop => self.request_screen(Screen::Shop),
            GameInput::NewProfile => {
                if !self.saves.create_new_save() {
                    warn!("new profile was not written to disk");
                }
            }
            GameInput::Back => self.running = false,
            _ => {}
        }
    }

    fn handle_shop_input(&mut self, input: GameInput) {
        let slot = match input {
            GameInput::Select(slot) => Some(slot),
            GameInput::Click { x, y } => self.layout.shop_slot_at(x, y),
            GameInput::Back | GameInput::OpenShop => {
                self.request_screen(Screen::Menu);
                None
            }
            _ => None,
        };

        if let Some(item) = slot.and_then(ShopItem::from_slot) {
            self.purchase(item);
        }
    }

    /// Buys `item` with the session wallet
    pub fn purchase(&mut self, item: ShopItem) -> bool {
        self.shop.purchase(item, &mut self.world.state.wallet)
    }

    /// Starts a run with `character`, applying owned shop items
    pub fn start_game(&mut self, character: Character) {
        if self.saves.current().is_none() && !self.saves.create_new_save() {
            warn!("playing without a persisted profile");
        }

        let world_config = &self.config.world;
        let mut player = Player::new(character, &self.config.player, world_config.ground_y);
        player.health += self.shop.bonus_health();
        if let Some((kind, ticks)) = self.shop.starting_buff() {
            player.apply_buff(kind, ticks);
        }
        player.set_frame_count(self.frame_counts[usize::from(character.id() - 1)]);

        self.selected_character = character;
        self.world.start_run(player);
        self.game_over_ticks = 0;
        self.run_recorded = false;
        self.request_screen(Screen::Playing);
    }

    fn return_to_menu(&mut self) {
        self.world.clear();
        self.request_screen(Screen::Menu);
    }

    fn enter_screen(&mut self, screen: Screen) {
        self.screen = screen;

        match screen {
            Screen::GameOver => {
                self.game_over_ticks = 0;
                self.record_run();
            }
            Screen::Battle => {
                if !self.world.battles.is_active() && self.world.begin_battle().is_none() {
                    warn!("no open battle threshold, resuming run");
                    self.screen = Screen::Playing;
                }
            }
            _ => {}
        }
    }

    /// Writes the finished run to the current profile, once per run
    fn record_run(&mut self) {
        if self.run_recorded {
            return;
        }
        self.run_recorded = true;

        let score = self.world.state.score.max(0.0) as u64;
        let coins = u64::from(self.world.state.run_coins);
        info!(score, coins, "run finished");
        if !self.saves.update_save(score, coins, self.selected_character.id()) {
            warn!("run result was not saved");
        }
    }

    /// Advances one fixed tick
    pub fn update(&mut self) {
        if let Some(next) = self.pending_screen.take() {
            self.pending_from_game = false;
            self.enter_screen(next);
        }

        match self.screen {
            Screen::Playing => {
                let rules =
                    TickRules::from_world(&self.config.world, self.shop.coin_multiplier());
                match self.world.tick(rules, &mut self.rng) {
                    TickOutcome::GameOver => self.queue_game_transition(Screen::GameOver),
                    TickOutcome::BattleTriggered(_) => self.queue_game_transition(Screen::Battle),
                    _ => {}
                }
            }
            Screen::Battle => match self.world.battle_tick() {
                TickOutcome::BattleWon { .. } => self.queue_game_transition(Screen::Playing),
                TickOutcome::BattleLost => self.queue_game_transition(Screen::GameOver),
                _ => {}
            },
            Screen::GameOver => {
                self.game_over_ticks += 1;
                if self.game_over_ticks >= self.config.world.game_over_ticks {
                    self.return_to_menu();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::Obstacle;
    use crate::player::BuffKind;
    use tempfile::TempDir;

    fn game(dir: &TempDir) -> Game<StdRng> {
        Game::with_rng(
            GameConfig::default(),
            dir.path().join("game_saves.json"),
            StdRng::seed_from_u64(7),
        )
    }

    fn playing_game(dir: &TempDir, character: Character) -> Game<StdRng> {
        let mut game = game(dir);
        game.handle_input(GameInput::Confirm);
        game.update();
        game.handle_input(GameInput::Select(character.id()));
        game.update();
        assert_eq!(game.screen(), Screen::Playing);
        game
    }

    #[test]
    fn test_title_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        assert_eq!(game.screen(), Screen::Title);

        game.handle_input(GameInput::Confirm);
        // Applied on the next update, not immediately
        assert_eq!(game.screen(), Screen::Title);
        game.update();
        assert_eq!(game.screen(), Screen::Menu);
    }

    #[test]
    fn test_click_character_two_starts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        game.handle_input(GameInput::Confirm);
        game.update();

        game.handle_input(GameInput::Click { x: 400.0, y: 300.0 });
        game.update();
        assert_eq!(game.screen(), Screen::Menu);

        game.handle_input(GameInput::Click { x: 500.0, y: 300.0 });
        game.update();
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.world().player.max_jump_count, 2);
        assert!(game.saves().current().is_some());
    }

    #[test]
    fn test_quit_region_stops_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        game.handle_input(GameInput::Confirm);
        game.update();

        game.handle_input(GameInput::Click { x: 400.0, y: 480.0 });
        assert!(!game.is_running());
    }

    #[test]
    fn test_obstacle_hit_records_run_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);
        game.world_mut()
            .obstacles
            .push(Obstacle::new(110.0, 350.0, 50.0, 50.0));

        game.update();
        assert_eq!(game.pending_screen(), Some(Screen::GameOver));
        game.update();
        assert_eq!(game.screen(), Screen::GameOver);

        for _ in 0..100 {
            game.update();
        }
        assert_eq!(game.saves().current().unwrap().games_played, 1);
    }

    #[test]
    fn test_pause_cannot_cancel_queued_game_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);
        game.world_mut()
            .obstacles
            .push(Obstacle::new(110.0, 350.0, 50.0, 50.0));

        game.update();
        game.handle_input(GameInput::Pause);
        game.handle_input(GameInput::Back);
        game.update();

        assert_eq!(game.screen(), Screen::GameOver);
        assert_eq!(game.saves().current().unwrap().games_played, 1);
    }

    #[test]
    fn test_battle_starts_after_pause_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);
        game.world_mut()
            .player
            .apply_buff(BuffKind::Invincible, 100_000);
        game.world_mut().state.score = 299.95;

        game.update();
        game.handle_input(GameInput::Pause);
        game.handle_input(GameInput::Pause);
        game.update();

        assert_eq!(game.screen(), Screen::Battle);
        assert!(game.world().battles.is_active());
    }

    #[test]
    fn test_battle_screen_without_threshold_resumes_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);

        game.request_screen(Screen::Battle);
        game.update();

        assert_eq!(game.screen(), Screen::Playing);
        assert!(!game.world().battles.is_active());
    }

    #[test]
    fn test_game_over_returns_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);
        game.world_mut()
            .obstacles
            .push(Obstacle::new(110.0, 350.0, 50.0, 50.0));
        game.update();
        game.update();
        assert_eq!(game.screen(), Screen::GameOver);

        for _ in 0..300 {
            game.update();
        }
        game.update();
        assert_eq!(game.screen(), Screen::Menu);
        assert_eq!(game.world().state.score, 0.0);
    }

    #[test]
    fn test_restart_from_game_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Double);
        game.world_mut()
            .obstacles
            .push(Obstacle::new(110.0, 350.0, 50.0, 50.0));
        game.update();
        game.update();

        game.handle_input(GameInput::Restart);
        game.update();
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.selected_character(), Character::Double);
        assert!(game.world().obstacles.obstacles().is_empty());
    }

    #[test]
    fn test_pause_freezes_world() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);
        game.update();
        let tick = game.world().state.tick;

        game.handle_input(GameInput::Pause);
        game.update();
        assert_eq!(game.screen(), Screen::Paused);
        for _ in 0..10 {
            game.update();
        }
        assert_eq!(game.world().state.tick, tick);

        game.handle_input(GameInput::Pause);
        game.update();
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.world().state.tick, tick + 1);
    }

    #[test]
    fn test_battle_victory_pays_bonus() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = playing_game(&dir, Character::Single);
        game.world_mut()
            .player
            .apply_buff(BuffKind::Invincible, 100_000);
        game.world_mut().state.score = 299.95;

        game.update();
        assert_eq!(game.pending_screen(), Some(Screen::Battle));
        game.update();
        assert_eq!(game.screen(), Screen::Battle);

        for _ in 0..3000 {
            if game.screen() != Screen::Battle {
                break;
            }
            game.handle_input(GameInput::Shoot);
            game.update();
        }

        assert_eq!(game.screen(), Screen::Playing);
        assert!(game.world().state.score >= 600.0);
        assert!(game.world().battles.completed().contains(&300));
    }

    #[test]
    fn test_shop_purchase_with_wallet() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        game.handle_input(GameInput::Confirm);
        game.update();
        game.handle_input(GameInput::OpenShop);
        game.update();
        assert_eq!(game.screen(), Screen::Shop);

        game.world_mut().state.wallet = 60;
        game.handle_input(GameInput::Select(1));
        assert!(game.shop().owns(ShopItem::CoinDoubler));
        assert_eq!(game.world().state.wallet, 10);

        game.handle_input(GameInput::Select(3));
        assert!(!game.shop().owns(ShopItem::ExtraLife));

        game.handle_input(GameInput::Back);
        game.update();
        assert_eq!(game.screen(), Screen::Menu);
    }

    #[test]
    fn test_shop_items_apply_to_next_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        game.world_mut().state.wallet = 100;
        assert!(game.purchase(ShopItem::StartShield));
        assert!(game.purchase(ShopItem::ExtraLife));

        game.start_game(Character::Single);
        assert!(game.world().player.is_invincible());
        assert_eq!(game.world().player.health, 4);
        assert_eq!(game.world().state.wallet, 30);
    }

    #[test]
    fn test_new_profile_from_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        game.handle_input(GameInput::Confirm);
        game.update();

        game.handle_input(GameInput::NewProfile);
        game.handle_input(GameInput::NewProfile);
        assert_eq!(game.saves().all_saves().len(), 2);
        assert_eq!(game.saves().current().unwrap().player_name, "Save 2");
    }

    #[test]
    fn test_frame_count_follows_character() {
        let dir = tempfile::tempdir().unwrap();
        let mut game = game(&dir);
        game.set_frame_count(Character::Double, 4);

        game.start_game(Character::Double);
        game.update();
        assert!(matches!(
            game.world().player.draw_state(false),
            crate::player::PlayerDrawState::Frame(_)
        ));
    }
}
