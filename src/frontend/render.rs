//! Screen drawing
//!
//! Every entity is drawn from its core `Rect`. When the matching image was
//! resolved at startup it is copied onto that rect; otherwise the rect is
//! filled with the asset's placeholder colour.
//!
//! # Layers (back to front)
//!
//! 1. Background and ground line
//! 2. Obstacles, coins, monsters, bullets
//! 3. Boss and battle bullets (battle screen only)
//! 4. Player
//! 5. HUD text and bars
//! 6. Screen overlays (pause, game over)

use super::text::{draw_text, draw_text_centered};
use crate::assets::{AssetKind, AssetResolver, ResolvedAsset, Rgb};
use crate::collision::Rect;
use crate::game::{Game, Screen};
use crate::player::{Character, PlayerDrawState};
use crate::shop::ShopItem;
use rand::Rng;
use sdl2::image::LoadTexture;
use sdl2::pixels::Color;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use std::collections::HashMap;
use tracing::warn;

const WHITE: Color = Color::RGB(255, 255, 255);
const BLACK: Color = Color::RGB(0, 0, 0);
const GOLD: Color = Color::RGB(255, 215, 0);
const GROUND: Color = Color::RGB(90, 60, 30);

pub fn color(rgb: Rgb) -> Color {
    Color::RGB(rgb.0, rgb.1, rgb.2)
}

pub fn to_sdl_rect(rect: &Rect) -> sdl2::rect::Rect {
    sdl2::rect::Rect::new(
        rect.x.round() as i32,
        rect.y.round() as i32,
        rect.w.max(1.0) as u32,
        rect.h.max(1.0) as u32,
    )
}

/// Loaded textures, keyed by what they draw
pub struct SpriteSet<'a> {
    textures: HashMap<AssetKind, Texture<'a>>,
    frames: HashMap<Character, Vec<Texture<'a>>>,
}

impl<'a> SpriteSet<'a> {
    /// Loads whatever the resolver finds; failures fall back to placeholders
    pub fn load(creator: &'a TextureCreator<WindowContext>, resolver: &AssetResolver) -> Self {
        let mut textures = HashMap::new();
        for kind in AssetKind::all() {
            if let ResolvedAsset::Image(path) = resolver.resolve(kind) {
                match creator.load_texture(&path) {
                    Ok(texture) => {
                        textures.insert(kind, texture);
                    }
                    Err(e) => warn!(?kind, path = %path.display(), error = %e, "image failed to load"),
                }
            }
        }

        let mut frames = HashMap::new();
        for character in [Character::Single, Character::Double] {
            let loaded: Vec<Texture<'a>> = resolver
                .player_frames(character)
                .iter()
                .filter_map(|path| match creator.load_texture(path) {
                    Ok(texture) => Some(texture),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "frame failed to load");
                        None
                    }
                })
                .collect();
            frames.insert(character, loaded);
        }

        SpriteSet { textures, frames }
    }

    pub fn frame_count(&self, character: Character) -> usize {
        self.frames.get(&character).map_or(0, Vec::len)
    }

    pub fn has(&self, kind: AssetKind) -> bool {
        self.textures.contains_key(&kind)
    }

    /// Draws `kind` onto `rect`, or its placeholder colour
    fn draw(&mut self, canvas: &mut Canvas<Window>, kind: AssetKind, rect: &Rect, alpha: u8) -> Result<(), String> {
        let dst = to_sdl_rect(rect);
        match self.textures.get_mut(&kind) {
            Some(texture) => {
                texture.set_alpha_mod(alpha);
                canvas.copy(texture, None, dst)
            }
            None => {
                let Rgb(r, g, b) = kind.placeholder();
                canvas.set_draw_color(Color::RGBA(r, g, b, alpha));
                canvas.fill_rect(dst)
            }
        }
    }
}

/// Colours for a horizontal bar
#[derive(Debug, Clone)]
pub struct BarStyle {
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub fill_color: Color,
    /// Used below 30%
    pub low_color: Color,
}

impl Default for BarStyle {
    fn default() -> Self {
        BarStyle {
            width: 50,
            height: 6,
            background_color: Color::RGB(50, 50, 50),
            fill_color: Color::RGB(0, 200, 0),
            low_color: Color::RGB(200, 0, 0),
        }
    }
}

impl BarStyle {
    pub fn render(&self, canvas: &mut Canvas<Window>, x: i32, y: i32, ratio: f32) -> Result<(), String> {
        let ratio = ratio.clamp(0.0, 1.0);

        canvas.set_draw_color(self.background_color);
        canvas.fill_rect(sdl2::rect::Rect::new(x, y, self.width, self.height))?;

        let filled = (self.width as f32 * ratio) as u32;
        if filled > 0 {
            canvas.set_draw_color(if ratio < 0.3 { self.low_color } else { self.fill_color });
            canvas.fill_rect(sdl2::rect::Rect::new(x, y, filled, self.height))?;
        }

        canvas.set_draw_color(BLACK);
        canvas.draw_rect(sdl2::rect::Rect::new(x, y, self.width, self.height))
    }
}

/// Draws one full frame for the current screen
pub fn render_frame<R: Rng>(
    canvas: &mut Canvas<Window>,
    sprites: &mut SpriteSet,
    game: &Game<R>,
) -> Result<(), String> {
    canvas.set_blend_mode(BlendMode::Blend);
    canvas.set_draw_color(BLACK);
    canvas.clear();

    match game.screen() {
        Screen::Title => draw_title(canvas, game)?,
        Screen::Menu => draw_menu(canvas, game)?,
        Screen::Shop => draw_shop(canvas, game)?,
        Screen::Playing | Screen::Battle => draw_world(canvas, sprites, game)?,
        Screen::Paused => {
            draw_world(canvas, sprites, game)?;
            draw_overlay(canvas, game, "PAUSED", "P TO RESUME  ESC FOR MENU")?;
        }
        Screen::GameOver => {
            draw_world(canvas, sprites, game)?;
            let hint = format!(
                "R TO RESTART  ESC FOR MENU ({})",
                game.game_over_ticks_left() / game.config().world.fps.max(1) + 1
            );
            draw_overlay(canvas, game, "GAME OVER", &hint)?;
        }
    }

    canvas.present();
    Ok(())
}

fn center_x<R: Rng>(game: &Game<R>) -> i32 {
    (game.config().world.viewport_width / 2.0) as i32
}

fn draw_title<R: Rng>(canvas: &mut Canvas<Window>, game: &Game<R>) -> Result<(), String> {
    let cx = center_x(game);
    draw_text_centered(canvas, "RUNNER", cx, 180, GOLD, 6)?;
    draw_text_centered(canvas, "PRESS ENTER", cx, 340, WHITE, 3)
}

fn draw_menu<R: Rng>(canvas: &mut Canvas<Window>, game: &Game<R>) -> Result<(), String> {
    let cx = center_x(game);
    let layout = game.layout();
    draw_text_centered(canvas, "CHOOSE A RUNNER", cx, 120, WHITE, 4)?;

    for (rect, character) in [
        (&layout.character_one, Character::Single),
        (&layout.character_two, Character::Double),
    ] {
        canvas.set_draw_color(color(character.placeholder_color()));
        canvas.fill_rect(to_sdl_rect(rect))?;
        let label = format!("{} {}", character.id(), character.name());
        draw_text_centered(canvas, &label, rect.center_x() as i32, rect.bottom() as i32 + 8, WHITE, 1)?;
    }

    canvas.set_draw_color(Color::RGB(120, 30, 30));
    canvas.fill_rect(to_sdl_rect(&layout.quit))?;
    draw_text_centered(canvas, "QUIT", layout.quit.center_x() as i32, layout.quit.y as i32 + 20, WHITE, 3)?;

    let profile = match game.saves().current_save_info() {
        Some(info) => format!("{}  BEST {}  COINS {}", info.player_name, info.high_score, info.total_coins),
        None => "NO PROFILE - N TO CREATE".to_string(),
    };
    draw_text(canvas, &profile, 10, 10, WHITE, 2)?;
    draw_text(canvas, &format!("WALLET {}  S SHOP", game.world().state.wallet), 10, 32, GOLD, 2)?;

    for (i, entry) in game.saves().leaderboard(3).iter().enumerate() {
        let line = format!("{}. {} {}", i + 1, entry.player_name, entry.high_score);
        draw_text(canvas, &line, 10, 540 + i as i32 * 16, WHITE, 2)?;
    }
    Ok(())
}

fn draw_shop<R: Rng>(canvas: &mut Canvas<Window>, game: &Game<R>) -> Result<(), String> {
    let cx = center_x(game);
    draw_text_centered(canvas, "SHOP", cx, 60, GOLD, 5)?;
    draw_text_centered(
        canvas,
        &format!("WALLET {}", game.world().state.wallet),
        cx,
        130,
        WHITE,
        2,
    )?;

    for (slot, item) in game.layout().shop_slots.iter().zip(ShopItem::all()) {
        let owned = game.shop().owns(item);
        canvas.set_draw_color(if owned { Color::RGB(30, 90, 30) } else { Color::RGB(40, 60, 100) });
        canvas.fill_rect(to_sdl_rect(slot))?;

        let status = if owned {
            "OWNED".to_string()
        } else {
            game.shop().price(item).to_string()
        };
        let label = format!("{} {}", item.name(), status);
        draw_text_centered(canvas, &label, slot.center_x() as i32, slot.y as i32 + 28, WHITE, 2)?;
    }

    draw_text_centered(canvas, "1-3 TO BUY  ESC TO LEAVE", cx, 520, WHITE, 2)
}

fn draw_world<R: Rng>(canvas: &mut Canvas<Window>, sprites: &mut SpriteSet, game: &Game<R>) -> Result<(), String> {
    let config = &game.config().world;
    let world = game.world();
    let coin_fade = game.config().coins.collect_animation_ticks;

    let screen_rect = Rect::new(0.0, 0.0, config.viewport_width, config.viewport_height);
    sprites.draw(canvas, AssetKind::Background, &screen_rect, 255)?;
    canvas.set_draw_color(GROUND);
    canvas.fill_rect(to_sdl_rect(&Rect::new(
        0.0,
        config.ground_y,
        config.viewport_width,
        config.viewport_height - config.ground_y,
    )))?;

    for obstacle in world.obstacles.obstacles() {
        sprites.draw(canvas, AssetKind::Obstacle, &obstacle.rect, 255)?;
    }
    for coin in world.coins.coins() {
        sprites.draw(canvas, AssetKind::Coin, &coin.rect, coin.alpha(coin_fade))?;
    }

    let enemy_bar = BarStyle::default();
    for monster in world.enemies.monsters() {
        sprites.draw(canvas, AssetKind::Monster, &monster.rect, 255)?;
        enemy_bar.render(canvas, monster.rect.x as i32, monster.rect.y as i32 - 10, monster.health_ratio())?;
    }
    for bullet in world.enemies.bullets() {
        sprites.draw(canvas, AssetKind::Bullet, &bullet.rect, 255)?;
    }

    if let Some(battle) = world.battles.battle() {
        sprites.draw(canvas, AssetKind::Boss, &battle.boss.rect, 255)?;
        let boss_bar = BarStyle {
            width: 200,
            height: 12,
            fill_color: Color::RGB(200, 60, 60),
            ..BarStyle::default()
        };
        boss_bar.render(canvas, config.viewport_width as i32 - 220, 20, battle.boss.health_ratio())?;

        let player_bar = BarStyle {
            width: 200,
            height: 12,
            ..BarStyle::default()
        };
        let ratio = battle.player_health as f32 / battle.player_max_health.max(1) as f32;
        player_bar.render(canvas, 20, 70, ratio)?;

        for bullet in battle.player_bullets.iter().chain(&battle.boss_bullets) {
            sprites.draw(canvas, AssetKind::Bullet, &bullet.rect, 255)?;
        }
    }

    draw_player(canvas, sprites, game)?;
    draw_hud(canvas, game)
}

fn draw_player<R: Rng>(canvas: &mut Canvas<Window>, sprites: &mut SpriteSet, game: &Game<R>) -> Result<(), String> {
    let player = &game.world().player;
    let dst = to_sdl_rect(&player.rect);

    match player.draw_state(sprites.has(AssetKind::ShootPose)) {
        PlayerDrawState::Hidden => Ok(()),
        PlayerDrawState::ShootPose => sprites.draw(canvas, AssetKind::ShootPose, &player.rect, 255),
        PlayerDrawState::Frame(index) => match sprites
            .frames
            .get(&player.character)
            .and_then(|frames| frames.get(index))
        {
            Some(texture) => canvas.copy(texture, None, dst),
            None => {
                canvas.set_draw_color(color(player.character.placeholder_color()));
                canvas.fill_rect(dst)
            }
        },
        PlayerDrawState::Placeholder(rgb) => {
            canvas.set_draw_color(color(rgb));
            canvas.fill_rect(dst)
        }
    }
}

fn draw_hud<R: Rng>(canvas: &mut Canvas<Window>, game: &Game<R>) -> Result<(), String> {
    let state = &game.world().state;
    let player = &game.world().player;

    draw_text(canvas, &format!("SCORE {}", state.score as u64), 20, 20, WHITE, 2)?;
    draw_text(canvas, &format!("COINS {}", state.run_coins), 20, 44, GOLD, 2)?;
    if game.world().battles.battle().is_none() {
        draw_text(canvas, &format!("HP {}", player.health), 20, 68, WHITE, 2)?;
    }
    if let Some(buff) = player.buff() {
        let label = format!("{:?} {}", buff.kind, buff.ticks_left / game.config().world.fps.max(1));
        draw_text(canvas, &label, 20, 92, Color::RGB(120, 200, 255), 2)?;
    }
    Ok(())
}

fn draw_overlay<R: Rng>(canvas: &mut Canvas<Window>, game: &Game<R>, title: &str, hint: &str) -> Result<(), String> {
    let config = &game.config().world;
    canvas.set_draw_color(Color::RGBA(0, 0, 0, 170));
    canvas.fill_rect(None)?;

    let cx = center_x(game);
    let mid = (config.viewport_height / 2.0) as i32;
    draw_text_centered(canvas, title, cx, mid - 60, WHITE, 6)?;
    draw_text_centered(
        canvas,
        &format!("SCORE {}  COINS {}", game.world().state.score as u64, game.world().state.run_coins),
        cx,
        mid + 10,
        GOLD,
        2,
    )?;
    draw_text_centered(canvas, hint, cx, mid + 50, WHITE, 2)
}
