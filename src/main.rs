use runner::assets::AssetResolver;
use runner::config::{DEFAULT_CONFIG_FILE, GameConfig};
use runner::frontend::{InputSystem, SpriteSet, render_frame};
use runner::game::Game;
use runner::player::Character;
use runner::save::SaveSystem;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), String> {
    init_tracing();

    let config = GameConfig::load_or_default(DEFAULT_CONFIG_FILE);
    let save_path = SaveSystem::default_path(&config.saves.file_name);
    info!(save_path = %save_path.display(), "starting runner");

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG | sdl2::image::InitFlag::JPG)?;

    let width = config.world.viewport_width as u32;
    let height = config.world.viewport_height as u32;
    let window = video_subsystem
        .window("Runner", width, height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    // Mouse events arrive in logical coordinates
    canvas.set_logical_size(width, height).map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;

    let resolver = AssetResolver::new(".");
    let mut sprites = SpriteSet::load(&texture_creator, &resolver);

    let frame_time = Duration::from_secs_f64(1.0 / f64::from(config.world.fps.max(1)));
    let mut game = Game::new(config, save_path);
    for character in [Character::Single, Character::Double] {
        game.set_frame_count(character, sprites.frame_count(character));
    }

    while game.is_running() {
        let frame_start = Instant::now();

        for input in InputSystem::poll_events(&mut event_pump, game.screen()) {
            game.handle_input(input);
        }
        game.update();
        render_frame(&mut canvas, &mut sprites, &game)?;

        if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    info!("shutting down");
    Ok(())
}
