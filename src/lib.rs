//! Side-scrolling runner
//!
//! The simulation core (geometry, player physics, entity managers, battles,
//! shop, saves and the screen state machine) has no graphics dependency and is
//! driven entirely by discrete `GameInput` events plus one `Game::update` call
//! per fixed tick. The SDL2 window lives in `frontend` behind the `sdl` feature.

pub mod animation;
pub mod assets;
pub mod battle;
pub mod coin;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod game;
pub mod obstacle;
pub mod player;
pub mod save;
pub mod shop;

#[cfg(feature = "sdl")]
pub mod frontend;
