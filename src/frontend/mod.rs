//! SDL2 window frontend
//!
//! Compiled only with the `sdl` feature. Owns nothing of the simulation: it
//! maps events to `GameInput`, and draws whatever `Game` exposes.

pub mod input;
pub mod render;
pub mod text;

pub use input::InputSystem;
pub use render::{SpriteSet, render_frame};
