// Game module - screen flow and world simulation
//
// This module contains:
// - state.rs: Screen enum (the game's state machine)
// - input.rs: GameInput events and clickable menu regions
// - world.rs: GameWorld, WorldState and the per-tick collision step
// - controller.rs: Game, which dispatches input and drives update()

pub mod controller;
pub mod input;
pub mod state;
pub mod world;

pub use controller::Game;
pub use input::{GameInput, MenuAction, MenuLayout};
pub use state::Screen;
pub use world::{GameWorld, TickOutcome, TickRules, WorldState};
