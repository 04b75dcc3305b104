//! Save/Load system for runner profiles
//!
//! This module provides the profile store:
//! - JSON-based save file (human-readable, debuggable)
//! - Any number of named profiles ("Save 1", "Save 2", ...)
//! - Per-character stats, achievements and leaderboards
//! - Atomic rewrite after every change
//!
//! # Architecture
//!
//! - `types`: Save data structures and error types
//! - `manager`: SaveSystem for profile operations and file I/O
//!
//! # Example Usage
//!
//! ```ignore
//! let mut saves = SaveSystem::open(SaveSystem::default_path("game_saves.json"));
//! saves.create_new_save();
//! saves.update_save(1500, 120, 1);
//! let top = saves.leaderboard(5);
//! ```

pub mod manager;
pub mod types;

// Re-export commonly used types
pub use manager::SaveSystem;
pub use types::*;
