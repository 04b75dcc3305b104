//! Save data types for the runner
//!
//! This module defines the structures persisted in the save file. It uses Serde
//! for serialization to JSON; the on-disk shape is
//! `{ "saves": [SaveProfile...], "last_updated": "YYYY-mm-dd HH:MM:SS" }`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Timestamp format used for every date stored in the save file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prefix of auto-generated profile names ("Save 1", "Save 2", ...)
pub const SAVE_NAME_PREFIX: &str = "Save ";

/// Character ids that get a stats entry in every new profile
pub const CHARACTER_IDS: [u8; 2] = [1, 2];

pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// The root save file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(default)]
    pub saves: Vec<SaveProfile>,
    #[serde(default = "now_timestamp")]
    pub last_updated: String,
}

impl SaveDocument {
    pub fn empty() -> Self {
        SaveDocument {
            saves: Vec::new(),
            last_updated: now_timestamp(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub games_played: u64,
    pub best_score: u64,
    pub total_coins: u64,
}

/// Achievement flags. Once set they are never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    pub first_game: bool,
    pub score_1000: bool,
    pub coins_100: bool,
    pub score_5000: bool,
    pub coins_1000: bool,
}

impl Achievements {
    /// Raises flags earned by a single run; never lowers any
    pub fn record_run(&mut self, score: u64, coins: u64) {
        self.first_game = true;
        self.score_1000 |= score >= 1000;
        self.coins_100 |= coins >= 100;
        self.score_5000 |= score >= 5000;
        self.coins_1000 |= coins >= 1000;
    }
}

/// One named player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProfile {
    pub player_name: String,
    pub created_date: String,
    pub last_played: String,
    pub high_score: u64,
    pub total_coins: u64,
    pub games_played: u64,
    pub total_score: u64,
    #[serde(default)]
    pub character_stats: BTreeMap<String, CharacterStats>,
    #[serde(default)]
    pub achievements: Achievements,
}

impl SaveProfile {
    pub fn new(player_name: impl Into<String>) -> Self {
        let now = now_timestamp();
        let character_stats = CHARACTER_IDS
            .iter()
            .map(|id| (id.to_string(), CharacterStats::default()))
            .collect();

        SaveProfile {
            player_name: player_name.into(),
            created_date: now.clone(),
            last_played: now,
            high_score: 0,
            total_coins: 0,
            games_played: 0,
            total_score: 0,
            character_stats,
            achievements: Achievements::default(),
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.player_name.to_lowercase() == name.to_lowercase()
    }

    pub fn summary(&self) -> SaveSummary {
        SaveSummary {
            player_name: self.player_name.clone(),
            high_score: self.high_score,
            total_coins: self.total_coins,
            games_played: self.games_played,
            total_score: self.total_score,
            last_played: self.last_played.clone(),
        }
    }
}

/// Lightweight view of a profile for menus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub player_name: String,
    pub high_score: u64,
    pub total_coins: u64,
    pub games_played: u64,
    pub total_score: u64,
    pub last_played: String,
}

/// Error types for save/load operations
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_without_timestamp_keeps_profiles() {
        let profile = serde_json::to_string(&SaveProfile::new("Save 1")).unwrap();
        let json = format!(r#"{{"saves": [{profile}]}}"#);

        let document: SaveDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(document.saves.len(), 1);
        assert_eq!(document.saves[0].player_name, "Save 1");
        assert!(!document.last_updated.is_empty());
    }

    #[test]
    fn test_new_profile_shape() {
        let profile = SaveProfile::new("Save 1");
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["high_score"], 0);
        assert!(json["character_stats"]["1"].is_object());
        assert!(json["character_stats"]["2"].is_object());
        assert_eq!(json["achievements"]["coins_1000"], false);
    }

    #[test]
    fn test_achievements_are_monotonic() {
        let mut achievements = Achievements::default();
        achievements.record_run(1500, 120);
        achievements.record_run(10, 0);

        assert!(achievements.first_game);
        assert!(achievements.score_1000);
        assert!(achievements.coins_100);
        assert!(!achievements.score_5000);
        assert!(!achievements.coins_1000);
    }

    #[test]
    fn test_name_match_ignores_case() {
        let profile = SaveProfile::new("Save 3");
        assert!(profile.matches_name("save 3"));
        assert!(profile.matches_name("SAVE 3"));
        assert!(!profile.matches_name("Save 30"));
    }
}
