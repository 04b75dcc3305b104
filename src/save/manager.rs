//! Save system for handling profile persistence
//!
//! This module provides the SaveSystem struct which handles:
//! - Loading the profile list on startup (missing/corrupt file -> empty list)
//! - Creating, selecting, updating and deleting named profiles
//! - Leaderboard queries
//! - Rewriting the whole document atomically after every mutation
//!
//! Game-facing operations return `bool` like every other gameplay action; the
//! underlying I/O errors are logged, and the in-memory state stays valid even
//! when a write fails.

use super::types::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct SaveSystem {
    path: PathBuf,
    document: SaveDocument,
    current_name: Option<String>,
}

impl SaveSystem {
    /// Opens the save file at `path`, starting empty if it is missing or unreadable
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let document = match Self::read_document(&path) {
            Ok(Some(document)) => {
                info!(path = %path.display(), profiles = document.saves.len(), "save file loaded");
                document
            }
            Ok(None) => {
                info!(path = %path.display(), "no save file yet");
                SaveDocument::empty()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable save file, starting fresh");
                SaveDocument::empty()
            }
        };

        SaveSystem {
            path,
            document,
            current_name: None,
        }
    }

    /// Default location: `<data dir>/runner/<file_name>`, or the working directory
    pub fn default_path(file_name: &str) -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("runner").join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> Result<Option<SaveDocument>, SaveError> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let document: SaveDocument = serde_json::from_str(&json)?;
        Ok(Some(document))
    }

    fn persist(&mut self) -> Result<(), SaveError> {
        self.document.last_updated = now_timestamp();
        let json = serde_json::to_string_pretty(&self.document)?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    fn persist_logged(&mut self) -> bool {
        match self.persist() {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to write save file");
                false
            }
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.document
            .saves
            .iter()
            .position(|profile| profile.matches_name(name))
    }

    /// Lowest "Save N" (N >= 1) not already taken
    pub fn generate_save_name(&self) -> String {
        let taken: Vec<u32> = self
            .document
            .saves
            .iter()
            .filter_map(|profile| {
                let lower = profile.player_name.to_lowercase();
                lower
                    .strip_prefix(&SAVE_NAME_PREFIX.to_lowercase())
                    .and_then(|suffix| suffix.parse::<u32>().ok())
            })
            .collect();

        let number = (1..).find(|n| !taken.contains(n)).unwrap_or(1);
        format!("{}{}", SAVE_NAME_PREFIX, number)
    }

    /// Appends a fresh profile, selects it, and writes the file.
    ///
    /// Returns false if the write failed; the profile still exists in memory.
    pub fn create_new_save(&mut self) -> bool {
        let name = self.generate_save_name();
        self.document.saves.push(SaveProfile::new(name.clone()));
        self.current_name = Some(name.clone());

        let saved = self.persist_logged();
        if saved {
            info!(name = %name, "created new save");
        }
        saved
    }

    pub fn load_save(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(index) => {
                self.current_name = Some(self.document.saves[index].player_name.clone());
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&SaveProfile> {
        let name = self.current_name.as_deref()?;
        self.index_of(name).map(|index| &self.document.saves[index])
    }

    pub fn current_save_info(&self) -> Option<SaveSummary> {
        self.current().map(SaveProfile::summary)
    }

    /// Records a finished run on the current profile and writes the file
    pub fn update_save(&mut self, score: u64, coins: u64, character_id: u8) -> bool {
        let Some(index) = self.current_name.as_deref().and_then(|name| self.index_of(name)) else {
            return false;
        };

        let profile = &mut self.document.saves[index];
        profile.games_played += 1;
        profile.total_score += score;

        if let Some(stats) = profile.character_stats.get_mut(&character_id.to_string()) {
            stats.games_played += 1;
            stats.best_score = stats.best_score.max(score);
            stats.total_coins += coins;
        }

        profile.high_score = profile.high_score.max(score);
        profile.total_coins += coins;
        profile.last_played = now_timestamp();
        profile.achievements.record_run(score, coins);

        self.persist_logged()
    }

    pub fn delete_save(&mut self, name: &str) -> bool {
        let Some(index) = self.index_of(name) else {
            return false;
        };

        let removed = self.document.saves.remove(index);
        if self
            .current_name
            .as_deref()
            .is_some_and(|current| removed.matches_name(current))
        {
            self.current_name = None;
        }

        info!(name = %removed.player_name, "deleted save");
        self.persist_logged()
    }

    pub fn clear_all_saves(&mut self) -> bool {
        self.document = SaveDocument::empty();
        self.current_name = None;
        self.persist_logged()
    }

    pub fn all_saves(&self) -> &[SaveProfile] {
        &self.document.saves
    }

    pub fn save_summary(&self, name: &str) -> Option<SaveSummary> {
        self.index_of(name)
            .map(|index| self.document.saves[index].summary())
    }

    pub fn last_updated(&self) -> &str {
        &self.document.last_updated
    }

    /// Top `limit` profiles by high score, ties in list order
    pub fn leaderboard(&self, limit: usize) -> Vec<&SaveProfile> {
        self.top_by(limit, |profile| profile.high_score)
    }

    /// Top `limit` profiles by lifetime coins, ties in list order
    pub fn coins_leaderboard(&self, limit: usize) -> Vec<&SaveProfile> {
        self.top_by(limit, |profile| profile.total_coins)
    }

    fn top_by(&self, limit: usize, key: impl Fn(&SaveProfile) -> u64) -> Vec<&SaveProfile> {
        let mut sorted: Vec<&SaveProfile> = self.document.saves.iter().collect();
        // sort_by is stable
        sorted.sort_by(|a, b| key(b).cmp(&key(a)));
        sorted.truncate(limit);
        sorted
    }
}

/// Writes to a sibling temp file, then renames it over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("saves.json");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    fs::write(&tmp_path, bytes)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}
