//! Resolve-or-default asset lookup
//!
//! Each drawable kind has a list of candidate files and a deterministic
//! placeholder colour. Resolution picks the first candidate that exists under
//! the asset root and otherwise hands back the placeholder, so a missing image
//! is a log line, never a failed tick.

use crate::player::Character;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Plain RGB colour, converted to the graphics library's colour type by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Background,
    ShootPose,
    Obstacle,
    Coin,
    Monster,
    Boss,
    Bullet,
}

impl AssetKind {
    pub fn all() -> [AssetKind; 7] {
        [
            AssetKind::Background,
            AssetKind::ShootPose,
            AssetKind::Obstacle,
            AssetKind::Coin,
            AssetKind::Monster,
            AssetKind::Boss,
            AssetKind::Bullet,
        ]
    }

    /// Paths tried in order, relative to the asset root
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Background => &["image/background.png", "image/background.jpg"],
            AssetKind::ShootPose => &["image/shoot.png"],
            AssetKind::Obstacle => &["image/ob1.png", "image/ob2.png", "image/ob3.png"],
            AssetKind::Coin => &["image/coin.png"],
            AssetKind::Monster => &["assets/sheep.png", "image/sheep.png"],
            AssetKind::Boss => &["assets/boss.png", "image/boss.png"],
            AssetKind::Bullet => &["image/player_bullet.png"],
        }
    }

    pub fn placeholder(&self) -> Rgb {
        match self {
            AssetKind::Background => Rgb(200, 230, 255),
            AssetKind::ShootPose => Rgb(100, 150, 255),
            AssetKind::Obstacle => Rgb(200, 50, 50),
            AssetKind::Coin => Rgb(255, 215, 0),
            AssetKind::Monster => Rgb(240, 240, 240),
            AssetKind::Boss => Rgb(200, 100, 100),
            AssetKind::Bullet => Rgb(255, 240, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    Image(PathBuf),
    Placeholder(Rgb),
}

const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl AsRef<Path>) -> Self {
        AssetResolver {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, kind: AssetKind) -> ResolvedAsset {
        for candidate in kind.candidates() {
            let path = self.root.join(candidate);
            if path.is_file() {
                debug!(?kind, path = %path.display(), "asset resolved");
                return ResolvedAsset::Image(path);
            }
        }

        warn!(?kind, "asset missing, using placeholder");
        ResolvedAsset::Placeholder(kind.placeholder())
    }

    /// Sorted animation frames for a character, empty when the folder is missing
    pub fn player_frames(&self, character: Character) -> Vec<PathBuf> {
        let folder = self.root.join(format!("frames/character_{}", character.id()));

        let entries = match std::fs::read_dir(&folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "no animation frames, using placeholder");
                return Vec::new();
            }
        };

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();

        frames.sort();
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_asset_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = AssetResolver::new(dir.path());

        assert_eq!(
            resolver.resolve(AssetKind::Coin),
            ResolvedAsset::Placeholder(Rgb(255, 215, 0))
        );
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("image")).unwrap();
        fs::write(dir.path().join("image/ob2.png"), b"png").unwrap();
        fs::write(dir.path().join("image/ob3.png"), b"png").unwrap();

        let resolver = AssetResolver::new(dir.path());
        assert_eq!(
            resolver.resolve(AssetKind::Obstacle),
            ResolvedAsset::Image(dir.path().join("image/ob2.png"))
        );
    }

    #[test]
    fn test_player_frames_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("frames/character_2");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("frame_2.png"), b"x").unwrap();
        fs::write(folder.join("frame_1.PNG"), b"x").unwrap();
        fs::write(folder.join("notes.txt"), b"x").unwrap();

        let resolver = AssetResolver::new(dir.path());
        let frames = resolver.player_frames(Character::Double);

        assert_eq!(frames, vec![folder.join("frame_1.PNG"), folder.join("frame_2.png")]);
        assert!(resolver.player_frames(Character::Single).is_empty());
    }
}
