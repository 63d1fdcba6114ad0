use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::game::Cup;

pub const CONFIG_FILE_NAME: &str = "cup-memory.json";
const LOGO_FILE_NAME: &str = "cupmemorytext.png";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub high_score_path: PathBuf,
    pub image_dir: PathBuf,
    pub reveal_ms: u64,
    pub shuffle_interval_ms: u64,
    pub shuffle_passes: u32,
    pub tick_ms: u64,
    pub click_bump_ms: u64,
    pub star_flash_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            high_score_path: PathBuf::from("highscore.txt"),
            image_dir: PathBuf::from("images"),
            reveal_ms: 3000,
            shuffle_interval_ms: 100,
            shuffle_passes: 5,
            tick_ms: 1000,
            click_bump_ms: 100,
            star_flash_ms: 500,
        }
    }
}

impl GameConfig {
    pub fn cup_image_path(&self, cup: Cup) -> PathBuf {
        self.image_dir.join(cup.image_file())
    }

    pub fn logo_path(&self) -> PathBuf {
        self.image_dir.join(LOGO_FILE_NAME)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn shuffle_interval(&self) -> Duration {
        Duration::from_millis(self.shuffle_interval_ms.max(1))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn click_bump(&self) -> Duration {
        Duration::from_millis(self.click_bump_ms)
    }

    pub fn star_flash_interval(&self) -> Duration {
        Duration::from_millis(self.star_flash_ms.max(1))
    }
}

/// A missing file is not an error: it yields the defaults.
pub fn load_from(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(GameConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load() -> GameConfig {
    match load_from(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => {
            tracing::debug!(?config, "settings loaded");
            config
        }
        Err(err) => {
            tracing::warn!(%err, "falling back to default settings");
            GameConfig::default()
        }
    }
}
