//! Settings loaded from an optional TOML file; CLI flags are applied on top.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "hangterm.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Word list, one word per line
    pub words: Option<PathBuf>,
    pub fps: u32,
    /// Fixed RNG seed for reproducible word picks
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            words: None,
            fps: 60,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    /// Use the terminal bell instead of sound files
    pub bell: bool,
    pub volume: f32,
    pub dir: PathBuf,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: false,
            volume: 1.0,
            dir: PathBuf::from("assets/sounds"),
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config")
    }

    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}
