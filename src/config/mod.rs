use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::PathBuf,
    time::Duration,
};

use crate::errors::ConfigError;
use crate::utils::paths::{self, ensure_dir, write_atomic};

const DEFAULT_PAUSE_MS: u64 = 1600;
const DEFAULT_DATA_FILE: &str = "catalog.json";
const PAUSE_ENV: &str = "BOOKSTORE_PAUSE_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay after an error or cancel notice, in milliseconds.
    pub pause_ms: u64,
    pub data_file: String,
    pub plain_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pause_ms: DEFAULT_PAUSE_MS,
            data_file: DEFAULT_DATA_FILE.into(),
            plain_mode: false,
        }
    }
}

impl Config {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Applies `BOOKSTORE_PAUSE_MS` when it holds a valid number.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = env::var(PAUSE_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
        {
            self.pause_ms = ms;
        }
        self
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn data_path(&self, config: &Config) -> PathBuf {
        self.base.join(&config.data_file)
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Loads the settings, writing the defaults on first run so the file
    /// exists for hand edits.
    pub fn load_or_create(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            return self.load();
        }
        let config = Config::default();
        self.save(&config)?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}
