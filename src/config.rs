use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::storage::{JsonFileSlot, SnapshotSlot, SqliteSlot};

pub const DEFAULT_STORAGE_KEY: &str = "moodbloom-storage";
const SQLITE_FILE_NAME: &str = "moodbloom.sqlite3";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One `<storage_key>.json` file.
    #[default]
    Json,
    /// A row keyed by `storage_key` in `moodbloom.sqlite3`.
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub backend: Backend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            backend: Backend::default(),
        }
    }
}

impl StoreConfig {
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("moodbloom")
    }

    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("moodbloom")
            .join("moodbloom.toml")
    }

    /// Configuration rooted at `data_dir`, everything else default.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_config_path())
    }

    /// Load configuration from a specific path, writing defaults there if the
    /// file does not exist yet.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        debug!("Loading store configuration from {:?}", config_path);

        if !config_path.exists() {
            info!(
                "Configuration file not found at {:?}, creating default configuration",
                config_path
            );
            let default_config = Self::default();
            default_config.save_to_path(config_path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: StoreConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        info!("Loaded store configuration from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        debug!("Saved store configuration to {:?}", config_path);
        Ok(())
    }

    /// Where the configured backend keeps its data.
    pub fn snapshot_path(&self) -> PathBuf {
        match self.backend {
            Backend::Json => self.data_dir.join(format!("{}.json", self.storage_key)),
            Backend::Sqlite => self.data_dir.join(SQLITE_FILE_NAME),
        }
    }

    /// Builds the configured snapshot slot.
    pub fn open_slot(&self) -> Result<Box<dyn SnapshotSlot>> {
        match self.backend {
            Backend::Json => Ok(Box::new(JsonFileSlot::in_dir(
                &self.data_dir,
                &self.storage_key,
            ))),
            Backend::Sqlite => {
                let slot = SqliteSlot::open(self.snapshot_path(), self.storage_key.clone())?;
                Ok(Box::new(slot))
            }
        }
    }
}
