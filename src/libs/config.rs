//! Configuration management for kanbo.
//!
//! Settings live in `config.json` inside the data directory (see
//! [`DataStorage`]). Every section is optional; a missing file or section
//! means defaults, so kanbo runs without any setup.
//!
//! ## Configuration Structure
//!
//! ```json
//! {
//!   "store": {
//!     "snapshot_file": "database.json",
//!     "save_interval": 60,
//!     "seed": "sample"
//!   }
//! }
//! ```
//!
//! - **snapshot_file**: relative paths resolve against the data directory
//! - **save_interval**: seconds between scheduled snapshots
//! - **seed**: board used when no snapshot can be restored (`sample` or `empty`)

use super::data_storage::DataStorage;
use super::scheduler::DEFAULT_SAVE_INTERVAL;
use super::seed::Seed;
use super::snapshot::SNAPSHOT_FILE_NAME;
use super::store::TaskStore;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Task store settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Snapshot file; relative paths resolve against the data directory.
    pub snapshot_file: PathBuf,

    /// Seconds between scheduled snapshot attempts.
    pub save_interval: u64,

    /// Board contents used when there is no snapshot to restore.
    pub seed: Seed,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            snapshot_file: PathBuf::from(SNAPSHOT_FILE_NAME),
            save_interval: DEFAULT_SAVE_INTERVAL.as_secs(),
            seed: Seed::default(),
        }
    }
}

impl StoreConfig {
    /// Save period; never shorter than one second.
    pub fn save_period(&self) -> Duration {
        Duration::from_secs(self.save_interval.max(1))
    }

    pub fn snapshot_path(&self, storage: &DataStorage) -> Result<PathBuf> {
        storage.resolve(&self.snapshot_file)
    }

    /// Opens the store at the configured snapshot path.
    pub fn open_store(&self, storage: &DataStorage) -> Result<TaskStore> {
        let path = self.snapshot_path(storage)?;
        Ok(TaskStore::open(path, self.seed))
    }
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Task store settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
}

impl Config {
    /// Reads configuration from the default data directory.
    ///
    /// Returns defaults when no configuration file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(&config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)
            .with_context(|| format!("{}: {}", Message::ConfigParseError, config_file_path.display()))?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON to the default data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Store settings, falling back to defaults when the section is absent.
    pub fn store(&self) -> StoreConfig {
        self.store.clone().unwrap_or_default()
    }

    /// Runs an interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.store();

        msg_print!(Message::ConfigModuleStore);

        let snapshot_file: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSnapshotFile.to_string())
            .default(default.snapshot_file.display().to_string())
            .interact_text()?;

        let save_interval: u64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSaveInterval.to_string())
            .default(default.save_interval)
            .interact_text()?;

        let seeds = [Seed::Sample, Seed::Empty];
        let seed_index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSeed.to_string())
            .items(&["sample", "empty"])
            .default(if default.seed == Seed::Empty { 1 } else { 0 })
            .interact()?;

        config.store = Some(StoreConfig {
            snapshot_file: PathBuf::from(snapshot_file),
            save_interval,
            seed: seeds[seed_index],
        });

        Ok(config)
    }
}
