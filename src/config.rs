use crate::persistence::{atomic_write, read_file, EntityStore, JsonStore, SqliteStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Which entity store implementation backs the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite database with `tasks` and `subtasks` tables
    #[default]
    Sqlite,
    /// Single JSON document with nested subtasks
    Json,
}

impl Backend {
    /// File name of the store inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "daylist.db",
            Backend::Json => "tasks.json",
        }
    }
}

/// Settings stored in config.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
}

pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Load config.json, falling back to defaults when it doesn't exist
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = read_file(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    atomic_write(path, &json)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

/// Open the configured store inside `data_dir`
pub fn open_store(data_dir: &Path, backend: Backend) -> Result<Box<dyn EntityStore>> {
    let path = data_dir.join(backend.file_name());
    let store: Box<dyn EntityStore> = match backend {
        Backend::Sqlite => Box::new(
            SqliteStore::open(&path)
                .with_context(|| format!("Failed to open database: {}", path.display()))?,
        ),
        Backend::Json => Box::new(
            JsonStore::open(&path)
                .with_context(|| format!("Failed to open task file: {}", path.display()))?,
        ),
    };
    Ok(store)
}
