// Configuration for the tasklist CLI

use crate::file_kv::FileKv;
use crate::filter::FilterMode;
use crate::kv::{KvStore, MemoryKv};
use crate::sqlite_kv::SqliteKv;
use crate::store::DEFAULT_KEY;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.yml";

/// Which [`crate::kv::KvStore`] implementation backs the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl Backend {
    /// Open this backend rooted at `data_dir`
    pub fn open(self, data_dir: &Path) -> Result<Box<dyn KvStore>> {
        let kv: Box<dyn KvStore> = match self {
            Backend::File => Box::new(FileKv::open(data_dir)?),
            Backend::Sqlite => Box::new(SqliteKv::open(data_dir)?),
        };
        Ok(kv)
    }

    /// Open this backend, or fall back to an in-memory store
    ///
    /// With the fallback, commands still run for the session but nothing is
    /// saved.
    pub fn open_or_memory(self, data_dir: &Path) -> Box<dyn KvStore> {
        match self.open(data_dir) {
            Ok(kv) => kv,
            Err(e) => {
                warn!(
                    backend = %self,
                    path = ?data_dir,
                    error = %format!("{:#}", e),
                    "Store unavailable, tasks will not be saved"
                );
                Box::new(MemoryKv::new())
            }
        }
    }
}

/// Settings read from `config.yml`; every field is optional in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend: Backend,
    pub data_dir: Option<PathBuf>,
    pub key: String,
    pub default_filter: FilterMode,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: None,
            key: DEFAULT_KEY.to_string(),
            default_filter: FilterMode::default(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// used when present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = ?path, "Loading config");
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(content)?;
        if config.key.trim().is_empty() {
            return Err(eyre!("Config key cannot be empty"));
        }
        Ok(config)
    }

    /// Directory holding persisted tasks
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".tasklist"))
    }
}

/// `<config dir>/tasklist/config.yml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}
