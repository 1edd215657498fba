use crate::error::{PocketError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BIRTHDAY_WINDOW: u32 = 7;
const DEFAULT_SUGGESTION_LIMIT: usize = 3;
const PORTABLE_DATA_DIR: &str = "data";

/// Settings for pocketbook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Days ahead `birthdays` looks when no window is given
    #[serde(default = "default_birthday_window")]
    pub birthday_window_days: u32,

    /// Maximum number of "did you mean" suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Write indented JSON snapshots
    #[serde(default = "default_pretty")]
    pub pretty_snapshots: bool,
}

fn default_birthday_window() -> u32 {
    DEFAULT_BIRTHDAY_WINDOW
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

fn default_pretty() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            birthday_window_days: DEFAULT_BIRTHDAY_WINDOW,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            pretty_snapshots: true,
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PocketError::Io)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(PocketError::Serialization)?;
        Ok(config)
    }
}

/// Where snapshots live when no directory was given explicitly.
///
/// A `data/` directory next to the executable wins (portable installs);
/// otherwise the platform data directory.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(portable) = portable_data_dir() {
        return Ok(portable);
    }
    ProjectDirs::from("com", "pocketbook", "pocketbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PocketError::Api("Could not determine a data directory".to_string()))
}

fn portable_data_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join(PORTABLE_DATA_DIR);
    dir.is_dir().then_some(dir)
}

/// `explicit` if given, else [`default_data_dir`].
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => default_data_dir(),
    }
}
