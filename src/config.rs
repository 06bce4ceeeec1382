use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::json_store::default_data_dir;

/// Application-level configuration in `<config_dir>/mathdr/config.toml`.
/// Drill settings live in the data directory instead; see [`crate::settings`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_theme() -> String {
    crate::ui::theme::DEFAULT_THEME.to_string()
}
fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}
fn default_log_filter() -> String {
    "mathdr=info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            data_dir: default_data_dir_string(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdr")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Resets `theme` to the default when it names no known theme.
    /// Call after deserialization; themes get renamed between releases.
    pub fn normalize_theme(&mut self, valid_names: &[&str]) {
        if !valid_names.contains(&self.theme.as_str()) {
            self.theme = default_theme();
        }
    }
}
