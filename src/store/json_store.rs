use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::engine::stats::SkillKey;
use crate::settings::Settings;
use crate::store::schema::{SESSION_FILE, SETTINGS_FILE, SessionData};

/// Flat-file JSON persistence rooted at one data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing files are `None` quietly; unreadable or malformed ones are
    /// `None` with a log line. Never an error.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.file_path(name);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read store file");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed store file");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_session<K: SkillKey>(&self) -> Option<SessionData<K>> {
        self.load(SESSION_FILE)
    }

    pub fn save_session<K: SkillKey>(&self, data: &SessionData<K>) -> Result<()> {
        self.save(SESSION_FILE, data)
    }

    pub fn load_settings(&self) -> Option<Settings> {
        self.load(SETTINGS_FILE)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save(SETTINGS_FILE, settings)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mathdr")
}
