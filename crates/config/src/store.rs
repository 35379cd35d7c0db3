//! JSON file persistence for settings

use crate::{Error, Result};
use frontdate_core::ConfigStore;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory inside the vault that holds frontdate state
pub const STATE_DIR: &str = ".frontdate";

/// Settings file name inside [`STATE_DIR`]
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings persisted as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location inside a vault
    pub fn for_vault(vault_root: &Path) -> Self {
        Self::new(vault_root.join(STATE_DIR).join(SETTINGS_FILE))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Settings(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&content).map_err(|e| {
            Error::Settings(format!("Failed to parse {}: {e}", self.path.display()))
        })?;

        Ok(Some(value))
    }

    fn save(&self, value: &Value) -> Result<()> {
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| Error::Settings(format!("Failed to serialize settings: {e}")))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Settings(format!(
                    "Failed to create settings directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(&self.path, content + "\n").map_err(|e| {
            Error::Settings(format!("Failed to write {}: {e}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}
