//! `TomlStore`: a TOML table optionally backed by a file.

use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use super::ConfigStore;
use crate::error::ConfigError;

/// Key-value configuration held as a flat TOML table.
///
/// A store opened with [`TomlStore::load`] remembers its path and
/// [`ConfigStore::save`] writes the table back there. In-memory stores
/// never touch the filesystem.
#[derive(Debug, Clone, Default)]
pub struct TomlStore {
    path: Option<PathBuf>,
    table: Table,
}

impl TomlStore {
    /// Create an empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create an in-memory store from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        Ok(Self {
            path: None,
            table: toml::from_str(text)?,
        })
    }

    /// Load a store from `path`. A missing file yields an empty store that
    /// will be created on the first save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "Config file missing, starting empty");
            return Ok(Self {
                path: Some(path),
                table: Table::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let table = toml::from_str::<Table>(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path: Some(path),
            table,
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render the current table as TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.table)?)
    }
}

impl ConfigStore for TomlStore {
    fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.table.get(key).and_then(Value::as_bool)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.table
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.table.insert(key.to_string(), Value::Boolean(value));
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.table
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    fn save(&mut self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }
}
