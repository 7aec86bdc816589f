//! Editing the configuration file without expanding it
//!
//! [`Config`](super::Config) is loaded with `${VAR}` references already
//! expanded, so writing it back would replace every reference with its
//! current value. Profile edits go through [`ConfigDocument`] instead, which
//! keeps the file's unexpanded values and only replaces what it is told to.

use std::fs;
use std::path::Path;
use toml::{Table, Value};

use super::config::Profile;
use super::error::{ConfigError, Result};

const PROFILES: &str = "profiles";
const DEFAULT_PROFILE: &str = "default_profile";

/// The configuration file as written, before environment expansion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    table: Table,
}

impl ConfigDocument {
    /// Read the file; a missing file is an empty document
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(Self {
            table: toml::from_str(&content)?,
        })
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(&self.table)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })
    }

    pub fn default_profile(&self) -> Option<&str> {
        self.table.get(DEFAULT_PROFILE).and_then(Value::as_str)
    }

    pub fn set_default_profile(&mut self, name: &str) {
        self.table
            .insert(DEFAULT_PROFILE.to_string(), Value::String(name.to_string()));
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles().is_some_and(|profiles| profiles.contains_key(name))
    }

    pub fn is_empty(&self) -> bool {
        self.profiles().is_none_or(Table::is_empty)
    }

    /// Replace one profile, leaving every other entry as written
    pub fn set_profile(&mut self, name: &str, profile: &Profile) -> Result<()> {
        let value = Value::try_from(profile)?;
        let profiles = self
            .table
            .entry(PROFILES)
            .or_insert(Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                profile: name.to_string(),
                field: PROFILES.to_string(),
                message: "expected a table of profiles".to_string(),
            })?;
        profiles.insert(name.to_string(), value);
        Ok(())
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove_profile(&mut self, name: &str) -> bool {
        let removed = self
            .table
            .get_mut(PROFILES)
            .and_then(Value::as_table_mut)
            .and_then(|profiles| profiles.remove(name))
            .is_some();
        if self.default_profile() == Some(name) {
            self.table.remove(DEFAULT_PROFILE);
        }
        removed
    }

    fn profiles(&self) -> Option<&Table> {
        self.table.get(PROFILES).and_then(Value::as_table)
    }
}
