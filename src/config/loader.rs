//! Configuration file discovery, layering, and loading.
//!
//! Merge order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project config (`.devsetup/config.yml`)
//! 3. Local overrides (`.devsetup/config.local.yml`)
//!
//! Mappings merge recursively, sequences are replaced wholesale, and a
//! `null` in a later layer removes the key so the default applies again.

use crate::config::schema::SetupConfig;
use crate::config::validator::validate;
use crate::error::{Result, SetupError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".devsetup";

/// Configuration files found for a project.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Project config: .devsetup/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .devsetup/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Deep merge two YAML values; `overlay` wins at each conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                } else if let Some(existing) = base_map.get(key) {
                    merged.insert(key.clone(), deep_merge(existing, value));
                } else {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Read and parse one YAML file into an untyped value.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Ok(Value::Mapping(Default::default()));
    }

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| SetupError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match value {
        Value::Null => Ok(Value::Mapping(Default::default())),
        Value::Mapping(_) => Ok(value),
        _ => Err(SetupError::ConfigParseError {
            path: path.to_path_buf(),
            message: "top level must be a mapping".to_string(),
        }),
    }
}

fn into_config(value: Value, origin: &Path) -> Result<SetupConfig> {
    let config: SetupConfig =
        serde_yaml::from_value(value).map_err(|e| SetupError::ConfigParseError {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
    validate(&config)?;
    Ok(config)
}

/// Load a single config file without layering.
///
/// Unlike discovery, a missing file here is an error.
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    if !path.is_file() {
        return Err(SetupError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!("Loading config from {}", path.display());
    into_config(load_config_value(path)?, path)
}

/// Discover and merge project config files on top of the defaults.
///
/// Having no config files at all is fine; the defaults are returned.
pub fn load_merged_config(project_root: &Path) -> Result<SetupConfig> {
    let paths = ConfigPaths::discover(project_root);
    let files = paths.all_existing();

    if files.is_empty() {
        tracing::debug!("No config files found, using defaults");
        return Ok(SetupConfig::default());
    }

    let mut merged = Value::Mapping(Default::default());
    for path in &files {
        tracing::debug!("Merging config from {}", path.display());
        merged = deep_merge(&merged, &load_config_value(path)?);
    }

    into_config(merged, files[files.len() - 1])
}

/// Load config with an optional explicit file.
///
/// An explicit file is read as given, so a relative path resolves
/// against the working directory rather than the project root.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<SetupConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}
