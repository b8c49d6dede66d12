// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, the TOML config file,
//! `PIDNET_*` environment variables. CLI flags are applied on top by the
//! binary.

use crate::error::{Error, Result};
use crate::types::NetworkFilter;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the PID GTFS archive
pub const DEFAULT_ZIP_URL: &str = "https://data.pid.cz/PID_GTFS.zip";

/// Keys accepted by `pidnet config`
pub const KEYS: [&str; 5] = ["cache_dir", "data_dir", "zip_url", "log_level", "timeout_secs"];

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("cz", "gn-course", "pidnet")
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the downloaded GTFS archive and extracted tables
    pub cache_dir: PathBuf,
    /// Directory for the built network snapshot
    pub data_dir: PathBuf,
    /// Archive location: an http(s) URL or a local path
    pub zip_url: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// HTTP timeout for the archive download, seconds
    pub timeout_secs: u64,
    /// Route and zone selection
    pub filter: NetworkFilter,
}

impl Default for Config {
    fn default() -> Self {
        let dirs = project_dirs();
        Self {
            cache_dir: dirs
                .as_ref()
                .map(|d| d.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("cache")),
            data_dir: dirs
                .as_ref()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".pidnet")),
            zip_url: DEFAULT_ZIP_URL.to_string(),
            log_level: "info".to_string(),
            timeout_secs: 300,
            filter: NetworkFilter::default(),
        }
    }
}

impl Config {
    /// Default config file path (`<config dir>/config.toml`)
    #[must_use]
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("pidnet.toml"))
    }

    /// Read a single key as a display string
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "cache_dir" => Some(self.cache_dir.display().to_string()),
            "data_dir" => Some(self.data_dir.display().to_string()),
            "zip_url" => Some(self.zip_url.clone()),
            "log_level" => Some(self.log_level.clone()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            "filter.route_types" => Some(join(&self.filter.route_types)),
            "filter.zone_ids" => Some(join(&self.filter.zone_ids)),
            _ => None,
        }
    }

    /// Render the full configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Toml(e.to_string()))
    }
}

fn join(set: &std::collections::BTreeSet<String>) -> String {
    set.iter()
        .map(|s| format!("{s:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Load configuration from `path` (or the default path) and the environment
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = path.map_or_else(Config::default_path, Path::to_path_buf);

    let settings = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml).required(false))
        .add_source(config::Environment::with_prefix("PIDNET").try_parsing(true))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Persist `value` under `key` in the TOML file at `path`
///
/// Only top-level scalar keys from [`KEYS`] can be set; the filter sets are
/// edited in the file directly.
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        return Err(Error::Toml(format!(
            "unknown key {key}. Valid: {}",
            KEYS.join(", ")
        )));
    }

    let mut table = if path.exists() {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        content
            .parse::<toml::Table>()
            .map_err(|e| Error::Toml(e.to_string()))?
    } else {
        toml::Table::new()
    };

    let item = if key == "timeout_secs" {
        let secs = value.parse::<i64>().map_err(|_| Error::InvalidField {
            table: "config",
            field: "timeout_secs",
            value: value.to_string(),
        })?;
        toml::Value::Integer(secs)
    } else {
        toml::Value::String(value.to_string())
    };
    table.insert(key.to_string(), item);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let content = toml::to_string_pretty(&table).map_err(|e| Error::Toml(e.to_string()))?;
    fs::write(path, content).map_err(|e| Error::io(path, e))
}
