// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - show, get or set configuration values

use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the config command
///
/// With no key the effective configuration is printed as TOML; with a key
/// its value; with a key and value the value is written to the config file.
pub fn run(path: &Path, effective: &Config, key: Option<&str>, value: Option<&str>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            println!("# {}", path.display());
            print!("{}", effective.to_toml()?);
        }
        (Some(key), None) => {
            let value = effective
                .get(key)
                .ok_or_else(|| anyhow::anyhow!("Unknown config key: {}", key))?;
            println!("{value}");
        }
        (Some(key), Some(value)) => {
            tracing::info!("Setting {} = {}", key, value);
            config::set(path, key, value)
                .with_context(|| format!("Failed to update {}", path.display()))?;
            println!("Set {} = {} in {}", key, value, path.display());
        }
    }
    Ok(())
}
