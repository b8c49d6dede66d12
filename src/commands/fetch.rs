// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fetch command - makes sure the GTFS tables are cached

use super::Output;
use crate::cache::FetchOutcome;
use crate::config::Config;
use crate::network::dataset_cache;
use anyhow::{Context, Result};
use serde_json::json;

/// Run the fetch command
pub fn run(config: &Config, force: bool, out: Output) -> Result<()> {
    let cache = dataset_cache(config);
    let outcome = cache
        .ensure(force)
        .with_context(|| format!("Failed to populate cache in {}", cache.dir().display()))?;
    let manifest = cache.manifest()?;

    if out.json {
        let value = json!({
            "cache_dir": cache.dir(),
            "fetched": matches!(outcome, FetchOutcome::Fetched(_)),
            "manifest": manifest,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match outcome {
        FetchOutcome::Cached => println!("Using cached GTFS tables in {}", cache.dir().display()),
        FetchOutcome::Fetched(_) => println!("Fetched GTFS tables into {}", cache.dir().display()),
    }
    if let Some(m) = manifest {
        println!("  source:  {}", m.source);
        println!("  sha256:  {}", out.dim(&m.sha256));
        println!("  fetched: {}", m.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}
