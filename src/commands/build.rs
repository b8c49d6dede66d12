// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Build command - rebuilds the network snapshot from the cached feed

use super::{summary, Output};
use crate::config::Config;
use crate::network::load_or_build;
use anyhow::{Context, Result};

/// Run the build command
pub fn run(config: &Config, out: Output) -> Result<()> {
    let graph = load_or_build(config, true).context("Failed to build transit network")?;

    if !out.json {
        println!("Network saved to {}", config.data_dir.display());
        println!();
    }
    summary::print(&graph.summary(), out)
}
