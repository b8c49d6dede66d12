// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Summary command

use super::Output;
use crate::config::Config;
use crate::network::load_or_build;
use crate::types::NetworkSummary;
use anyhow::{Context, Result};

/// Run the summary command
pub fn run(config: &Config, out: Output) -> Result<()> {
    let graph = load_or_build(config, false).context("Failed to load transit network")?;
    if graph.is_empty() {
        eprintln!("Warning: network is empty. Check the route and zone filters.");
    }
    print(&graph.summary(), out)
}

/// Print a summary as text or JSON
pub fn print(summary: &NetworkSummary, out: Output) -> Result<()> {
    if out.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("{}", out.bold("PID metro + tram network"));
    println!("  stops:                  {}", summary.stops);
    println!("  segments:               {}", summary.segments);
    println!("  stop pairs:             {}", summary.stop_pairs);
    println!("  routes:                 {}", summary.routes);
    println!("  self-loops:             {}", summary.self_loops);
    println!("  stops without position: {}", summary.stops_without_position);
    match summary.mean_avg_time_min {
        Some(mean) => println!("  mean segment time:      {mean:.2} min"),
        None => println!("  mean segment time:      -"),
    }

    Ok(())
}
