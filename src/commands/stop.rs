// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stop command - shows the segments around one stop

use super::Output;
use crate::config::Config;
use crate::graph::TransitGraph;
use crate::network::load_or_build;
use crate::types::{Segment, StopNode};
use anyhow::{Context, Result};
use serde_json::json;

/// Run the stop command
pub fn run(config: &Config, name: &str, out: Output) -> Result<()> {
    let graph = load_or_build(config, false).context("Failed to load transit network")?;
    let stop = resolve_stop(&graph, name)?;

    let outgoing = graph.outgoing(&stop.name);
    let incoming = graph.incoming(&stop.name);

    if out.json {
        let value = json!({
            "stop": stop,
            "outgoing": outgoing,
            "incoming": incoming,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", out.bold(&stop.name));
    if let Some(p) = stop.position {
        println!("  position: {:.5}, {:.5}", p.y, p.x);
    }

    println!("  outgoing ({}):", outgoing.len());
    for segment in &outgoing {
        println!("    -> {}", describe(&segment.to, segment, out));
    }
    println!("  incoming ({}):", incoming.len());
    for segment in &incoming {
        println!("    <- {}", describe(&segment.from, segment, out));
    }

    Ok(())
}

fn describe(other: &str, segment: &Segment, out: Output) -> String {
    format!(
        "{}  {:.1} min  {}",
        other,
        segment.avg_time_min,
        out.dim(&format!("line {} ({})", segment.route_short_name, segment.trip_id))
    )
}

/// Resolve an exact or partial stop name to a single stop
fn resolve_stop<'a>(graph: &'a TransitGraph, name: &str) -> Result<&'a StopNode> {
    if let Some(stop) = graph.stop(name) {
        return Ok(stop);
    }

    let matches = graph.search(name);
    match matches.len() {
        0 => anyhow::bail!("No stop found matching: {}", name),
        1 => Ok(matches[0]),
        _ => {
            eprintln!("Multiple stops match '{}':", name);
            for s in &matches {
                eprintln!("  {}", s.name);
            }
            anyhow::bail!("Ambiguous stop name. Use the full name.");
        }
    }
}
