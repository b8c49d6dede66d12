// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stops command - lists stop nodes with their degree

use super::Output;
use crate::config::Config;
use crate::network::load_or_build;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct StopRow<'a> {
    name: &'a str,
    out_degree: usize,
    in_degree: usize,
    x: Option<f64>,
    y: Option<f64>,
}

/// Run the stops command
pub fn run(config: &Config, search: Option<String>, out: Output) -> Result<()> {
    let graph = load_or_build(config, false).context("Failed to load transit network")?;

    let stops = match search.as_deref() {
        Some(text) => graph.search(text),
        None => graph.stops().iter().collect(),
    };

    let rows: Vec<StopRow<'_>> = stops
        .iter()
        .map(|s| StopRow {
            name: &s.name,
            out_degree: graph.outgoing(&s.name).len(),
            in_degree: graph.incoming(&s.name).len(),
            x: s.position.map(|p| p.x),
            y: s.position.map(|p| p.y),
        })
        .collect();

    if out.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No stops found.");
        return Ok(());
    }

    println!("Stops ({}):", rows.len());
    for row in &rows {
        let position = match (row.x, row.y) {
            (Some(x), Some(y)) => format!("{y:.5}, {x:.5}"),
            _ => "no position".to_string(),
        };
        println!(
            "  {}  out {} / in {}  {}",
            out.bold(row.name),
            row.out_degree,
            row.in_degree,
            out.dim(&position)
        );
    }

    Ok(())
}
