// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Setup command - prints the course environment checklist

use super::Output;
use crate::guide::{self, SetupPath};
use anyhow::Result;

/// Run the setup command
pub fn run(venv: bool, out: Output) -> Result<()> {
    let path = if venv { SetupPath::Venv } else { SetupPath::Uv };
    let steps = guide::steps(path);

    if out.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    println!("{}", out.bold("GN course environment setup"));
    println!();
    print!("{}", guide::render(&steps));
    Ok(())
}
