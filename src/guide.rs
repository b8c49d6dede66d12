// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Course environment setup checklist
//!
//! The commands are printed for the reader to type; nothing here runs them.

use serde::Serialize;
use std::fmt::Write as _;

/// Jupyter kernel name registered for the course
pub const KERNEL_NAME: &str = "gn-course";

/// Display name of the course kernel in notebook interfaces
pub const KERNEL_DISPLAY_NAME: &str = "Python (GN Course)";

/// Directory holding the notebook used to check the kernel
pub const DEMO_DIR: &str = "00/";

/// How the Python environment is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupPath {
    /// `uv` manages the environment from the lockfile
    Uv,
    /// Plain `venv` + `pip`, for machines where `uv` cannot be installed
    Venv,
}

/// One checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupStep {
    /// What the step achieves
    pub title: &'static str,
    /// Commands to type, in order
    pub commands: Vec<String>,
    /// Extra advice shown under the commands
    pub note: Option<&'static str>,
}

impl SetupStep {
    fn new(title: &'static str, commands: &[&str]) -> Self {
        Self {
            title,
            commands: commands.iter().map(|c| (*c).to_string()).collect(),
            note: None,
        }
    }

    fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

/// Kernel registration command with the course's fixed arguments
#[must_use]
pub fn kernel_install_command(python: &str) -> String {
    format!(
        "{python} -m ipykernel install --user --name={KERNEL_NAME} --display-name \"{KERNEL_DISPLAY_NAME}\""
    )
}

/// Ordered setup steps for the chosen path
#[must_use]
pub fn steps(path: SetupPath) -> Vec<SetupStep> {
    let mut steps = Vec::with_capacity(4);

    match path {
        SetupPath::Uv => {
            steps.push(
                SetupStep::new("Create the environment and install dependencies", &["uv sync"])
                    .with_note("If uv cannot be installed, use the venv + pip path (--venv)."),
            );
            steps.push(SetupStep::new(
                "Register the Jupyter kernel",
                &[kernel_install_command("uv run python").as_str()],
            ));
            steps.push(
                SetupStep::new(
                    "Launch a notebook interface",
                    &["uv run jupyter lab", "uv run jupyter notebook"],
                )
                .with_note("Either interface works; pick one."),
            );
        }
        SetupPath::Venv => {
            steps.push(
                SetupStep::new(
                    "Create the environment and install dependencies",
                    &[
                        "python -m venv .venv",
                        "source .venv/bin/activate",
                        "pip install -r requirements.txt",
                    ],
                )
                .with_note("On Windows activate with .venv\\Scripts\\activate."),
            );
            steps.push(SetupStep::new(
                "Register the Jupyter kernel",
                &[kernel_install_command("python").as_str()],
            ));
            steps.push(
                SetupStep::new("Launch a notebook interface", &["jupyter lab", "jupyter notebook"])
                    .with_note("Either interface works; pick one."),
            );
        }
    }

    steps.push(
        SetupStep::new("Check the kernel", &[])
            .with_note("Open the demo notebook in 00/ and run it with the \"Python (GN Course)\" kernel."),
    );

    steps
}

/// Numbered, human-readable checklist
#[must_use]
pub fn render(steps: &[SetupStep]) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, step.title);
        for command in &step.commands {
            let _ = writeln!(out, "     $ {command}");
        }
        if let Some(note) = step.note {
            let _ = writeln!(out, "     {note}");
        }
    }
    out
}
