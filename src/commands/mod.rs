// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod export;
pub mod fetch;
pub mod setup;
pub mod stop;
pub mod stops;
pub mod summary;

use owo_colors::OwoColorize;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print JSON instead of text
    pub json: bool,
    /// Allow ANSI colors in text output
    pub color: bool,
}

impl Output {
    /// Emphasize a heading or name
    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// De-emphasize secondary details
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
