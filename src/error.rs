// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Library error type

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while caching, reading or building the transit network
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure on a specific path
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// HTTP download failed
    #[error("failed to download {url}: {source}")]
    Download {
        /// Requested URL
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// The dataset archive could not be opened or read
    #[error("invalid archive {}: {source}", .path.display())]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: zip::result::ZipError,
    },

    /// A required GTFS table is absent from the archive
    #[error("missing required file in ZIP: {0}")]
    MissingArchiveMember(String),

    /// A GTFS table could not be parsed
    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        /// Table path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// A GTFS field holds a value that cannot be interpreted
    #[error("invalid {field} in {table}: {value:?}")]
    InvalidField {
        /// Table name, e.g. `stop_times.txt`
        table: &'static str,
        /// Column name
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML (de)serialization failure
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration layering failure
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, Error>;
