// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Local cache of the PID GTFS dataset
//!
//! The archive is fetched once, the four tables the network needs are
//! extracted next to it, and a manifest records where it came from.

use crate::error::{Error, Result};
use crate::gtfs::REQUIRED_FILES;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// File name of the cached archive
pub const ARCHIVE_NAME: &str = "PID_GTFS.zip";

/// File name of the cache manifest
pub const MANIFEST_NAME: &str = "manifest.json";

/// Where the archive is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// HTTP(S) URL
    Remote(String),
    /// Archive already on disk
    Local(PathBuf),
}

impl DatasetSource {
    /// Classify a configured location
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Remote(location.to_string())
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            Self::Local(PathBuf::from(path))
        }
    }

    /// Display form used in logs and the manifest
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// Record of the last successful fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Archive location the tables came from
    pub source: String,
    /// SHA-256 of the archive, hex encoded
    pub sha256: String,
    /// When the archive was fetched
    pub fetched_at: DateTime<Utc>,
    /// Tables extracted from the archive
    pub files: Vec<String>,
}

/// Result of [`DatasetCache::ensure`]
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Every required table was already present
    Cached,
    /// The archive was fetched and extracted
    Fetched(CacheManifest),
}

/// GTFS cache rooted at a directory
#[derive(Debug, Clone)]
pub struct DatasetCache {
    dir: PathBuf,
    source: DatasetSource,
    timeout: Duration,
}

impl DatasetCache {
    /// Create a cache handle; nothing touches the disk until [`Self::ensure`]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, source: DatasetSource) -> Self {
        Self {
            dir: dir.into(),
            source,
            timeout: Duration::from_secs(300),
        }
    }

    /// Override the download timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cache directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a file inside the cache
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Required tables not yet on disk
    #[must_use]
    pub fn missing_files(&self) -> Vec<&'static str> {
        REQUIRED_FILES
            .iter()
            .copied()
            .filter(|name| !self.file_path(name).exists())
            .collect()
    }

    /// Read the manifest of the last fetch, if any
    pub fn manifest(&self) -> Result<Option<CacheManifest>> {
        let path = self.file_path(MANIFEST_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Make sure every required table is cached, fetching the archive if not
    ///
    /// With `force`, the archive is fetched even when the tables exist.
    pub fn ensure(&self, force: bool) -> Result<FetchOutcome> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let missing = self.missing_files();
        if missing.is_empty() && !force {
            info!("Using cached PID GTFS files");
            return Ok(FetchOutcome::Cached);
        }
        debug!(?missing, force, "Cache incomplete");

        info!("Downloading PID GTFS dataset from {}", self.source.describe());
        let archive = self.file_path(ARCHIVE_NAME);
        self.fetch_archive(&archive)?;

        info!("Extracting required GTFS files");
        extract_required(&archive, &self.dir)?;

        let manifest = CacheManifest {
            source: self.source.describe(),
            sha256: sha256_file(&archive)?,
            fetched_at: Utc::now(),
            files: REQUIRED_FILES.iter().map(|s| (*s).to_string()).collect(),
        };
        let manifest_path = self.file_path(MANIFEST_NAME);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .map_err(|e| Error::io(&manifest_path, e))?;

        info!("Dataset cached");
        Ok(FetchOutcome::Fetched(manifest))
    }

    /// Fetch the archive to `<archive>.tmp`, then rename it into place
    fn fetch_archive(&self, archive: &Path) -> Result<()> {
        let tmp = archive.with_extension("zip.tmp");

        let result = match &self.source {
            DatasetSource::Remote(url) => self.download(url, &tmp),
            DatasetSource::Local(path) => fs::copy(path, &tmp)
                .map(|_| ())
                .map_err(|e| Error::io(path, e)),
        };
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        fs::rename(&tmp, archive).map_err(|e| Error::io(archive, e))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let download_err = |source| Error::Download {
            url: url.to_string(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("pidnet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(download_err)?;

        let mut response = client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(download_err)?;

        let mut file = File::create(dest).map_err(|e| Error::io(dest, e))?;
        let bytes = response.copy_to(&mut file).map_err(download_err)?;
        debug!(bytes, "Download complete");
        Ok(())
    }
}

/// Extract the required GTFS tables from `archive` into `dest`
///
/// Fails on the first required table the archive does not contain; other
/// archive members are left alone.
pub fn extract_required(archive: &Path, dest: &Path) -> Result<()> {
    let archive_err = |source| Error::Archive {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(archive_err)?;

    let available: Vec<String> = zip.file_names().map(str::to_string).collect();
    for name in REQUIRED_FILES {
        if !available.iter().any(|n| n == name) {
            return Err(Error::MissingArchiveMember(name.to_string()));
        }

        let mut entry = zip.by_name(name).map_err(archive_err)?;
        let out_path = dest.join(name);
        let mut out = File::create(&out_path).map_err(|e| Error::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| Error::io(&out_path, e))?;
        debug!(file = name, "Extracted");
    }

    Ok(())
}

/// Hex SHA-256 of a file's contents
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}
