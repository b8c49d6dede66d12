// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Network loader tying the cache, the feed and the graph together

use crate::cache::{DatasetCache, DatasetSource, FetchOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::graph::TransitGraph;
use crate::gtfs::Feed;
use std::time::Duration;
use tracing::{debug, info};

/// PID metro and tram network with the tables it was built from
pub struct PidNetwork {
    /// Raw GTFS tables
    pub feed: Feed,
    /// Stop graph
    pub graph: TransitGraph,
}

impl PidNetwork {
    /// Ensure the cache, read the feed and build the graph
    pub fn open(config: &Config) -> Result<Self> {
        let cache = dataset_cache(config);
        cache.ensure(false)?;

        let feed = Feed::load(cache.dir())?;
        let mut graph = TransitGraph::build(&feed, &config.filter)?;
        graph.set_source_sha256(cache.manifest()?.map(|m| m.sha256));

        Ok(Self { feed, graph })
    }
}

/// Cache handle for a configuration
#[must_use]
pub fn dataset_cache(config: &Config) -> DatasetCache {
    DatasetCache::new(&config.cache_dir, DatasetSource::parse(&config.zip_url))
        .with_timeout(Duration::from_secs(config.timeout_secs))
}

/// Reuse the saved network when it matches the cached archive, else rebuild
///
/// A snapshot matches when its archive hash equals the one in the cache
/// manifest and it was built with the configured filter. Caches without a manifest (tables placed by hand) always
/// rebuild, as does `force`.
pub fn load_or_build(config: &Config, force: bool) -> Result<TransitGraph> {
    let cache = dataset_cache(config);
    let outcome = cache.ensure(false)?;
    let current = cache.manifest()?.map(|m| m.sha256);

    if !force && outcome == FetchOutcome::Cached && current.is_some() {
        if let Some(graph) = TransitGraph::load(&config.data_dir)? {
            if graph.source_sha256() == current.as_deref()
                && graph.filter() == Some(&config.filter)
            {
                debug!("Reusing network snapshot");
                return Ok(graph);
            }
        }
    }

    info!("Building transit network");
    let feed = Feed::load(cache.dir())?;
    let mut graph = TransitGraph::build(&feed, &config.filter)?;
    graph.set_source_sha256(current);
    graph.save(&config.data_dir)?;
    info!(
        "Network saved to {} ({} stops, {} segments)",
        config.data_dir.display(),
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}
