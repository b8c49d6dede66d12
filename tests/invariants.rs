// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the transit network build
//!
//! These tests verify critical invariants:
//! 1. Selection - representative trips, route types and zones
//! 2. Weights - pair-wide averages, skipped and negative times
//! 3. Determinism - same feed produces the same network
//! 4. Snapshot reuse - a saved network is only reused for the same archive
//!    and filter

mod common;

use pidnet::cache::{DatasetCache, DatasetSource, FetchOutcome};
use pidnet::config::Config;
use pidnet::graph::TransitGraph;
use pidnet::gtfs::{parse_gtfs_time, Feed};
use pidnet::network::{load_or_build, PidNetwork};
use pidnet::types::{NetworkFilter, Position};
use proptest::prelude::*;
use std::collections::BTreeSet;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

fn fixture_feed() -> (TempDir, Feed) {
    let dir = TempDir::new().unwrap();
    common::write_feed(dir.path());
    let feed = Feed::load(dir.path()).unwrap();
    (dir, feed)
}

fn build_default() -> TransitGraph {
    let (_dir, feed) = fixture_feed();
    TransitGraph::build(&feed, &NetworkFilter::default()).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn config_for(root: &TempDir) -> Config {
    let archive = root.path().join("PID_GTFS_src.zip");
    common::write_archive(&archive);
    Config {
        cache_dir: root.path().join("cache"),
        data_dir: root.path().join("data"),
        zip_url: archive.display().to_string(),
        ..Config::default()
    }
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_fixture_shape() {
    let network = build_default();

    let names: Vec<_> = network.stops().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Muzeum", "Můstek", "Staroměstská", "Národní divadlo"]);
    assert_eq!(network.edge_count(), 8);
}

#[test]
fn test_first_trip_in_file_order_is_representative() {
    let (_dir, feed) = fixture_feed();
    let filter = NetworkFilter {
        route_types: BTreeSet::from(["1".to_string()]),
        ..NetworkFilter::default()
    };

    let network = TransitGraph::build(&feed, &filter).unwrap();

    // 991_1 would give 10 minutes; 991_2 comes first in trips.txt
    assert_eq!(network.average_time("Muzeum", "Můstek"), Some(1.5));
    assert!(network.segments().iter().all(|s| s.trip_id != "991_1"));
}

#[test]
fn test_route_type_filter() {
    let (_dir, feed) = fixture_feed();
    let filter = NetworkFilter {
        route_types: BTreeSet::from(["1".to_string()]),
        ..NetworkFilter::default()
    };

    let network = TransitGraph::build(&feed, &filter).unwrap();

    assert_eq!(network.node_count(), 3);
    assert_eq!(network.edge_count(), 4);
    assert!(network.segments().iter().all(|s| s.route_id == "L991"));
}

#[test]
fn test_bus_only_stop_is_absent() {
    let network = build_default();
    assert!(!network.contains_stop("Letiště"));
    assert!(network.segments().iter().all(|s| s.route_id != "L119"));
}

#[test]
fn test_out_of_zone_stop_is_bridged() {
    let network = build_default();

    assert!(!network.contains_stop("Kladno"));
    let bridged = network.segments_between("Staroměstská", "Národní divadlo");
    assert_eq!(bridged.len(), 1);
    assert!(approx(bridged[0].avg_time_min, 6.0));
}

#[test]
fn test_platforms_collapse_into_one_stop() {
    let network = build_default();

    // U1Z101P and U1Z102P are both "Muzeum"
    let incoming = network.incoming("Muzeum");
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].from, "Můstek");
}

// =============================================================================
// Weights
// =============================================================================

#[test]
fn test_average_is_shared_by_parallel_edges() {
    let network = build_default();

    let parallel = network.segments_between("Muzeum", "Můstek");
    assert_eq!(parallel.len(), 2);
    // (1.5 from metro A + 2.5 from tram 17) / 2
    assert!(parallel.iter().all(|s| approx(s.avg_time_min, 2.0)));

    let lines: BTreeSet<_> = parallel.iter().map(|s| s.route_short_name.as_str()).collect();
    assert_eq!(lines, BTreeSet::from(["17", "A"]));
}

#[test]
fn test_negative_time_is_ignored_but_edge_kept() {
    let network = build_default();

    // Tram 17 runs Můstek -> Staroměstská "backwards in time"; only metro A counts
    let parallel = network.segments_between("Můstek", "Staroměstská");
    assert_eq!(parallel.len(), 2);
    assert!(parallel.iter().all(|s| approx(s.avg_time_min, 2.0)));
}

#[test]
fn test_pair_without_valid_time_has_no_edge() {
    let network = build_default();

    // The only Národní divadlo -> Můstek call lacks an arrival time
    assert!(network.segments_between("Národní divadlo", "Můstek").is_empty());
    assert_eq!(network.average_time("Národní divadlo", "Můstek"), None);
}

#[test]
fn test_self_loop_kept() {
    let network = build_default();

    let loops: Vec<_> = network.segments().iter().filter(|s| s.is_loop()).collect();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].from, "Národní divadlo");
    assert!(approx(loops[0].avg_time_min, 2.0));
}

#[test]
fn test_first_usable_position_wins() {
    let network = build_default();

    let muzeum = network.stop("Muzeum").and_then(|s| s.position);
    assert_eq!(muzeum, Some(Position { x: 14.4305, y: 50.0790 }));

    // First Staroměstská platform has no latitude
    let staromestska = network.stop("Staroměstská").and_then(|s| s.position);
    assert_eq!(staromestska, Some(Position { x: 14.4175, y: 50.0880 }));
}

#[test]
fn test_summary() {
    let summary = build_default().summary();

    assert_eq!(summary.stops, 4);
    assert_eq!(summary.segments, 8);
    assert_eq!(summary.stop_pairs, 6);
    assert_eq!(summary.routes, 3);
    assert_eq!(summary.self_loops, 1);
    assert_eq!(summary.stops_without_position, 0);
    assert!(approx(summary.mean_avg_time_min.unwrap(), 2.75));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_build_is_deterministic() {
    let first = build_default().to_json().unwrap();
    let second = build_default().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_snapshot_roundtrip() {
    let network = build_default();
    let dir = TempDir::new().unwrap();

    network.save(dir.path()).unwrap();
    let restored = TransitGraph::load(dir.path()).unwrap().unwrap();

    assert_eq!(restored.stops(), network.stops());
    assert_eq!(restored.segments(), network.segments());
    assert_eq!(restored.outgoing("Můstek").len(), network.outgoing("Můstek").len());
}

#[test]
fn test_load_missing_snapshot() {
    let dir = TempDir::new().unwrap();
    assert!(TransitGraph::load(dir.path()).unwrap().is_none());
}

proptest! {
    #[test]
    fn prop_gtfs_time_roundtrip(h in 0u32..48, m in 0u32..60, s in 0u32..60) {
        let text = format!("{h:02}:{m:02}:{s:02}");
        prop_assert_eq!(parse_gtfs_time(&text), Some(h * 3600 + m * 60 + s));
    }

    #[test]
    fn prop_gtfs_time_never_panics(text in "\\PC*") {
        let _ = parse_gtfs_time(&text);
    }

    #[test]
    fn prop_gtfs_time_large_hours_never_panic(h in 0u32..=u32::MAX, m in 0u32..=u32::MAX) {
        let expected = u64::from(h) * 3600 + u64::from(m) * 60;
        let parsed = parse_gtfs_time(&format!("{h}:{m}:00"));
        prop_assert_eq!(parsed, u32::try_from(expected).ok());
    }
}

// =============================================================================
// Loader and snapshot reuse
// =============================================================================

#[test]
fn test_open_fetches_and_builds() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);

    let network = PidNetwork::open(&config).unwrap();

    assert_eq!(network.feed.routes.len(), 4);
    assert_eq!(network.graph.node_count(), 4);
    assert!(network.graph.source_sha256().is_some());
    assert!(config.cache_dir.join("stops.txt").exists());
}

#[test]
fn test_load_or_build_reuses_matching_snapshot() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);

    let built = load_or_build(&config, false).unwrap();
    assert!(config.data_dir.join("network.json").exists());

    // Remove the tables' contents; a reused snapshot never reads them
    std::fs::write(config.cache_dir.join("stops.txt"), "stop_id,stop_name\n").unwrap();
    let reused = load_or_build(&config, false).unwrap();

    assert_eq!(reused.node_count(), built.node_count());
    assert_eq!(reused.source_sha256(), built.source_sha256());
}

#[test]
fn test_load_or_build_rebuilds_on_hash_mismatch() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);

    let mut stale = load_or_build(&config, false).unwrap();
    stale.set_source_sha256(Some("0000".into()));
    stale.save(&config.data_dir).unwrap();

    let rebuilt = load_or_build(&config, false).unwrap();

    assert_ne!(rebuilt.source_sha256(), Some("0000"));
    let saved = TransitGraph::load(&config.data_dir).unwrap().unwrap();
    assert_eq!(saved.source_sha256(), rebuilt.source_sha256());
}

#[test]
fn test_load_or_build_rebuilds_on_filter_change() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    assert_eq!(load_or_build(&config, false).unwrap().edge_count(), 8);

    let metro_only = Config {
        filter: NetworkFilter {
            route_types: BTreeSet::from(["1".to_string()]),
            ..NetworkFilter::default()
        },
        ..config.clone()
    };
    let fresh = TransitGraph::build(
        &Feed::load(&metro_only.cache_dir).unwrap(),
        &metro_only.filter,
    )
    .unwrap();
    assert_eq!(fresh.edge_count(), 4);

    let rebuilt = load_or_build(&metro_only, false).unwrap();

    assert_eq!(rebuilt.edge_count(), fresh.edge_count());
    assert_eq!(rebuilt.filter(), Some(&metro_only.filter));
    let saved = TransitGraph::load(&config.data_dir).unwrap().unwrap();
    assert_eq!(saved.filter(), Some(&metro_only.filter));
}

#[test]
fn test_cache_ensure_is_idempotent() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    let cache = DatasetCache::new(&config.cache_dir, DatasetSource::parse(&config.zip_url));

    assert!(matches!(cache.ensure(false).unwrap(), FetchOutcome::Fetched(_)));
    assert_eq!(cache.ensure(false).unwrap(), FetchOutcome::Cached);
}
