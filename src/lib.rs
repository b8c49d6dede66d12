// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! pidnet library - Prague PID transit network for the GN course
//!
//! This crate caches the PID GTFS feed, builds a directed multigraph of
//! metro and tram stop-to-stop segments weighted by average travel time,
//! and carries the course environment setup checklist.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod gtfs;
pub mod guide;
pub mod network;

pub use error::{Error, Result};

/// Core data types of the transit network
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeSet;

    // =========================================================================
    // Filter
    // =========================================================================

    /// GTFS route types kept by default: tram (`0`) and metro (`1`)
    pub const DEFAULT_ROUTE_TYPES: [&str; 2] = ["0", "1"];

    /// Tariff zones kept by default: Prague proper and its border zones
    pub const DEFAULT_ZONE_IDS: [&str; 5] = ["0", "P", "B", "0,B", "P,0"];

    /// Which routes and stops make it into the network
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct NetworkFilter {
        /// Accepted `route_type` values
        pub route_types: BTreeSet<String>,
        /// Accepted `zone_id` values
        pub zone_ids: BTreeSet<String>,
    }

    impl Default for NetworkFilter {
        fn default() -> Self {
            Self {
                route_types: DEFAULT_ROUTE_TYPES.iter().map(|s| (*s).to_string()).collect(),
                zone_ids: DEFAULT_ZONE_IDS.iter().map(|s| (*s).to_string()).collect(),
            }
        }
    }

    // =========================================================================
    // Nodes and edges
    // =========================================================================

    /// Geographic position: `x` is longitude, `y` is latitude
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        /// Longitude
        pub x: f64,
        /// Latitude
        pub y: f64,
    }

    /// A stop (station) node, identified by its name
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct StopNode {
        /// Stop name shared by all platforms of the station
        pub name: String,
        /// Coordinates of the first platform with a usable position
        pub position: Option<Position>,
    }

    /// A directed stop-to-stop segment of one representative trip
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Segment {
        /// Departure stop name
        pub from: String,
        /// Arrival stop name
        pub to: String,
        /// Mean travel time over every trip serving this ordered pair, minutes
        pub avg_time_min: f64,
        /// Route of the trip that contributed the edge
        pub route_id: String,
        /// Public line name of that route
        #[serde(default)]
        pub route_short_name: String,
        /// Trip that contributed the edge
        pub trip_id: String,
    }

    impl Segment {
        /// Whether the segment starts and ends at the same stop name
        #[must_use]
        pub fn is_loop(&self) -> bool {
            self.from == self.to
        }
    }

    // =========================================================================
    // Store
    // =========================================================================

    /// Serializable form of the network
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct NetworkStore {
        /// Hash of the GTFS archive the network was built from
        #[serde(default)]
        pub source_sha256: Option<String>,
        /// Route and zone selection the network was built with
        #[serde(default)]
        pub filter: Option<NetworkFilter>,
        /// Stops in first-appearance order
        #[serde(default)]
        pub stops: Vec<StopNode>,
        /// Segments in insertion order
        #[serde(default)]
        pub segments: Vec<Segment>,
    }

    /// Aggregate figures describing a built network
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NetworkSummary {
        /// Number of stop nodes
        pub stops: usize,
        /// Number of segment edges, parallel edges included
        pub segments: usize,
        /// Number of distinct ordered stop pairs
        pub stop_pairs: usize,
        /// Number of distinct routes contributing segments
        pub routes: usize,
        /// Segments whose endpoints share a name
        pub self_loops: usize,
        /// Stops with no known coordinates
        pub stops_without_position: usize,
        /// Mean of `avg_time_min` over all segments
        pub mean_avg_time_min: Option<f64>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::graph::TransitGraph;
    pub use crate::network::PidNetwork;
    pub use crate::types::*;
    pub use crate::{Error, Result};
}
