// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Transit network graph with petgraph backing
//!
//! Nodes are stop names (all platforms of a station collapse into one node),
//! edges are stop-to-stop segments of one representative trip per route and
//! direction. Parallel edges are kept, so the graph is a directed multigraph.

use crate::error::Result;
use crate::gtfs::{parse_gtfs_time, Feed, StopTimeRecord};
use crate::types::{NetworkFilter, NetworkStore, NetworkSummary, Position, Segment, StopNode};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name of the persisted network
pub const SNAPSHOT_NAME: &str = "network.json";

/// The metro and tram network
pub struct TransitGraph {
    /// Node weight is the stop name, edge weight indexes `store.segments`
    graph: DiGraph<String, usize>,
    /// Map from stop name to node index
    node_indices: HashMap<String, NodeIndex>,
    /// Stops and segments in insertion order
    store: NetworkStore,
}

impl Default for TransitGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// One call of a representative trip at an eligible stop
struct TripCall<'a> {
    stop_name: &'a str,
    arrival: &'a str,
    departure: &'a str,
}

impl TransitGraph {
    /// Create a new empty network
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            store: NetworkStore::default(),
        }
    }

    /// Build the network from a GTFS feed
    pub fn build(feed: &Feed, filter: &NetworkFilter) -> Result<Self> {
        // Routes of the selected modes
        let route_names: HashMap<&str, &str> = feed
            .routes
            .iter()
            .filter(|r| filter.route_types.contains(&r.route_type))
            .map(|r| (r.route_id.as_str(), r.route_short_name.as_str()))
            .collect();

        // First trip per (route, direction), in file order
        let mut representative: HashSet<(&str, &str)> = HashSet::new();
        let mut trip_routes: HashMap<&str, &str> = HashMap::new();
        for trip in &feed.trips {
            if !route_names.contains_key(trip.route_id.as_str()) {
                continue;
            }
            if representative.insert((trip.route_id.as_str(), trip.direction_id.as_str())) {
                // A trip id reused across routes keeps its first route
                trip_routes
                    .entry(trip.trip_id.as_str())
                    .or_insert(trip.route_id.as_str());
            }
        }

        // Eligible platforms and the name each one maps to
        let eligible: Vec<_> = feed
            .stops
            .iter()
            .filter(|s| filter.zone_ids.contains(&s.zone_id) && !s.stop_name.is_empty())
            .collect();
        let stop_names: HashMap<&str, &str> = eligible
            .iter()
            .copied()
            .filter(|s| !s.stop_id.is_empty())
            .map(|s| (s.stop_id.as_str(), s.stop_name.as_str()))
            .collect();

        // First usable position per name; later platforms never overwrite
        let mut positions: HashMap<&str, Position> = HashMap::new();
        for &stop in &eligible {
            if positions.contains_key(stop.stop_name.as_str()) {
                continue;
            }
            if let Some(position) = stop.position() {
                positions.insert(stop.stop_name.as_str(), position);
            }
        }

        // Calls of representative trips, ordered by (trip_id, stop_sequence)
        let mut calls: Vec<(&StopTimeRecord, i64)> = Vec::new();
        for row in &feed.stop_times {
            if trip_routes.contains_key(row.trip_id.as_str())
                && stop_names.contains_key(row.stop_id.as_str())
            {
                calls.push((row, row.sequence()?));
            }
        }
        calls.sort_by(|(a, a_seq), (b, b_seq)| {
            a.trip_id.cmp(&b.trip_id).then(a_seq.cmp(b_seq))
        });

        let mut trips: BTreeMap<&str, Vec<TripCall<'_>>> = BTreeMap::new();
        for &(row, _) in &calls {
            trips.entry(row.trip_id.as_str()).or_default().push(TripCall {
                stop_name: stop_names[row.stop_id.as_str()],
                arrival: &row.arrival_time,
                departure: &row.departure_time,
            });
        }

        // Travel times per ordered stop pair, over every representative trip
        let mut totals: HashMap<(&str, &str), (f64, u32)> = HashMap::new();
        let mut skipped = 0usize;
        for stops in trips.values() {
            for pair in stops.windows(2) {
                let (current, next) = (&pair[0], &pair[1]);
                let (Some(dep), Some(arr)) =
                    (parse_gtfs_time(current.departure), parse_gtfs_time(next.arrival))
                else {
                    skipped += 1;
                    continue;
                };
                let minutes = (f64::from(arr) - f64::from(dep)) / 60.0;
                if minutes < 0.0 {
                    skipped += 1;
                    continue;
                }
                let entry = totals.entry((current.stop_name, next.stop_name)).or_insert((0.0, 0));
                entry.0 += minutes;
                entry.1 += 1;
            }
        }
        let averages: HashMap<(&str, &str), f64> = totals
            .into_iter()
            .map(|(pair, (sum, count))| (pair, sum / f64::from(count)))
            .collect();

        let mut network = Self::new();
        for (trip_id, stops) in &trips {
            let route_id = trip_routes[trip_id];
            for pair in stops.windows(2) {
                let (from, to) = (pair[0].stop_name, pair[1].stop_name);
                let Some(&avg_time_min) = averages.get(&(from, to)) else {
                    continue;
                };
                network.push_segment(Segment {
                    from: from.to_string(),
                    to: to.to_string(),
                    avg_time_min,
                    route_id: route_id.to_string(),
                    route_short_name: route_names[route_id].to_string(),
                    trip_id: (*trip_id).to_string(),
                });
            }
        }

        for stop in &mut network.store.stops {
            stop.position = positions.get(stop.name.as_str()).copied();
        }
        network.store.filter = Some(filter.clone());

        debug!(
            routes = route_names.len(),
            trips = trips.len(),
            skipped,
            stops = network.node_count(),
            segments = network.edge_count(),
            "Built transit network"
        );

        Ok(network)
    }

    /// Rebuild the petgraph index over a stored network
    #[must_use]
    pub fn from_store(store: NetworkStore) -> Self {
        let mut network = Self::new();
        network.store.source_sha256 = store.source_sha256;
        network.store.filter = store.filter;

        for stop in store.stops {
            let idx = network.graph.add_node(stop.name.clone());
            network.node_indices.insert(stop.name.clone(), idx);
            network.store.stops.push(stop);
        }
        for segment in store.segments {
            network.push_segment(segment);
        }

        network
    }

    /// Load a network snapshot from a directory
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(SNAPSHOT_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| crate::Error::io(&path, e))?;
        let store: NetworkStore = serde_json::from_str(&content)?;
        Ok(Some(Self::from_store(store)))
    }

    /// Save the network snapshot to a directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| crate::Error::io(dir, e))?;
        let path = dir.join(SNAPSHOT_NAME);
        fs::write(&path, self.to_json()?).map_err(|e| crate::Error::io(&path, e))
    }

    /// Tag the network with the hash of the archive it was built from
    pub fn set_source_sha256(&mut self, sha256: Option<String>) {
        self.store.source_sha256 = sha256;
    }

    /// Hash of the archive the network was built from
    #[must_use]
    pub fn source_sha256(&self) -> Option<&str> {
        self.store.source_sha256.as_deref()
    }

    /// Route and zone selection the network was built with
    #[must_use]
    pub fn filter(&self) -> Option<&NetworkFilter> {
        self.store.filter.as_ref()
    }

    fn ensure_stop(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        self.store.stops.push(StopNode {
            name: name.to_string(),
            position: None,
        });
        idx
    }

    fn push_segment(&mut self, segment: Segment) {
        let from = self.ensure_stop(&segment.from);
        let to = self.ensure_stop(&segment.to);
        self.graph.add_edge(from, to, self.store.segments.len());
        self.store.segments.push(segment);
    }

    /// Get a stop by name
    #[must_use]
    pub fn stop(&self, name: &str) -> Option<&StopNode> {
        let idx = self.node_indices.get(name)?;
        self.store.stops.get(idx.index())
    }

    /// Whether a stop with this name is in the network
    #[must_use]
    pub fn contains_stop(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// All stops, in first-appearance order
    #[must_use]
    pub fn stops(&self) -> &[StopNode] {
        &self.store.stops
    }

    /// All segments, in insertion order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.store.segments
    }

    fn directed(&self, name: &str, direction: Direction) -> Vec<&Segment> {
        let Some(&idx) = self.node_indices.get(name) else {
            return vec![];
        };
        let mut edges: Vec<usize> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| *e.weight())
            .collect();
        edges.sort_unstable();
        edges.into_iter().map(|i| &self.store.segments[i]).collect()
    }

    /// Segments leaving a stop
    #[must_use]
    pub fn outgoing(&self, name: &str) -> Vec<&Segment> {
        self.directed(name, Direction::Outgoing)
    }

    /// Segments entering a stop
    #[must_use]
    pub fn incoming(&self, name: &str) -> Vec<&Segment> {
        self.directed(name, Direction::Incoming)
    }

    /// Parallel segments for one ordered stop pair
    #[must_use]
    pub fn segments_between(&self, from: &str, to: &str) -> Vec<&Segment> {
        let (Some(&a), Some(&b)) = (self.node_indices.get(from), self.node_indices.get(to)) else {
            return vec![];
        };
        let mut edges: Vec<usize> = self
            .graph
            .edges_connecting(a, b)
            .map(|e| *e.weight())
            .collect();
        edges.sort_unstable();
        edges.into_iter().map(|i| &self.store.segments[i]).collect()
    }

    /// Average travel time between two adjacent stops, minutes
    #[must_use]
    pub fn average_time(&self, from: &str, to: &str) -> Option<f64> {
        self.segments_between(from, to).first().map(|s| s.avg_time_min)
    }

    /// Stops whose name contains `text`, ignoring case
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<&StopNode> {
        let needle = text.to_lowercase();
        self.store
            .stops
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.store.stops.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.store.segments.len()
    }

    /// Check if the network is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.stops.is_empty()
    }

    /// Aggregate figures for reporting
    #[must_use]
    pub fn summary(&self) -> NetworkSummary {
        let segments = &self.store.segments;
        let pairs: HashSet<(&str, &str)> = segments
            .iter()
            .map(|s| (s.from.as_str(), s.to.as_str()))
            .collect();
        let routes: HashSet<&str> = segments.iter().map(|s| s.route_id.as_str()).collect();

        #[allow(clippy::cast_precision_loss)]
        let mean_avg_time_min = (!segments.is_empty()).then(|| {
            segments.iter().map(|s| s.avg_time_min).sum::<f64>() / segments.len() as f64
        });

        NetworkSummary {
            stops: self.node_count(),
            segments: segments.len(),
            stop_pairs: pairs.len(),
            routes: routes.len(),
            self_loops: segments.iter().filter(|s| s.is_loop()).count(),
            stops_without_position: self.store.stops.iter().filter(|s| s.position.is_none()).count(),
            mean_avg_time_min,
        }
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph pid {\n");
        dot.push_str("  node [shape=point];\n\n");

        for stop in &self.store.stops {
            let name = escape(&stop.name);
            match stop.position {
                Some(Position { x, y }) => {
                    let _ = writeln!(dot, "  \"{name}\" [label=\"{name}\", pos=\"{x},{y}!\"];");
                }
                None => {
                    let _ = writeln!(dot, "  \"{name}\" [label=\"{name}\"];");
                }
            }
        }

        dot.push('\n');

        for segment in &self.store.segments {
            let _ = writeln!(
                dot,
                "  \"{}\" -> \"{}\" [label=\"{:.1}\", line=\"{}\"];",
                escape(&segment.from),
                escape(&segment.to),
                segment.avg_time_min,
                escape(&segment.route_short_name),
            );
        }

        dot.push_str("}\n");
        dot
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.store)?)
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
