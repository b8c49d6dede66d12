// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! GTFS feed tables
//!
//! Only the columns the network builder needs are deserialized. Extra columns
//! are ignored and absent optional columns read as empty strings, so feeds
//! with a trimmed-down schema still load.

use crate::error::{Error, Result};
use crate::types::Position;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Stop table file name
pub const STOPS: &str = "stops.txt";
/// Stop time table file name
pub const STOP_TIMES: &str = "stop_times.txt";
/// Trip table file name
pub const TRIPS: &str = "trips.txt";
/// Route table file name
pub const ROUTES: &str = "routes.txt";

/// Tables the loader requires, in the order they are read
pub const REQUIRED_FILES: [&str; 4] = [STOPS, STOP_TIMES, TRIPS, ROUTES];

/// Row of `stops.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StopRecord {
    /// Stop (platform) identifier
    #[serde(default)]
    pub stop_id: String,
    /// Human-readable stop name, shared by all platforms of a station
    #[serde(default)]
    pub stop_name: String,
    /// Latitude as written in the feed
    #[serde(default)]
    pub stop_lat: String,
    /// Longitude as written in the feed
    #[serde(default)]
    pub stop_lon: String,
    /// Tariff zone, e.g. `P`, `0` or `0,B`
    #[serde(default)]
    pub zone_id: String,
}

impl StopRecord {
    /// Coordinates of the stop, if both are present and numeric
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        if self.stop_lon.is_empty() || self.stop_lat.is_empty() {
            return None;
        }
        let x = self.stop_lon.trim().parse::<f64>().ok()?;
        let y = self.stop_lat.trim().parse::<f64>().ok()?;
        Some(Position { x, y })
    }
}

/// Row of `stop_times.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StopTimeRecord {
    /// Trip this call belongs to
    pub trip_id: String,
    /// Stop served
    pub stop_id: String,
    /// Position of the call within the trip
    pub stop_sequence: String,
    /// Arrival time, `H:MM:SS`
    #[serde(default)]
    pub arrival_time: String,
    /// Departure time, `H:MM:SS`
    #[serde(default)]
    pub departure_time: String,
}

impl StopTimeRecord {
    /// Numeric stop sequence
    pub fn sequence(&self) -> Result<i64> {
        self.stop_sequence
            .trim()
            .parse()
            .map_err(|_| Error::InvalidField {
                table: STOP_TIMES,
                field: "stop_sequence",
                value: self.stop_sequence.clone(),
            })
    }
}

/// Row of `trips.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TripRecord {
    /// Route operated by the trip
    pub route_id: String,
    /// Trip identifier
    pub trip_id: String,
    /// Direction flag (`0`/`1`), empty when the feed omits it
    #[serde(default)]
    pub direction_id: String,
}

/// Row of `routes.txt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RouteRecord {
    /// Route identifier
    pub route_id: String,
    /// Public line name, e.g. `A` or `22`
    #[serde(default)]
    pub route_short_name: String,
    /// GTFS route type (`0` tram, `1` metro, `3` bus, ...)
    #[serde(default)]
    pub route_type: String,
}

/// The four GTFS tables the network is built from
#[derive(Debug, Clone, Default)]
pub struct Feed {
    /// `stops.txt`
    pub stops: Vec<StopRecord>,
    /// `stop_times.txt`
    pub stop_times: Vec<StopTimeRecord>,
    /// `trips.txt`
    pub trips: Vec<TripRecord>,
    /// `routes.txt`
    pub routes: Vec<RouteRecord>,
}

impl Feed {
    /// Read all required tables from a directory
    pub fn load(dir: &Path) -> Result<Self> {
        let feed = Self {
            stops: read_table(&dir.join(STOPS))?,
            stop_times: read_table(&dir.join(STOP_TIMES))?,
            trips: read_table(&dir.join(TRIPS))?,
            routes: read_table(&dir.join(ROUTES))?,
        };
        debug!(
            stops = feed.stops.len(),
            stop_times = feed.stop_times.len(),
            trips = feed.trips.len(),
            routes = feed.routes.len(),
            "Loaded GTFS feed"
        );
        Ok(feed)
    }
}

/// Deserialize every row of a headed CSV table
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Parse a GTFS `H:MM:SS` time into seconds after midnight
///
/// Hours may exceed 23 for trips that run past midnight of the service day.
#[must_use]
pub fn parse_gtfs_time(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    let mut parts = text.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    let hours: u32 = h.trim().parse().ok()?;
    let minutes: u32 = m.trim().parse().ok()?;
    let seconds: u32 = s.trim().parse().ok()?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}
