// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shared fixture: a tiny PID-shaped GTFS feed
//!
//! Lines: metro A (route type 1) both directions, tram 17 and tram 22
//! (type 0), bus 119 (type 3, filtered out). Stop `Kladno` sits outside the
//! accepted zones and `Letiště` is only served by the bus.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

pub const ROUTES: &str = "\
route_id,agency_id,route_short_name,route_long_name,route_type
L991,99,A,Depo Hostivař - Nemocnice Motol,1
L17,99,17,Sídliště Modřany - Vozovna Kobylisy,0
L22,99,22,Bílá Hora - Nádraží Hostivař,0
L119,99,119,Dejvická - Letiště,3
";

// 991_2 precedes 991_1 in the file and is the representative trip
pub const TRIPS: &str = "\
route_id,service_id,trip_id,trip_headsign,direction_id
L991,S1,991_2,Nemocnice Motol,0
L991,S1,991_1,Nemocnice Motol,0
L991,S1,991_9,Depo Hostivař,1
L17,S1,17_1,Vozovna Kobylisy,0
L22,S1,22_5,Nádraží Hostivař,0
L119,S1,119_1,Letiště,0
";

pub const STOPS: &str = "\
stop_id,stop_name,stop_lat,stop_lon,zone_id,location_type
U1Z101P,Muzeum,50.0790,14.4305,P,0
U1Z102P,Muzeum,50.0800,14.4310,P,0
U2Z1P,Můstek,50.0835,14.4240,P,0
U3Z1P,Staroměstská,,14.4170,P,0
U3Z2P,Staroměstská,50.0880,14.4175,P,0
U4Z1P,Národní divadlo,50.0810,14.4140,\"0,B\",0
U5Z1P,Letiště,50.1000,14.2600,B,0
U6Z1P,Kladno,50.1400,14.1000,5,0
";

pub const STOP_TIMES: &str = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
991_2,08:02:00,08:02:30,U2Z1P,2
991_2,08:00:00,08:00:30,U1Z101P,1
991_2,08:04:30,08:05:00,U3Z1P,3
991_1,07:00:00,07:00:00,U1Z101P,1
991_1,07:10:00,07:10:00,U2Z1P,2
991_9,09:00:00,09:00:00,U3Z2P,1
991_9,09:03:00,09:03:00,U2Z1P,2
991_9,09:06:00,09:06:00,U1Z102P,3
17_1,11:00:00,11:00:00,U1Z101P,1
17_1,11:02:30,11:03:00,U2Z1P,2
17_1,11:01:00,11:01:00,U3Z1P,3
22_5,10:00:00,10:00:00,U3Z1P,1
22_5,10:02:00,10:02:00,U6Z1P,2
22_5,10:06:00,10:06:00,U4Z1P,3
22_5,10:08:00,10:08:00,U4Z1P,4
22_5,,10:09:00,U2Z1P,5
119_1,12:00:00,12:00:00,U5Z1P,1
119_1,12:20:00,12:20:00,U1Z101P,2
";

fn members() -> [(&'static str, &'static str); 4] {
    [
        ("stops.txt", STOPS),
        ("stop_times.txt", STOP_TIMES),
        ("trips.txt", TRIPS),
        ("routes.txt", ROUTES),
    ]
}

/// Write the four tables into `dir`
pub fn write_feed(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    for (name, content) in members() {
        fs::write(dir.join(name), content).unwrap();
    }
}

/// Write a GTFS archive holding the four tables plus an unrelated member
pub fn write_archive(path: &Path) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in members() {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.start_file("agency.txt", SimpleFileOptions::default()).unwrap();
    writer.write_all(b"agency_id,agency_name\n99,PID\n").unwrap();
    writer.finish().unwrap();
}
