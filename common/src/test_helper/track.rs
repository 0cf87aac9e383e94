// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! A rectangular test track.
//!
//! ```text
//!  (100,100) ---F---------------> (500,100)
//!      ^                               |
//!      |                               v
//!  (100,300) <----------C-------- (500,300)
//! ```
//!
//! The finish zone `F` spans x 120..180 on the top straight, the checkpoint
//! zone `C` spans x 270..330 on the bottom straight. Vehicles drive the top
//! straight from left to right.

use crate::{
    detection::MarkerDetection,
    geometry::{Color, Point},
    race_config::{DirectionCheck, MarkerConfig, RaceConfig, RaceRules, VehicleConfig},
    track::TrackConfig,
    vehicle::MarkerId,
    zone::Zone,
};
use std::time::Duration;

pub const MARKER_SIZE: f64 = 20.0;

pub const FINISH_POINT: Point = Point::new(150.0, 100.0);
pub const CHECKPOINT_POINT: Point = Point::new(300.0, 300.0);
/// Left of the finish zone, on the way back to the finish line.
pub const APPROACH_POINT: Point = Point::new(100.0, 100.0);

pub fn get_track() -> TrackConfig {
    TrackConfig {
        name: "Rectangle".to_string(),
        centerline: vec![
            Point::new(100.0, 100.0),
            Point::new(500.0, 100.0),
            Point::new(500.0, 300.0),
            Point::new(100.0, 300.0),
            Point::new(100.0, 100.0),
        ],
        width: 40.0,
        start_point: Some(FINISH_POINT),
    }
}

pub fn get_vehicles() -> Vec<VehicleConfig> {
    vec![
        VehicleConfig {
            marker_id: 0,
            name: "Blue".to_string(),
            color: Color::new(0, 0, 255),
        },
        VehicleConfig {
            marker_id: 1,
            name: "Green".to_string(),
            color: Color::new(0, 255, 0),
        },
        VehicleConfig {
            marker_id: 2,
            name: "Red".to_string(),
            color: Color::new(255, 0, 0),
        },
    ]
}

pub fn get_race_config() -> RaceConfig {
    RaceConfig {
        track: get_track(),
        finish_zone: Zone::new(FINISH_POINT, 60.0, 40.0, 0.0),
        checkpoint_zone: Zone::new(CHECKPOINT_POINT, 60.0, 40.0, 0.0),
        rules: RaceRules {
            total_laps: 3,
            cooldown_time: Duration::from_secs(2),
            countdown_duration: Duration::from_secs(3),
            lap_complete_duration: Duration::from_secs(2),
            final_results_delay: Duration::from_secs(3),
        },
        marker: MarkerConfig::default(),
        direction_check: DirectionCheck::XIncreasing,
        vehicles: get_vehicles(),
    }
}

/// A square marker of [`MARKER_SIZE`] centered at `center`.
pub fn detection_at(marker_id: MarkerId, center: Point) -> MarkerDetection {
    MarkerDetection::square(marker_id, center, MARKER_SIZE)
}

pub fn get_race_config_as_json<'a>() -> &'a str {
    r#"
    {
        "track": {
            "name": "Rectangle",
            "centerline": [
                { "x": 100.0, "y": 100.0 },
                { "x": 500.0, "y": 100.0 },
                { "x": 500.0, "y": 300.0 },
                { "x": 100.0, "y": 300.0 },
                { "x": 100.0, "y": 100.0 }
            ],
            "width": 40.0,
            "start_point": { "x": 150.0, "y": 100.0 }
        },
        "finish_zone": { "center": { "x": 150.0, "y": 100.0 }, "width": 60.0, "height": 40.0, "angle": 0.0 },
        "checkpoint_zone": { "center": { "x": 300.0, "y": 300.0 }, "width": 60.0, "height": 40.0 },
        "rules": {
            "total_laps": 3,
            "cooldown_time": 2.0,
            "countdown_duration": 3.0,
            "lap_complete_duration": 2.0,
            "final_results_delay": 3.0
        },
        "direction_check": "x_increasing",
        "vehicles": [
            { "marker_id": 0, "name": "Blue", "color": { "r": 0, "g": 0, "b": 255 } },
            { "marker_id": 1, "name": "Green", "color": { "r": 0, "g": 255, "b": 0 } },
            { "marker_id": 2, "name": "Red", "color": { "r": 255, "g": 0, "b": 0 } }
        ]
    }
    "#
}
