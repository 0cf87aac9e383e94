// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Read-only views of the race handed to renderers.

use crate::{
    geometry::{Color, Point},
    serde::{seconds_list, seconds_option},
    vehicle::MarkerId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The phase a race is in.
///
/// "All vehicles finished" is derived from the vehicles and not a phase of
/// its own, see [`RaceSnapshot::all_finished`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceState {
    #[default]
    NotStarted,
    Countdown,
    Running,
}

/// Everything a renderer needs to draw a single vehicle overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub marker_id: MarkerId,
    pub name: String,
    pub color: Color,
    pub position: Option<Point>,
    pub scale_factor: f64,
    /// Completed laps.
    pub lap_count: u32,
    /// Lap number shown to spectators, "Lap 1" while driving the first lap.
    pub display_lap: u32,
    pub finished: bool,
    #[serde(with = "seconds_list")]
    pub lap_times: Vec<Duration>,
    #[serde(with = "seconds_option")]
    pub best_lap: Option<Duration>,
    #[serde(with = "seconds_option")]
    pub total_time: Option<Duration>,
    pub progress: f64,
    pub rank: Option<usize>,
    pub final_position: Option<usize>,
    pub on_track: bool,
    pub show_lap_complete: bool,
}

/// A consistent copy of the race taken after a frame was fully processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    /// Number of the last processed camera frame.
    pub frame: Option<u64>,
    pub state: RaceState,
    pub countdown_remaining: Option<u32>,
    #[serde(with = "seconds_option")]
    pub race_elapsed: Option<Duration>,
    pub race_started_at: Option<DateTime<Utc>>,
    pub total_laps: u32,
    pub all_finished: bool,
    pub show_final_results: bool,
    /// Vehicles in ranking order.
    pub vehicles: Vec<VehicleSnapshot>,
}

impl RaceSnapshot {
    pub fn to_json(snapshot: &RaceSnapshot) -> serde_json::Result<String> {
        serde_json::to_string(snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Returns the vehicle with `marker_id`, if registered.
    pub fn vehicle(&self, marker_id: MarkerId) -> Option<&VehicleSnapshot> {
        self.vehicles.iter().find(|v| v.marker_id == marker_id)
    }
}
