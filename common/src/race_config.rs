// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Static configuration of a race, loaded once at startup.

use crate::{
    geometry::Color,
    serde::seconds,
    track::TrackConfig,
    vehicle::MarkerId,
    zone::Zone,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, time::Duration};
use thiserror::Error;

/// Setup mistakes detected before the frame loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("track centerline needs at least two points, got {0}")]
    TooFewPathPoints(usize),
    #[error("track centerline has zero total length")]
    ZeroLengthPath,
    #[error("track contains a non finite coordinate")]
    NonFinitePoint,
    #[error("{0} zone has no area")]
    EmptyZone(&'static str),
    #[error("finish zone and checkpoint zone overlap")]
    OverlappingZones,
    #[error("total laps must be at least one")]
    NoLaps,
    #[error("marker id {0} is registered more than once")]
    DuplicateMarker(MarkerId),
    #[error("marker model value `{0}` must be positive and finite")]
    InvalidMarkerModel(&'static str),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// The rule set of a race.
///
/// All values are constant for the lifetime of a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceRules {
    /// Number of completed laps after which a vehicle is finished.
    pub total_laps: u32,
    /// Minimal time between two counted laps of the same vehicle.
    #[serde(with = "seconds")]
    pub cooldown_time: Duration,
    /// Length of the countdown before the race starts.
    #[serde(with = "seconds")]
    pub countdown_duration: Duration,
    /// How long renderers show "lap complete" after a counted lap.
    #[serde(with = "seconds")]
    pub lap_complete_duration: Duration,
    /// Delay after the last finish until the final ranking is shown.
    #[serde(with = "seconds")]
    pub final_results_delay: Duration,
}

impl Default for RaceRules {
    fn default() -> Self {
        RaceRules {
            total_laps: 3,
            cooldown_time: Duration::from_secs(2),
            countdown_duration: Duration::from_secs(3),
            lap_complete_duration: Duration::from_secs(2),
            final_results_delay: Duration::from_secs(3),
        }
    }
}

/// Pinhole camera constants used to estimate the overlay scale of a vehicle
/// from the apparent size of its marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Printed marker width in meters.
    pub real_width: f64,
    /// Focal length of the camera in pixels.
    pub focal_length: f64,
    pub initial_scale: f64,
    pub min_scale: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            real_width: 0.08,
            focal_length: 800.0,
            initial_scale: 0.2,
            min_scale: 0.2,
        }
    }
}

/// How a finish zone crossing is checked for the right direction of travel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionCheck {
    /// The marker x coordinate must grow compared to the previous frame.
    /// Matches tracks whose finish line is driven from left to right.
    #[default]
    XIncreasing,
    /// The lap progress along the centerline must grow compared to the
    /// previous frame. Works for any track orientation.
    CenterlineProgress,
    /// Every crossing direction is accepted.
    Disabled,
}

/// A participant as supplied by the race menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub marker_id: MarkerId,
    pub name: String,
    #[serde(default)]
    pub color: Color,
}

/// The complete, immutable configuration of the race exhibit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    pub track: TrackConfig,
    pub finish_zone: Zone,
    pub checkpoint_zone: Zone,
    #[serde(default)]
    pub rules: RaceRules,
    #[serde(default)]
    pub marker: MarkerConfig,
    #[serde(default)]
    pub direction_check: DirectionCheck,
    #[serde(default)]
    pub vehicles: Vec<VehicleConfig>,
}

impl RaceConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    ///
    /// Only the format is checked here, geometry is validated by the
    /// components built from the config.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks the values that don't need any geometry computations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.total_laps == 0 {
            return Err(ConfigError::NoLaps);
        }
        if !self.finish_zone.has_area() {
            return Err(ConfigError::EmptyZone("finish"));
        }
        if !self.checkpoint_zone.has_area() {
            return Err(ConfigError::EmptyZone("checkpoint"));
        }
        let model = [
            ("real_width", self.marker.real_width),
            ("focal_length", self.marker.focal_length),
            ("initial_scale", self.marker.initial_scale),
            ("min_scale", self.marker.min_scale),
        ];
        if let Some((name, _)) = model.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(ConfigError::InvalidMarkerModel(name));
        }
        validate_vehicles(&self.vehicles)
    }
}

/// Rejects participant lists that register a marker id twice.
pub fn validate_vehicles(vehicles: &[VehicleConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(vehicles.len());
    for vehicle in vehicles {
        if !seen.insert(vehicle.marker_id) {
            return Err(ConfigError::DuplicateMarker(vehicle.marker_id));
        }
    }
    Ok(())
}
