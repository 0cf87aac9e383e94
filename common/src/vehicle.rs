// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! The per marker vehicle record and the race wide finish order.

use crate::{
    geometry::{Color, Point},
    race_config::VehicleConfig,
};
use std::{collections::BTreeMap, time::Duration};

/// Identifier of a fiducial marker, as reported by the marker detector.
pub type MarkerId = u32;

/// All registered vehicles keyed by their marker id.
///
/// The map iterates in ascending marker id order, which is the input order the
/// ranking keeps for exact ties.
pub type VehicleMap = BTreeMap<MarkerId, Vehicle>;

/// Append-only list of marker ids in the order the vehicles finished.
///
/// The 1-based index of a marker in this list is its final race position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinishOrder {
    markers: Vec<MarkerId>,
}

impl FinishOrder {
    /// Appends `marker_id` and returns its final position.
    pub fn record(&mut self, marker_id: MarkerId) -> usize {
        self.markers.push(marker_id);
        self.markers.len()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn as_slice(&self) -> &[MarkerId] {
        &self.markers
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

/// Outcome of a counted lap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapRecord {
    pub marker_id: MarkerId,
    /// Number of completed laps including this one.
    pub lap: u32,
    /// Duration of the lap, `None` when no lap start time was known.
    pub lap_time: Option<Duration>,
    /// Set when this lap finished the race for the vehicle.
    pub final_position: Option<usize>,
}

/// A race participant identified by its marker.
///
/// Identity and display fields are fixed at registration. Everything else is
/// race state that [`Vehicle::reset`] clears again.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    marker_id: MarkerId,
    name: String,
    color: Color,

    position: Option<Point>,
    previous_position: Option<Point>,
    scale_factor: f64,

    lap_count: u32,
    passed_checkpoint: bool,
    last_lap_time: Option<Duration>,
    lap_times: Vec<Duration>,
    fastest_lap: Option<Duration>,
    lap_banner_since: Option<Duration>,

    finished: bool,
    finish_time: Option<Duration>,
    final_position: Option<usize>,

    progress: f64,
    rank: Option<usize>,
}

impl Vehicle {
    pub const DEFAULT_SCALE: f64 = 1.0;

    pub fn new(marker_id: MarkerId, name: impl Into<String>, color: Color) -> Self {
        Vehicle {
            marker_id,
            name: name.into(),
            color,
            position: None,
            previous_position: None,
            scale_factor: Self::DEFAULT_SCALE,
            lap_count: 0,
            passed_checkpoint: false,
            last_lap_time: None,
            lap_times: Vec::new(),
            fastest_lap: None,
            lap_banner_since: None,
            finished: false,
            finish_time: None,
            final_position: None,
            progress: 0.0,
            rank: None,
        }
    }

    pub fn from_config(config: &VehicleConfig) -> Self {
        Self::new(config.marker_id, config.name.clone(), config.color)
    }

    /// Stores a new observed centroid, keeping the former one as previous
    /// position. No range checks are done on the input.
    pub fn update_position(&mut self, position: Point, scale_factor: f64) {
        self.previous_position = self.position;
        self.position = Some(position);
        self.scale_factor = scale_factor;
    }

    /// Counts a completed lap at `current_time`.
    ///
    /// The lap duration is only recorded when the start of the lap is known.
    /// Reaching `total_laps` finishes the vehicle and records it in
    /// `finish_order`, which assigns the final position.
    ///
    /// Calls on an already finished vehicle are ignored and return `None`.
    /// The cooldown between laps is not checked here, that is the caller's
    /// job.
    pub fn increment_lap(
        &mut self,
        current_time: Duration,
        total_laps: u32,
        finish_order: &mut FinishOrder,
    ) -> Option<LapRecord> {
        if self.finished {
            return None;
        }

        let lap_time = self
            .last_lap_time
            .map(|last| current_time.saturating_sub(last));
        if let Some(lap_time) = lap_time {
            self.fastest_lap = Some(self.fastest_lap.map_or(lap_time, |f| f.min(lap_time)));
            self.lap_times.push(lap_time);
        }
        self.lap_count += 1;
        self.last_lap_time = Some(current_time);

        if self.lap_count >= total_laps {
            self.finished = true;
            self.finish_time = Some(current_time);
            self.final_position = Some(finish_order.record(self.marker_id));
        }

        Some(LapRecord {
            marker_id: self.marker_id,
            lap: self.lap_count,
            lap_time,
            final_position: self.final_position,
        })
    }

    pub fn best_lap_time(&self) -> Option<Duration> {
        self.fastest_lap
    }

    /// Race time of this vehicle. Frozen at the finish time once finished.
    pub fn total_race_time(&self, race_start_time: Duration, current_time: Duration) -> Duration {
        match self.finish_time {
            Some(finish_time) if self.finished => finish_time.saturating_sub(race_start_time),
            _ => current_time.saturating_sub(race_start_time),
        }
    }

    /// Clears all race state. Identity and display fields are kept.
    pub fn reset(&mut self) {
        *self = Vehicle::new(self.marker_id, std::mem::take(&mut self.name), self.color);
    }

    /// Marks the start of the current lap, e.g. at the race start.
    pub fn set_last_lap_time(&mut self, time: Duration) {
        self.last_lap_time = Some(time);
    }

    pub fn mark_checkpoint_passed(&mut self) {
        self.passed_checkpoint = true;
    }

    pub fn clear_checkpoint(&mut self) {
        self.passed_checkpoint = false;
    }

    /// Starts the "lap complete" banner of this vehicle.
    pub fn show_lap_banner(&mut self, now: Duration) {
        self.lap_banner_since = Some(now);
    }

    /// Whether the "lap complete" banner is still visible at `now`.
    pub fn shows_lap_complete(&self, now: Duration, banner_duration: Duration) -> bool {
        self.lap_banner_since
            .is_some_and(|since| now.saturating_sub(since) < banner_duration)
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
    }

    pub fn set_rank(&mut self, rank: usize) {
        self.rank = Some(rank);
    }

    pub fn marker_id(&self) -> MarkerId {
        self.marker_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn previous_position(&self) -> Option<Point> {
        self.previous_position
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn lap_count(&self) -> u32 {
        self.lap_count
    }

    pub fn passed_checkpoint(&self) -> bool {
        self.passed_checkpoint
    }

    pub fn last_lap_time(&self) -> Option<Duration> {
        self.last_lap_time
    }

    pub fn lap_times(&self) -> &[Duration] {
        &self.lap_times
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finish_time(&self) -> Option<Duration> {
        self.finish_time
    }

    pub fn final_position(&self) -> Option<usize> {
        self.final_position
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn rank(&self) -> Option<usize> {
        self.rank
    }
}
