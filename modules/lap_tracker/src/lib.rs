// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::{Centerline, Polygon, ScaleModel, marker_centroid};
use common::{
    detection::{DetectionFrame, MarkerDetection},
    geometry::Point,
    race_config::{ConfigError, DirectionCheck, RaceConfig},
    vehicle::{LapRecord, Vehicle, VehicleMap},
};
use race_session::RaceSession;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Why a finish zone visit did not count as a lap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LapRejection {
    /// The race is not running.
    RaceNotRunning,
    /// The vehicle already completed all laps.
    Finished,
    /// The checkpoint zone was not visited since the last lap.
    CheckpointMissing,
    /// The vehicle moved against the driving direction.
    WrongDirection,
    /// The last lap was counted less than the cooldown time ago.
    Cooldown,
}

/// Converts the marker detections of a frame into lap counts.
///
/// Every detected vehicle gets its position updated. A lap is counted when
/// the vehicle enters the finish zone and all of the following hold:
/// - the race is running and the vehicle is not finished,
/// - the checkpoint zone was visited since the last counted lap,
/// - the vehicle moves in driving direction,
/// - more than the cooldown time passed since the last counted lap.
///
/// The tracker itself is immutable, all state lives in the vehicles and the
/// [`RaceSession`].
#[derive(Debug, Clone)]
pub struct LapTracker {
    finish_zone: Polygon,
    checkpoint_zone: Polygon,
    centerline: Centerline,
    track_band: Polygon,
    scale_model: ScaleModel,
    direction_check: DirectionCheck,
}

impl LapTracker {
    /// Builds the tracker from the race configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid track geometry, empty zones,
    /// overlapping finish and checkpoint zones and invalid rules.
    pub fn new(config: &RaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let centerline = Centerline::from_track(&config.track)?;
        let finish_zone = Polygon::from_zone(&config.finish_zone);
        let checkpoint_zone = Polygon::from_zone(&config.checkpoint_zone);
        if finish_zone.intersects(&checkpoint_zone) {
            return Err(ConfigError::OverlappingZones);
        }
        Ok(LapTracker {
            track_band: centerline.band(config.track.width),
            finish_zone,
            checkpoint_zone,
            centerline,
            scale_model: ScaleModel::new(&config.marker),
            direction_check: config.direction_check,
        })
    }

    pub fn centerline(&self) -> &Centerline {
        &self.centerline
    }

    /// Whether `point` lies on the track band around the centerline.
    pub fn is_on_track(&self, point: Point) -> bool {
        self.track_band.contains(point)
    }

    pub fn is_in_finish_zone(&self, point: Point) -> bool {
        self.finish_zone.contains(point)
    }

    pub fn is_in_checkpoint_zone(&self, point: Point) -> bool {
        self.checkpoint_zone.contains(point)
    }

    /// Processes all detections of one camera frame at time `now`.
    ///
    /// Detections of unregistered markers are ignored. Returns the laps that
    /// were counted in this frame, in detection order.
    pub fn process_frame(
        &self,
        vehicles: &mut VehicleMap,
        frame: &DetectionFrame,
        now: Duration,
        session: &mut RaceSession,
    ) -> Vec<LapRecord> {
        let mut laps = Vec::new();
        for detection in &frame.detections {
            let Some(vehicle) = vehicles.get_mut(&detection.marker_id) else {
                trace!(
                    "Ignoring unregistered marker {} in frame {}",
                    detection.marker_id, frame.frame
                );
                continue;
            };
            if let Some(lap) = self.process_detection(vehicle, detection, now, session) {
                laps.push(lap);
            }
        }
        laps
    }

    fn process_detection(
        &self,
        vehicle: &mut Vehicle,
        detection: &MarkerDetection,
        now: Duration,
        session: &mut RaceSession,
    ) -> Option<LapRecord> {
        let centroid = marker_centroid(&detection.corners);
        let scale = self.scale_model.visual_scale(&detection.corners);

        if self.checkpoint_zone.contains(centroid) && !vehicle.passed_checkpoint() {
            debug!("Vehicle {} passed the checkpoint", vehicle.marker_id());
            vehicle.mark_checkpoint_passed();
        }

        let mut lap = None;
        if self.finish_zone.contains(centroid) {
            match self.check_lap(vehicle, centroid, now, session) {
                Ok(()) => {
                    lap = vehicle.increment_lap(now, session.total_laps(), session.finish_order_mut());
                    vehicle.clear_checkpoint();
                    vehicle.show_lap_banner(now);
                    if let Some(record) = &lap {
                        info!(
                            "Vehicle {} completed lap {} in {:?}",
                            record.marker_id, record.lap, record.lap_time
                        );
                        if let Some(position) = record.final_position {
                            info!("Vehicle {} finished at position {position}", record.marker_id);
                        }
                    }
                }
                Err(LapRejection::CheckpointMissing) => trace!(
                    "Vehicle {} in finish zone without checkpoint",
                    vehicle.marker_id()
                ),
                Err(reason) => debug!(
                    "Finish zone visit of vehicle {} not counted: {reason:?}",
                    vehicle.marker_id()
                ),
            }
        }

        vehicle.update_position(centroid, scale);
        lap
    }

    /// Decides whether a finish zone visit at `centroid` completes a lap.
    pub fn check_lap(
        &self,
        vehicle: &Vehicle,
        centroid: Point,
        now: Duration,
        session: &RaceSession,
    ) -> Result<(), LapRejection> {
        if !session.is_running() {
            return Err(LapRejection::RaceNotRunning);
        }
        if vehicle.is_finished() {
            return Err(LapRejection::Finished);
        }
        if !vehicle.passed_checkpoint() {
            return Err(LapRejection::CheckpointMissing);
        }
        if !self.is_moving_forward(vehicle.position(), centroid) {
            return Err(LapRejection::WrongDirection);
        }
        let cooled_down = vehicle
            .last_lap_time()
            .is_none_or(|last| now.saturating_sub(last) > session.cooldown_time());
        if !cooled_down {
            return Err(LapRejection::Cooldown);
        }
        Ok(())
    }

    /// The first observation of a vehicle always counts as moving forward.
    fn is_moving_forward(&self, previous: Option<Point>, current: Point) -> bool {
        let Some(previous) = previous else {
            return true;
        };
        match self.direction_check {
            DirectionCheck::XIncreasing => current.x > previous.x,
            DirectionCheck::CenterlineProgress => {
                self.centerline.is_forward_move(previous, current)
            }
            DirectionCheck::Disabled => true,
        }
    }
}
