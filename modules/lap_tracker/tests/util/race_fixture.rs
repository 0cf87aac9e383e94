// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{
    detection::DetectionFrame,
    geometry::Point,
    race_config::RaceConfig,
    test_helper::track::{APPROACH_POINT, CHECKPOINT_POINT, FINISH_POINT, detection_at},
    vehicle::{LapRecord, MarkerId, Vehicle, VehicleMap},
};
use lap_tracker::LapTracker;
use race_session::RaceSession;
use std::time::Duration;

pub fn secs(secs: f64) -> Duration {
    Duration::from_secs_f64(secs)
}

/// A tracker with its vehicles and session, driven frame by frame.
pub struct RaceFixture {
    pub tracker: LapTracker,
    pub vehicles: VehicleMap,
    pub session: RaceSession,
    next_frame: u64,
}

impl RaceFixture {
    pub fn new(config: &RaceConfig) -> Self {
        RaceFixture {
            tracker: LapTracker::new(config).unwrap(),
            vehicles: config
                .vehicles
                .iter()
                .map(|v| (v.marker_id, Vehicle::from_config(v)))
                .collect(),
            session: RaceSession::new(config.rules.clone()),
            next_frame: 0,
        }
    }

    /// Runs the countdown from zero and starts the race when it ends.
    pub fn start_race(&mut self) -> Duration {
        self.session.start_countdown(Duration::ZERO);
        let start = self.session.rules().countdown_duration;
        assert!(self.session.start_race(start, self.vehicles.values_mut()));
        start
    }

    pub fn vehicle(&self, marker_id: MarkerId) -> &Vehicle {
        &self.vehicles[&marker_id]
    }

    /// Processes a frame with one detection per `(marker, centroid)` pair.
    pub fn frame(&mut self, now: Duration, markers: &[(MarkerId, Point)]) -> Vec<LapRecord> {
        let frame = DetectionFrame::new(
            self.next_frame,
            markers
                .iter()
                .map(|(id, center)| detection_at(*id, *center))
                .collect(),
        );
        self.next_frame += 1;
        self.tracker
            .process_frame(&mut self.vehicles, &frame, now, &mut self.session)
    }

    /// Drives `marker_id` through the checkpoint and back into the finish
    /// zone, entering it at `finish_time`.
    pub fn drive_lap(&mut self, marker_id: MarkerId, finish_time: Duration) -> Vec<LapRecord> {
        self.frame(finish_time - secs(1.0), &[(marker_id, CHECKPOINT_POINT)]);
        self.cross_finish(marker_id, finish_time)
    }

    /// Approaches the finish zone from the left and enters it at `time`.
    pub fn cross_finish(&mut self, marker_id: MarkerId, time: Duration) -> Vec<LapRecord> {
        self.frame(time - secs(0.2), &[(marker_id, APPROACH_POINT)]);
        self.frame(time, &[(marker_id, FINISH_POINT)])
    }
}
