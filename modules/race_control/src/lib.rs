// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::rank_vehicles;
use async_trait::async_trait;
use common::{
    detection::DetectionFrame,
    race_clock::{MonotonicClock, RaceClock},
    race_config::{ConfigError, RaceConfig, VehicleConfig, validate_vehicles},
    snapshot::{RaceSnapshot, RaceState},
    vehicle::{Vehicle, VehicleMap},
};
use lap_tracker::LapTracker;
use module_core::{EventKind, Module, ModuleCtx, RaceSnapshotPtr};
use race_session::RaceSession;
use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast::error::RecvError, time::MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub mod snapshot;

use snapshot::build_snapshot;

/// The `RaceModule` owns the vehicles and the race session.
///
/// Every mutation of the race happens inside its event loop: detection
/// frames are tracked and ranked in one go before an immutable
/// [`RaceSnapshot`] is published. Renderers only ever see these snapshots.
///
/// A periodic tick advances the countdown and starts the race when it
/// reaches zero, also when no camera frames arrive.
///
/// # Type Parameters
/// - `C`: The [`RaceClock`] all race timestamps are taken from.
///   Defaults to [`MonotonicClock`].
pub struct RaceModule<C: RaceClock = MonotonicClock> {
    ctx: ModuleCtx,
    tracker: LapTracker,
    session: RaceSession,
    vehicles: VehicleMap,
    clock: C,
    tick_interval: Duration,
    last_frame: Option<u64>,
    last_published: Option<RaceSnapshotPtr>,
}

fn create_vehicles(configs: &[VehicleConfig]) -> VehicleMap {
    configs
        .iter()
        .map(|config| (config.marker_id, Vehicle::from_config(config)))
        .collect()
}

impl RaceModule<MonotonicClock> {
    /// Creates the race module using the default [`MonotonicClock`].
    pub fn new(ctx: ModuleCtx, config: Arc<RaceConfig>) -> Result<Self, ConfigError> {
        RaceModule::new_with_clock(ctx, config, MonotonicClock::default())
    }
}

impl<C: RaceClock> RaceModule<C> {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Creates the race module with a custom clock.
    ///
    /// The participants of the configuration are registered right away.
    ///
    /// # Errors
    ///
    /// The configuration is validated before anything else, see
    /// [`LapTracker::new`].
    pub fn new_with_clock(
        ctx: ModuleCtx,
        config: Arc<RaceConfig>,
        clock: C,
    ) -> Result<Self, ConfigError> {
        let tracker = LapTracker::new(&config)?;
        info!(
            "Race configured for track {} with {} laps",
            config.track.name, config.rules.total_laps
        );
        Ok(RaceModule {
            ctx,
            tracker,
            session: RaceSession::new(config.rules.clone()),
            vehicles: create_vehicles(&config.vehicles),
            clock,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            last_frame: None,
            last_published: None,
        })
    }

    /// Sets the period of the countdown tick.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn state(&self) -> RaceState {
        self.session.state()
    }

    pub fn vehicles(&self) -> &VehicleMap {
        &self.vehicles
    }

    fn on_marker_detections(&mut self, frame: &DetectionFrame) {
        let now = self.clock.now();
        let laps = self
            .tracker
            .process_frame(&mut self.vehicles, frame, now, &mut self.session);
        self.last_frame = Some(frame.frame);
        for lap in laps {
            let _ = self.ctx.publish_event(EventKind::LapCompletedEvent(lap));
        }
        self.publish_snapshot(now);
    }

    fn on_register_vehicles(&mut self, configs: &[VehicleConfig]) {
        if self.session.state() != RaceState::NotStarted {
            warn!("Ignoring participants, the race is already started");
            return;
        }
        if let Err(e) = validate_vehicles(configs) {
            warn!("Ignoring participants. Error: {e}");
            return;
        }
        self.vehicles = create_vehicles(configs);
        info!("Registered {} vehicles", self.vehicles.len());
        let now = self.clock.now();
        self.publish_snapshot(now);
    }

    fn on_start_countdown(&mut self) {
        let now = self.clock.now();
        if self.vehicles.is_empty() {
            warn!("Countdown not started, no vehicles registered");
            return;
        }
        if self.session.start_countdown(now) {
            self.publish_snapshot(now);
        }
    }

    fn on_reset(&mut self) {
        self.session.reset();
        self.vehicles.values_mut().for_each(Vehicle::reset);
        self.last_frame = None;
        let now = self.clock.now();
        self.publish_snapshot(now);
    }

    /// Advances the countdown and publishes a snapshot when the visible
    /// race state changed since the last one.
    fn on_tick(&mut self) {
        let now = self.clock.now();
        if self.session.state() == RaceState::Countdown
            && self.session.update_countdown(now) == Some(0)
            && self.session.start_race(now, self.vehicles.values_mut())
        {
            let _ = self.ctx.publish_event(EventKind::RaceStartedEvent);
        }

        let Some(last) = self.last_published.clone() else {
            self.publish_snapshot(now);
            return;
        };
        let snapshot = self.snapshot(now);
        let changed = snapshot.state != last.state
            || snapshot.countdown_remaining != last.countdown_remaining
            || snapshot.show_final_results != last.show_final_results
            || snapshot
                .vehicles
                .iter()
                .zip(&last.vehicles)
                .any(|(new, old)| new.show_lap_complete != old.show_lap_complete);
        if changed {
            self.publish(snapshot);
        }
    }

    /// Ranks the vehicles and copies the race state.
    fn snapshot(&mut self, now: Duration) -> RaceSnapshot {
        let ranked = rank_vehicles(self.vehicles.values_mut(), self.tracker.centerline());
        build_snapshot(&ranked, &self.tracker, &self.session, self.last_frame, now)
    }

    fn publish_snapshot(&mut self, now: Duration) {
        let snapshot = self.snapshot(now);
        self.publish(snapshot);
    }

    fn publish(&mut self, snapshot: RaceSnapshot) {
        let snapshot = RaceSnapshotPtr::new(snapshot);
        if snapshot.show_final_results
            && !self
                .last_published
                .as_ref()
                .is_some_and(|last| last.show_final_results)
        {
            info!("All vehicles finished, showing final results");
        }
        self.last_published = Some(snapshot.clone());
        let _ = self
            .ctx
            .publish_event(EventKind::RaceSnapshotEvent(snapshot));
    }
}

#[async_trait]
impl<C: RaceClock + Send> Module for RaceModule<C> {
    /// Runs the race event loop until a `QuitEvent` is received.
    async fn run(&mut self) -> Result<(), ()> {
        let mut ticker = tokio::time::interval(self.tick_interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::MarkerDetectionsEvent(frame) => {
                                    self.on_marker_detections(&frame);
                                }
                                EventKind::RegisterVehiclesEvent(configs) => {
                                    self.on_register_vehicles(&configs);
                                }
                                EventKind::StartCountdownEvent => {
                                    debug!("Start countdown requested");
                                    self.on_start_countdown();
                                }
                                EventKind::ResetRaceEvent => {
                                    debug!("Race reset requested");
                                    self.on_reset();
                                }
                                _ => (),
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("RaceModule lagged behind, {skipped} events dropped");
                        }
                        Err(RecvError::Closed) => {
                            error!("Event bus closed, stopping RaceModule");
                            run = false;
                        }
                    }
                }
                _ = ticker.tick() => self.on_tick(),
            }
        }
        Ok(())
    }
}
