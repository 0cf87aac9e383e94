use common::{
    snapshot::{RaceSnapshot, VehicleSnapshot},
    vehicle::Vehicle,
};
use lap_tracker::LapTracker;
use race_session::RaceSession;
use std::time::Duration;

/// Lap number shown to spectators.
///
/// The counter stores completed laps, so the lap being driven is one more,
/// capped at the last lap for finished vehicles.
pub fn display_lap(lap_count: u32, total_laps: u32) -> u32 {
    lap_count.saturating_add(1).min(total_laps)
}

fn vehicle_snapshot(
    vehicle: &Vehicle,
    tracker: &LapTracker,
    session: &RaceSession,
    now: Duration,
) -> VehicleSnapshot {
    let rules = session.rules();
    VehicleSnapshot {
        marker_id: vehicle.marker_id(),
        name: vehicle.name().to_string(),
        color: vehicle.color(),
        position: vehicle.position(),
        scale_factor: vehicle.scale_factor(),
        lap_count: vehicle.lap_count(),
        display_lap: display_lap(vehicle.lap_count(), rules.total_laps),
        finished: vehicle.is_finished(),
        lap_times: vehicle.lap_times().to_vec(),
        best_lap: vehicle.best_lap_time(),
        total_time: session
            .race_start_time()
            .map(|start| vehicle.total_race_time(start, now)),
        progress: vehicle.progress(),
        rank: vehicle.rank(),
        final_position: vehicle.final_position(),
        on_track: vehicle
            .position()
            .is_some_and(|position| tracker.is_on_track(position)),
        show_lap_complete: vehicle.shows_lap_complete(now, rules.lap_complete_duration),
    }
}

/// Copies the race state for renderers.
///
/// `ranked` must hold the vehicles in ranking order.
pub fn build_snapshot(
    ranked: &[&Vehicle],
    tracker: &LapTracker,
    session: &RaceSession,
    frame: Option<u64>,
    now: Duration,
) -> RaceSnapshot {
    RaceSnapshot {
        frame,
        state: session.state(),
        countdown_remaining: session.update_countdown(now),
        race_elapsed: session.race_elapsed(now),
        race_started_at: session.race_started_at(),
        total_laps: session.total_laps(),
        all_finished: RaceSession::all_finished(ranked.iter().copied()),
        show_final_results: session.show_final_results(ranked.iter().copied(), now),
        vehicles: ranked
            .iter()
            .map(|vehicle| vehicle_snapshot(vehicle, tracker, session, now))
            .collect(),
    }
}
