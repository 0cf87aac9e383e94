use common::snapshot::{RaceSnapshot, VehicleSnapshot};
use std::time::Duration;

/// Formats a race time as `m:ss.mmm`.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let minutes = millis / 60_000;
    let seconds = (millis / 1000) % 60;
    format!("{minutes}:{seconds:02}.{:03}", millis % 1000)
}

fn format_optional(duration: Option<Duration>) -> String {
    duration.map_or_else(|| "-:--.---".to_string(), format_duration)
}

fn format_vehicle(vehicle: &VehicleSnapshot, total_laps: u32) -> String {
    let rank = vehicle
        .rank
        .map_or_else(|| "-".to_string(), |rank| rank.to_string());
    let status = match vehicle.final_position {
        Some(position) => format!("finished P{position}"),
        None => format!("lap {}/{total_laps}", vehicle.display_lap),
    };
    format!(
        "{rank:>2}. {:<12} {status:<12} best {}  total {}",
        vehicle.name,
        format_optional(vehicle.best_lap),
        format_optional(vehicle.total_time)
    )
}

/// One line per vehicle in ranking order.
pub fn format_standings(snapshot: &RaceSnapshot) -> Vec<String> {
    snapshot
        .vehicles
        .iter()
        .map(|vehicle| format_vehicle(vehicle, snapshot.total_laps))
        .collect()
}
