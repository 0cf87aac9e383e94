// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::path::Centerline;
use common::vehicle::Vehicle;
use std::cmp::Ordering;

/// Orders the vehicles by race position and stores the result in them.
///
/// - The lap progress of every vehicle is recomputed from its position.
///   Vehicles that were never seen get a progress of `0.0`.
/// - Finished vehicles come first, ordered by their final position.
/// - All other vehicles follow, the most completed laps first and within the
///   same lap the most progress first. Exact ties keep the input order.
///
/// Each vehicle's rank is set to its 1-based index in the returned order.
pub fn rank_vehicles<'a, I>(vehicles: I, centerline: &Centerline) -> Vec<&'a Vehicle>
where
    I: IntoIterator<Item = &'a mut Vehicle>,
{
    let mut finished = Vec::new();
    let mut active = Vec::new();
    for vehicle in vehicles {
        let progress = vehicle
            .position()
            .map_or(0.0, |position| centerline.lap_progress(position));
        vehicle.set_progress(progress);

        if vehicle.is_finished() && vehicle.final_position().is_some() {
            finished.push(vehicle);
        } else {
            active.push(vehicle);
        }
    }

    finished.sort_by_key(|v| v.final_position());
    active.sort_by(|a, b| {
        b.lap_count().cmp(&a.lap_count()).then_with(|| {
            b.progress()
                .partial_cmp(&a.progress())
                .unwrap_or(Ordering::Equal)
        })
    });

    finished
        .into_iter()
        .chain(active)
        .enumerate()
        .map(|(index, vehicle)| {
            vehicle.set_rank(index + 1);
            let vehicle: &'a Vehicle = vehicle;
            vehicle
        })
        .collect()
}
