// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Text rendition of the race for terminals and logs.

use async_trait::async_trait;
use common::{
    snapshot::{RaceSnapshot, RaceState},
    vehicle::LapRecord,
};
use module_core::{EventKind, Module, ModuleCtx};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

mod format;

pub use format::{format_duration, format_standings};


/// Turns the stream of race events into announcement lines.
///
/// Only changes are announced, repeated snapshots of the same race state
/// produce no output.
#[derive(Debug, Default)]
pub struct Leaderboard {
    last: Option<RaceSnapshot>,
    results_announced: bool,
}

impl Leaderboard {
    pub fn new() -> Self {
        Leaderboard::default()
    }

    pub fn on_snapshot(&mut self, snapshot: &RaceSnapshot) -> Vec<String> {
        let mut lines = Vec::new();
        let previous_state = self.last.as_ref().map(|last| last.state);
        let previous_countdown = self.last.as_ref().and_then(|last| last.countdown_remaining);

        if snapshot.state == RaceState::NotStarted && previous_state != Some(RaceState::NotStarted)
        {
            lines.push(format!(
                "Waiting for start, {} vehicles over {} laps",
                snapshot.vehicles.len(),
                snapshot.total_laps
            ));
            self.results_announced = false;
        }

        if snapshot.state == RaceState::Countdown {
            if let Some(remaining) = snapshot.countdown_remaining {
                if previous_countdown != Some(remaining) && remaining > 0 {
                    lines.push(format!("{remaining}..."));
                }
            }
        }

        if snapshot.state == RaceState::Running && previous_state != Some(RaceState::Running) {
            lines.push("GO!".to_string());
        }

        if snapshot.show_final_results && !self.results_announced {
            self.results_announced = true;
            lines.push("Final results".to_string());
            lines.extend(format_standings(snapshot));
        }

        self.last = Some(snapshot.clone());
        lines
    }

    /// Announces a completed lap, using the names of the last snapshot.
    pub fn on_lap_completed(&self, record: &LapRecord) -> Vec<String> {
        let name = self
            .last
            .as_ref()
            .and_then(|snapshot| snapshot.vehicle(record.marker_id))
            .map_or_else(|| format!("Marker {}", record.marker_id), |v| v.name.clone());
        let lap_time = record
            .lap_time
            .map_or_else(|| "no time".to_string(), format_duration);

        let mut lines = vec![format!("{name} completed lap {} in {lap_time}", record.lap)];
        if let Some(position) = record.final_position {
            lines.push(format!("{name} finished in position {position}"));
        }
        lines
    }
}

/// Logs the [`Leaderboard`] announcements of the running race.
pub struct LeaderboardModule {
    ctx: ModuleCtx,
    board: Leaderboard,
}

impl LeaderboardModule {
    pub fn new(ctx: ModuleCtx) -> Self {
        LeaderboardModule {
            ctx,
            board: Leaderboard::new(),
        }
    }

    fn announce(lines: Vec<String>) {
        for line in lines {
            info!("{line}");
        }
    }
}

#[async_trait]
impl Module for LeaderboardModule {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            match self.ctx.receiver.recv().await {
                Ok(event) => match event.kind {
                    EventKind::QuitEvent => run = false,
                    EventKind::RaceSnapshotEvent(snapshot) => {
                        Self::announce(self.board.on_snapshot(&snapshot));
                    }
                    EventKind::LapCompletedEvent(record) => {
                        Self::announce(self.board.on_lap_completed(&record));
                    }
                    _ => (),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Leaderboard skipped {skipped} events");
                }
                Err(RecvError::Closed) => {
                    error!("Event bus closed, stopping leaderboard");
                    run = false;
                }
            }
        }
        Ok(())
    }
}
