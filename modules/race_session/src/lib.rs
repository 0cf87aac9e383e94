use chrono::{DateTime, Utc};
use common::{
    race_config::RaceRules,
    snapshot::RaceState,
    vehicle::{FinishOrder, Vehicle},
};
use std::time::Duration;
use tracing::{debug, info};

/// Race wide temporal state: countdown, race start and finish order.
///
/// The session does not own the vehicles. Operations that touch them take
/// the vehicles as an argument, so the caller decides how they are stored.
///
/// Misuse never panics. Transitions that are not valid from the current
/// state are ignored and reported with `false`.
#[derive(Debug, Clone)]
pub struct RaceSession {
    rules: RaceRules,
    state: RaceState,
    countdown_start_time: Option<Duration>,
    race_start_time: Option<Duration>,
    race_started_at: Option<DateTime<Utc>>,
    finish_order: FinishOrder,
}

impl RaceSession {
    pub fn new(rules: RaceRules) -> Self {
        RaceSession {
            rules,
            state: RaceState::NotStarted,
            countdown_start_time: None,
            race_start_time: None,
            race_started_at: None,
            finish_order: FinishOrder::default(),
        }
    }

    /// Starts the countdown at `now`.
    ///
    /// Only valid while the race is not started, a running countdown is not
    /// restarted.
    pub fn start_countdown(&mut self, now: Duration) -> bool {
        if self.state != RaceState::NotStarted {
            debug!("Countdown not started, race is in state {:?}", self.state);
            return false;
        }
        self.state = RaceState::Countdown;
        self.countdown_start_time = Some(now);
        info!(
            "Countdown started, race starts in {:?}",
            self.rules.countdown_duration
        );
        true
    }

    /// Returns the whole seconds left on the countdown, rounded up.
    ///
    /// `None` when no countdown is running. Once the countdown ran out this
    /// stays at `0` until [`RaceSession::start_race`] is called.
    pub fn update_countdown(&self, now: Duration) -> Option<u32> {
        let start = self.countdown_start_time?;
        let remaining = self
            .rules
            .countdown_duration
            .saturating_sub(now.saturating_sub(start));
        let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        Some(u32::try_from(seconds).unwrap_or(u32::MAX))
    }

    /// Starts the race at `now` once the countdown reached zero.
    ///
    /// Every vehicle starts its first lap at the race start. Calls before
    /// the end of the countdown and repeated calls are ignored.
    pub fn start_race<'a, I>(&mut self, now: Duration, vehicles: I) -> bool
    where
        I: IntoIterator<Item = &'a mut Vehicle>,
    {
        if self.state == RaceState::Running {
            return false;
        }
        if self.update_countdown(now) != Some(0) {
            debug!("Race start ignored, countdown is not finished");
            return false;
        }

        self.state = RaceState::Running;
        self.countdown_start_time = None;
        self.race_start_time = Some(now);
        self.race_started_at = Some(Utc::now());
        for vehicle in vehicles {
            vehicle.set_last_lap_time(now);
        }
        info!("Race started");
        true
    }

    /// Returns the session to [`RaceState::NotStarted`] and forgets the
    /// finish order.
    ///
    /// The vehicles have to be reset by the caller.
    pub fn reset(&mut self) {
        self.state = RaceState::NotStarted;
        self.countdown_start_time = None;
        self.race_start_time = None;
        self.race_started_at = None;
        self.finish_order.clear();
        info!("Race session reset");
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RaceState::Running
    }

    pub fn rules(&self) -> &RaceRules {
        &self.rules
    }

    pub fn cooldown_time(&self) -> Duration {
        self.rules.cooldown_time
    }

    pub fn total_laps(&self) -> u32 {
        self.rules.total_laps
    }

    pub fn countdown_start_time(&self) -> Option<Duration> {
        self.countdown_start_time
    }

    pub fn race_start_time(&self) -> Option<Duration> {
        self.race_start_time
    }

    /// Wall clock time of the race start.
    pub fn race_started_at(&self) -> Option<DateTime<Utc>> {
        self.race_started_at
    }

    /// Time since the race start, `None` before the race started.
    pub fn race_elapsed(&self, now: Duration) -> Option<Duration> {
        self.race_start_time.map(|start| now.saturating_sub(start))
    }

    pub fn finish_order(&self) -> &FinishOrder {
        &self.finish_order
    }

    pub fn finish_order_mut(&mut self) -> &mut FinishOrder {
        &mut self.finish_order
    }

    /// Whether every vehicle finished. A race without vehicles never
    /// finishes.
    pub fn all_finished<'a, I>(vehicles: I) -> bool
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let mut any = false;
        for vehicle in vehicles {
            if !vehicle.is_finished() {
                return false;
            }
            any = true;
        }
        any
    }

    /// Whether the final ranking is due: all vehicles finished and the
    /// final results delay passed since the last one crossed the line.
    pub fn show_final_results<'a, I>(&self, vehicles: I, now: Duration) -> bool
    where
        I: IntoIterator<Item = &'a Vehicle> + Clone,
    {
        if !Self::all_finished(vehicles.clone()) {
            return false;
        }
        vehicles
            .into_iter()
            .filter_map(Vehicle::finish_time)
            .max()
            .is_some_and(|last| now.saturating_sub(last) >= self.rules.final_results_delay)
    }
}
