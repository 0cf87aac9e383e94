use std::time::{Duration, Instant};

/// A trait for reading the current race time.
///
/// Every timestamp inside the race core (countdown start, race start, lap
/// times, cooldowns) is a [`Duration`] measured from the clock's epoch, so
/// implementations only need to agree on a fixed starting point.
///
/// The underlying time source should be monotonic to ensure that lap times
/// are not affected by system clock adjustments.
pub trait RaceClock {
    /// Returns the duration that has passed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// A [`RaceClock`] implementation backed by a monotonic clock.
///
/// The epoch is the moment the clock is created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceClock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}
