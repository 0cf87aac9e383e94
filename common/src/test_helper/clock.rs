use crate::race_clock::RaceClock;
use std::sync::mpsc;
use std::time::Duration;

/// A test implementation of [`RaceClock`] that allows deterministic control
/// of the race time in unit tests.
///
/// Internally, it uses an [`mpsc::channel`] to receive externally provided
/// times, and a [`Mutex`](std::sync::Mutex) to hold the latest received value
/// so the clock can move into a spawned module task.
pub struct TestClock {
    sender: mpsc::Sender<Duration>,
    receiver: std::sync::Mutex<mpsc::Receiver<Duration>>,
    now: std::sync::Mutex<Duration>,
}

impl Default for TestClock {
    /// Creates a new clock standing at zero.
    fn default() -> Self {
        let (tx, rx) = mpsc::channel::<Duration>();
        Self {
            sender: tx,
            receiver: std::sync::Mutex::new(rx),
            now: std::sync::Mutex::new(Duration::ZERO),
        }
    }
}

impl TestClock {
    /// Returns a clone of the internal sender used to move the clock from
    /// outside.
    pub fn sender(&self) -> mpsc::Sender<Duration> {
        self.sender.clone()
    }

    /// Takes the newest pending time from the channel, if any.
    fn receive(&self) -> Duration {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        let receiver = self.receiver.lock().unwrap_or_else(|e| e.into_inner());
        while let Ok(time) = receiver.try_recv() {
            *now = time;
        }
        *now
    }
}

impl RaceClock for TestClock {
    fn now(&self) -> Duration {
        self.receive()
    }
}

/// Sends `time` to a [`TestClock`] through the provided sender.
///
/// Panics if sending fails, for example if the clock has been dropped.
pub fn set_clock_time(sender: &mpsc::Sender<Duration>, time: Duration) {
    sender
        .send(time)
        .unwrap_or_else(|_| panic!("Failed to send time to the test clock"));
}
