// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{
    detection::DetectionFrame, race_config::VehicleConfig, snapshot::RaceSnapshot,
    vehicle::LapRecord,
};
use std::sync::Arc;
use strum_macros::EnumDiscriminants;
use tokio::sync::broadcast::{self, error::SendError};

/// A message exchanged between the race modules over the [`EventBus`].
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
}

impl Event {
    /// Returns the payload free type of the event.
    pub fn event_type(&self) -> EventKindType {
        EventKindType::from(&self.kind)
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Event { kind }
    }
}

/// A shared pointer to the markers detected in one camera frame.
pub type DetectionFramePtr = Arc<DetectionFrame>;

/// A shared pointer to the participants selected before a race.
pub type VehicleConfigsPtr = Arc<Vec<VehicleConfig>>;

/// A shared pointer to an immutable copy of the race state.
///
/// Renderers only ever see snapshots, never the vehicles the race module
/// is mutating.
pub type RaceSnapshotPtr = Arc<RaceSnapshot>;

/// Everything that happens during a race session.
///
/// [`EventKindType`] is the payload free discriminant of every variant and is
/// used to wait for or filter events by type.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Every module stops its loop and returns.
    QuitEvent,

    /// The result of the external marker detector for one camera frame.
    MarkerDetectionsEvent(DetectionFramePtr),

    /// Replaces the participants of the next race.
    ///
    /// Only honoured while no race is started.
    RegisterVehiclesEvent(VehicleConfigsPtr),

    /// Starts the countdown of a new race.
    StartCountdownEvent,

    /// Stops the race and clears all race state of the vehicles.
    ResetRaceEvent,

    /// The countdown is over and laps are counted from now on.
    RaceStartedEvent,

    /// A vehicle completed a lap.
    LapCompletedEvent(LapRecord),

    /// The race state after a processed frame or countdown tick.
    RaceSnapshotEvent(RaceSnapshotPtr),
}

/// Returns a reference to the payload of `$kind` when it is the variant
/// `$variant`, `None` otherwise.
///
/// ```
/// use module_core::{EventKind, payload_ref};
/// use common::vehicle::LapRecord;
///
/// let record = LapRecord { marker_id: 2, lap: 1, lap_time: None, final_position: None };
/// let kind = EventKind::LapCompletedEvent(record);
/// assert_eq!(payload_ref!(kind, EventKind::LapCompletedEvent), Some(&record));
/// assert!(payload_ref!(kind, EventKind::RaceSnapshotEvent).is_none());
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

/// Fan-out of [`Event`]s to every module of the race, backed by a
/// [`tokio::sync::broadcast::channel`].
///
/// Every subscriber gets its own clone of an event. Events published while
/// nobody is subscribed are dropped.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Number of events a slow subscriber may lag behind before it misses some.
    pub const CAPACITY: usize = 256;

    /// Creates a bus buffering up to [`Self::CAPACITY`] events per subscriber.
    ///
    /// Subscribers that fall further behind lose the oldest events.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        EventBus { sender }
    }

    /// Returns a receiver for all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Sends `event` to all current subscribers.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates the bus access for one [`Module`].
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A task of the race application that talks to the others only over the
/// [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until a [`EventKind::QuitEvent`] is
    /// received.
    async fn run(&mut self) -> Result<(), ()>;
}

/// The bus access of a single module.
pub struct ModuleCtx {
    pub sender: broadcast::Sender<Event>,

    /// Subscribed when the context is created, events published before the
    /// module runs are queued here.
    pub receiver: broadcast::Receiver<Event>,
}

impl ModuleCtx {
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Publishes `kind` to every subscriber of the bus.
    ///
    /// Returns the number of subscribers that received the event.
    pub fn publish_event(&self, kind: EventKind) -> Result<usize, SendError<Event>> {
        self.sender.send(Event { kind })
    }

    /// Returns a new receiver for events published from now on.
    pub fn receiver(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

pub mod test_helper;
