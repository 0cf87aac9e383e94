use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{Instant, timeout, timeout_at},
};
use tracing::debug;

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within 500 ms.
/// - The task returns an error (`Err(())`).
pub async fn stop_module(event_bus: &EventBus, handle: &mut tokio::task::JoinHandle<Result<(), ()>>) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    timeout(std::time::Duration::from_millis(500), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .expect("Module task panicked")
        .expect("Module returned an error");
}

/// Waits for the first event of type `exp_event` on `rx`.
///
/// Events of other types are skipped. A lagging receiver skips the dropped
/// events and keeps waiting.
///
/// # Panics
///
/// This function panics if no matching event is received within `duration`.
pub async fn wait_for_event(
    rx: &mut broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    wait_for_event_where(rx, duration, exp_event, |_| true).await
}

/// Waits for the first event of type `exp_event` on `rx` that satisfies
/// `predicate`.
///
/// # Panics
///
/// This function panics if no matching event is received within `duration`.
pub async fn wait_for_event_where<P>(
    rx: &mut broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
    predicate: P,
) -> Event
where
    P: Fn(&EventKind) -> bool,
{
    let deadline = Instant::now() + duration;
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) => {
                if event.event_type() == exp_event && predicate(&event.kind) {
                    return event;
                }
            }
            Ok(Err(RecvError::Lagged(skipped))) => {
                debug!("Test receiver lagged, skipped {skipped} events");
            }
            Ok(Err(RecvError::Closed)) | Err(_) => break,
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}

/// Asserts that no event of type `event_type` arrives on `rx` within
/// `duration`.
pub async fn assert_no_event(
    rx: &mut broadcast::Receiver<Event>,
    duration: std::time::Duration,
    event_type: EventKindType,
) {
    let deadline = Instant::now() + duration;
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) => assert_ne!(
                event.event_type(),
                event_type,
                "Unexpected event {:?}",
                event.kind
            ),
            Ok(Err(RecvError::Lagged(_))) => (),
            Ok(Err(RecvError::Closed)) | Err(_) => return,
        }
    }
}
