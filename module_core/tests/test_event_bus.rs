use common::vehicle::LapRecord;
use module_core::{
    test_helper::{assert_no_event, stop_module, wait_for_event, wait_for_event_where},
    *,
};
use std::time::Duration;

struct EchoModule {
    ctx: ModuleCtx,
}

#[async_trait::async_trait]
impl Module for EchoModule {
    async fn run(&mut self) -> Result<(), ()> {
        loop {
            match self.ctx.receiver.recv().await {
                Ok(event) => match event.kind {
                    EventKind::QuitEvent => return Ok(()),
                    EventKind::StartCountdownEvent => {
                        let _ = self.ctx.publish_event(EventKind::RaceStartedEvent);
                    }
                    _ => (),
                },
                Err(_) => return Err(()),
            }
        }
    }
}

fn lap_record(marker_id: u32, lap: u32) -> LapRecord {
    LapRecord {
        marker_id,
        lap,
        lap_time: Some(Duration::from_secs(9)),
        final_position: None,
    }
}

#[tokio::test]
#[test_log::test]
pub async fn events_delivered() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let event = Event {
        kind: EventKind::QuitEvent,
    };
    event_bus.publish(&event);
    let received_event = tokio::time::timeout(Duration::from_millis(100), receiver.recv())
        .await
        .expect("Failed to receive event in required time")
        .unwrap();
    assert_eq!(received_event.event_type(), EventKindType::QuitEvent);
}

#[tokio::test]
#[test_log::test]
pub async fn context_receives_events_published_before_run() {
    let event_bus = EventBus::new();
    let mut ctx = event_bus.context();
    event_bus.publish(&EventKind::ResetRaceEvent.into());

    let event = ctx.receiver.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::ResetRaceEvent);
}

#[tokio::test]
#[test_log::test]
pub async fn wait_for_event_skips_other_types() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    event_bus.publish(&EventKind::StartCountdownEvent.into());
    event_bus.publish(&EventKind::LapCompletedEvent(lap_record(3, 1)).into());

    let event = wait_for_event(
        &mut receiver,
        Duration::from_millis(100),
        EventKindType::LapCompletedEvent,
    )
    .await;
    let record = payload_ref!(event.kind, EventKind::LapCompletedEvent).unwrap();
    assert_eq!(record.marker_id, 3);
}

#[tokio::test]
#[test_log::test]
pub async fn wait_for_event_with_predicate() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    for lap in 1..=3 {
        event_bus.publish(&EventKind::LapCompletedEvent(lap_record(0, lap)).into());
    }

    let event = wait_for_event_where(
        &mut receiver,
        Duration::from_millis(100),
        EventKindType::LapCompletedEvent,
        |kind| payload_ref!(kind, EventKind::LapCompletedEvent).is_some_and(|r| r.lap == 3),
    )
    .await;
    assert_eq!(
        payload_ref!(event.kind, EventKind::LapCompletedEvent).map(|r| r.lap),
        Some(3)
    );
}

#[tokio::test]
#[test_log::test]
#[should_panic(expected = "Failed to receive event of type RaceStartedEvent")]
pub async fn wait_for_event_times_out() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    wait_for_event(
        &mut receiver,
        Duration::from_millis(20),
        EventKindType::RaceStartedEvent,
    )
    .await;
}

#[tokio::test]
#[test_log::test]
pub async fn module_answers_and_stops() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let mut module = EchoModule {
        ctx: event_bus.context(),
    };
    let mut handle = tokio::spawn(async move { module.run().await });

    assert_no_event(
        &mut receiver,
        Duration::from_millis(20),
        EventKindType::RaceStartedEvent,
    )
    .await;
    event_bus.publish(&EventKind::StartCountdownEvent.into());
    wait_for_event(
        &mut receiver,
        Duration::from_millis(100),
        EventKindType::RaceStartedEvent,
    )
    .await;

    stop_module(&event_bus, &mut handle).await;
}
