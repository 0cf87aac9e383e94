use common::geometry::Point;
use detection::replay_source::{ReplayDetectionModule, read_detection_frames};
use module_core::{
    EventBus, EventKind, EventKindType, Module, payload_ref,
    test_helper::{stop_module, wait_for_event},
};
use std::time::Duration;

const RECORDING: &str = "\
frame,marker_id,x0,y0,x1,y1,x2,y2,x3,y3
1,0,10,10,30,10,30,30,10,30
1,2,100,100,120,100,120,120,100,120
2,0,12,10,32,10,32,30,12,30
4, 2, 101, 100, 121, 100, 121, 120, 101, 120
";

#[test]
fn rows_are_grouped_by_frame() {
    let frames = read_detection_frames(RECORDING.as_bytes()).unwrap();

    assert_eq!(
        frames.iter().map(|f| f.frame).collect::<Vec<_>>(),
        vec![1, 2, 4]
    );
    assert_eq!(frames[0].detections.len(), 2);
    assert_eq!(frames[0].detections[1].marker_id, 2);
    assert_eq!(frames[0].detections[1].corners[2], Point::new(120.0, 120.0));
    assert_eq!(frames[2].detections[0].corners[0], Point::new(101.0, 100.0));
}

#[test]
fn malformed_rows_are_reported() {
    let recording = "frame,marker_id,x0,y0,x1,y1,x2,y2,x3,y3\n1,0,10,10,30\n";
    assert!(read_detection_frames(recording.as_bytes()).is_err());

    let recording = "frame,marker_id,x0,y0,x1,y1,x2,y2,x3,y3\n1,red,1,1,1,1,1,1,1,1\n";
    assert!(read_detection_frames(recording.as_bytes()).is_err());
}

#[tokio::test]
#[test_log::test]
async fn frames_are_replayed_in_order() {
    let event_bus = EventBus::default();
    let mut rx = event_bus.subscribe();
    let frames = read_detection_frames(RECORDING.as_bytes()).unwrap();
    let mut module = ReplayDetectionModule::new(event_bus.context(), frames, Duration::from_millis(5));
    let mut handle = tokio::spawn(async move { module.run().await });

    for expected in [1, 2, 4] {
        let event = wait_for_event(
            &mut rx,
            Duration::from_millis(200),
            EventKindType::MarkerDetectionsEvent,
        )
        .await;
        let frame = payload_ref!(event.kind, EventKind::MarkerDetectionsEvent).unwrap();
        assert_eq!(frame.frame, expected);
    }

    stop_module(&event_bus, &mut handle).await;
}
