use common::{
    detection::{DetectionFrame, MarkerDetection},
    geometry::Point,
    vehicle::MarkerId,
};
use module_core::{Event, EventKind, Module, ModuleCtx};
use serde::Deserialize;
use std::{io::Read, path::Path, sync::Arc, time::Duration};
use tokio::sync::broadcast::Sender;
use tracing::{debug, error, info};

/// One row of a recorded detection file.
///
/// Files have a header line `frame,marker_id,x0,y0,x1,y1,x2,y2,x3,y3` and
/// one row per detected marker. Rows of the same frame are consecutive.
#[derive(Debug, Deserialize)]
struct DetectionRecord {
    frame: u64,
    marker_id: MarkerId,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
}

impl DetectionRecord {
    fn detection(&self) -> MarkerDetection {
        MarkerDetection::new(
            self.marker_id,
            [
                Point::new(self.x0, self.y0),
                Point::new(self.x1, self.y1),
                Point::new(self.x2, self.y2),
                Point::new(self.x3, self.y3),
            ],
        )
    }
}

/// Reads recorded detections and groups consecutive rows of the same frame.
pub fn read_detection_frames<R: Read>(reader: R) -> Result<Vec<DetectionFrame>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut frames: Vec<DetectionFrame> = Vec::new();
    for result in rdr.deserialize() {
        let record: DetectionRecord = result?;
        let detection = record.detection();
        match frames.last_mut() {
            Some(frame) if frame.frame == record.frame => frame.detections.push(detection),
            _ => frames.push(DetectionFrame::new(record.frame, vec![detection])),
        }
    }
    debug!("Read {} detection frames", frames.len());
    Ok(frames)
}

/// Replays recorded detection frames in a fixed frame interval.
///
/// The replay runs once, afterwards the module idles until it is stopped.
pub struct ReplayDetectionModule {
    ctx: ModuleCtx,
    frames: Arc<Vec<DetectionFrame>>,
    frame_interval: Duration,
}

impl ReplayDetectionModule {
    pub fn new(ctx: ModuleCtx, frames: Vec<DetectionFrame>, frame_interval: Duration) -> Self {
        ReplayDetectionModule {
            ctx,
            frames: Arc::new(frames),
            frame_interval,
        }
    }

    /// Creates the module from a recorded CSV file.
    pub fn from_path(
        ctx: ModuleCtx,
        path: &Path,
        frame_interval: Duration,
    ) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        let frames = read_detection_frames(file)?;
        Ok(Self::new(ctx, frames, frame_interval))
    }
}

#[async_trait::async_trait]
impl Module for ReplayDetectionModule {
    async fn run(&mut self) -> Result<(), ()> {
        let frames = self.frames.clone();
        let sender = self.ctx.sender.clone();
        let interval = self.frame_interval.max(Duration::from_millis(1));
        let replay_task_handle = tokio::spawn(replay_task(sender, frames, interval));

        let mut run = true;
        while run {
            match self.ctx.receiver.recv().await {
                Ok(event) => {
                    if let EventKind::QuitEvent = event.kind {
                        replay_task_handle.abort();
                        run = false;
                    }
                }
                Err(e) => error!("Failed to receive event in ReplayDetectionModule. Error: {e}"),
            }
        }
        Ok(())
    }
}

async fn replay_task(sender: Sender<Event>, frames: Arc<Vec<DetectionFrame>>, interval: Duration) {
    let mut timer = tokio::time::interval(interval);
    for frame in frames.iter() {
        timer.tick().await;
        let _ = sender.send(Event {
            kind: EventKind::MarkerDetectionsEvent(Arc::new(frame.clone())),
        });
    }
    info!("Replay of {} frames finished", frames.len());
}
