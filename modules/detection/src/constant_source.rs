use algorithm::Centerline;
use common::{
    detection::{DetectionFrame, MarkerDetection},
    geometry::Point,
    vehicle::MarkerId,
};
use module_core::{Event, EventKind, Module, ModuleCtx};
use rand::Rng;
use std::{
    io::{Error, ErrorKind},
    sync::Arc,
    time::Duration,
};
use tokio::sync::broadcast::Sender;
use tracing::{debug, error};

/// Parameters of the simulated marker detector.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Speed of the fastest vehicle in pixels per second.
    pub speed: f64,
    /// Every following vehicle is this fraction slower than the one before.
    pub speed_spread: f64,
    /// Gap between the vehicles at the start, in pixels along the track.
    pub spacing: f64,
    /// Edge length of the square markers in pixels.
    pub marker_size: f64,
    /// Maximal random offset of a detection in pixels, per axis.
    pub jitter: f64,
    pub frame_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            speed: 150.0,
            speed_spread: 0.05,
            spacing: 40.0,
            marker_size: 40.0,
            jitter: 0.0,
            frame_interval: Duration::from_millis(33),
        }
    }
}

#[derive(Debug, Clone)]
struct SimulatedVehicle {
    marker_id: MarkerId,
    progress: f64,
    speed: f64,
}

/// Moves every vehicle along the centerline at its constant speed and
/// reports the markers the camera would see.
struct ConstantDetectionRuntime {
    centerline: Centerline,
    vehicles: Vec<SimulatedVehicle>,
    config: SimulationConfig,
    frame: u64,
}

impl ConstantDetectionRuntime {
    fn new(centerline: Centerline, vehicles: &[MarkerId], config: SimulationConfig) -> Self {
        let vehicles = vehicles
            .iter()
            .enumerate()
            .map(|(i, marker_id)| SimulatedVehicle {
                marker_id: *marker_id,
                progress: -(i as f64) * config.spacing,
                speed: config.speed * (1.0 - config.speed_spread).powi(i as i32),
            })
            .collect();
        ConstantDetectionRuntime {
            centerline,
            vehicles,
            config,
            frame: 0,
        }
    }

    fn next_frame(&mut self, rng: &mut impl Rng) -> DetectionFrame {
        let elapsed = self.config.frame_interval.as_secs_f64();
        let jitter = self.config.jitter;
        let detections = self
            .vehicles
            .iter_mut()
            .map(|vehicle| {
                vehicle.progress += vehicle.speed * elapsed;
                let mut center = self.centerline.point_at(vehicle.progress);
                if jitter > 0.0 {
                    center = center
                        + Point::new(
                            rng.random_range(-jitter..=jitter),
                            rng.random_range(-jitter..=jitter),
                        );
                }
                MarkerDetection::square(vehicle.marker_id, center, self.config.marker_size)
            })
            .collect();
        self.frame += 1;
        DetectionFrame::new(self.frame, detections)
    }
}

/// A marker detector stand-in that drives all vehicles around the track at
/// constant speed.
///
/// Frames are published as [`EventKind::MarkerDetectionsEvent`] every
/// [`SimulationConfig::frame_interval`].
pub struct ConstantDetectionModule {
    ctx: ModuleCtx,
    centerline: Centerline,
    vehicles: Vec<MarkerId>,
    config: SimulationConfig,
}

impl ConstantDetectionModule {
    pub fn new(
        ctx: ModuleCtx,
        centerline: Centerline,
        vehicles: &[MarkerId],
        config: SimulationConfig,
    ) -> Result<Self, Error> {
        if vehicles.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "no vehicles to simulate",
            ));
        }
        if config.frame_interval.is_zero() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "frame interval must not be zero",
            ));
        }
        Ok(ConstantDetectionModule {
            ctx,
            centerline,
            vehicles: vehicles.to_vec(),
            config,
        })
    }
}

#[async_trait::async_trait]
impl Module for ConstantDetectionModule {
    async fn run(&mut self) -> Result<(), ()> {
        let runtime = ConstantDetectionRuntime::new(
            self.centerline.clone(),
            &self.vehicles,
            self.config.clone(),
        );
        let sender = self.ctx.sender.clone();
        let detection_task_handle = tokio::spawn(constant_detection_task(sender, runtime));

        let mut run = true;
        while run {
            match self.ctx.receiver.recv().await {
                Ok(event) => {
                    if let EventKind::QuitEvent = event.kind {
                        detection_task_handle.abort();
                        run = false;
                    }
                }
                Err(e) => error!("Failed to receive event in ConstantDetectionModule. Error: {e}"),
            }
        }
        Ok(())
    }
}

async fn constant_detection_task(sender: Sender<Event>, mut runtime: ConstantDetectionRuntime) {
    let mut timer = tokio::time::interval(runtime.config.frame_interval);
    loop {
        timer.tick().await;
        let frame = {
            let mut rng = rand::rng();
            runtime.next_frame(&mut rng)
        };
        debug!("Simulated frame {}", frame.frame);
        let _ = sender.send(Event {
            kind: EventKind::MarkerDetectionsEvent(Arc::new(frame)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorithm::marker_centroid;
    use common::test_helper::track::get_track;

    fn runtime(config: SimulationConfig) -> ConstantDetectionRuntime {
        let centerline = Centerline::from_track(&get_track()).unwrap();
        ConstantDetectionRuntime::new(centerline, &[4, 7], config)
    }

    #[test]
    fn vehicles_follow_the_centerline() {
        let mut runtime = runtime(SimulationConfig {
            frame_interval: Duration::from_secs(1),
            ..SimulationConfig::default()
        });
        let mut rng = rand::rng();

        let frame = runtime.next_frame(&mut rng);
        assert_eq!(frame.frame, 1);
        assert_eq!(frame.detections.len(), 2);
        assert_eq!(frame.detections[0].marker_id, 4);
        // 150 px from the start point (150, 100) on the top straight
        assert_eq!(
            marker_centroid(&frame.detections[0].corners),
            Point::new(300.0, 100.0)
        );
        // 40 px behind at 95% of the speed
        let second = marker_centroid(&frame.detections[1].corners);
        assert!((second.x - 252.5).abs() < 1e-9);
        assert!((second.y - 100.0).abs() < 1e-9);

        assert_eq!(runtime.next_frame(&mut rng).frame, 2);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut runtime = runtime(SimulationConfig {
            speed: 0.0,
            spacing: 0.0,
            jitter: 3.0,
            ..SimulationConfig::default()
        });
        let mut rng = rand::rng();

        for _ in 0..50 {
            let frame = runtime.next_frame(&mut rng);
            for detection in frame.detections {
                let center = marker_centroid(&detection.corners);
                assert!((center.x - 150.0).abs() <= 3.0 + 1e-9);
                assert!((center.y - 100.0).abs() <= 3.0 + 1e-9);
            }
        }
    }
}
