use crate::{
    geometry::{Corners, Point},
    vehicle::MarkerId,
};
use serde::{Deserialize, Serialize};

/// A single marker found by the external marker detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerDetection {
    pub marker_id: MarkerId,
    pub corners: Corners,
}

impl MarkerDetection {
    pub fn new(marker_id: MarkerId, corners: Corners) -> Self {
        MarkerDetection { marker_id, corners }
    }

    /// Builds an axis aligned square detection of `size` pixels around
    /// `center`, in the corner order of the detector.
    pub fn square(marker_id: MarkerId, center: Point, size: f64) -> Self {
        let half = size / 2.0;
        MarkerDetection {
            marker_id,
            corners: [
                Point::new(center.x - half, center.y - half),
                Point::new(center.x + half, center.y - half),
                Point::new(center.x + half, center.y + half),
                Point::new(center.x - half, center.y + half),
            ],
        }
    }
}

/// All markers detected in one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    /// Sequence number of the camera frame.
    pub frame: u64,
    pub detections: Vec<MarkerDetection>,
}

impl DetectionFrame {
    pub fn new(frame: u64, detections: Vec<MarkerDetection>) -> Self {
        DetectionFrame { frame, detections }
    }
}
