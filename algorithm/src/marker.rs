use common::{
    geometry::{Corners, Point},
    race_config::MarkerConfig,
};

/// The mean of the four marker corners.
pub fn marker_centroid(corners: &Corners) -> Point {
    let sum = corners
        .iter()
        .fold(Point::default(), |sum, corner| sum + *corner);
    sum * 0.25
}

/// Pinhole camera approximation of the distance between camera and marker.
///
/// The estimate only drives the size of the vehicle image in the overlay,
/// it is not metrically precise.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleModel {
    real_width: f64,
    focal_length: f64,
    initial_scale: f64,
    min_scale: f64,
}

impl ScaleModel {
    pub fn new(config: &MarkerConfig) -> Self {
        ScaleModel {
            real_width: config.real_width,
            focal_length: config.focal_length,
            initial_scale: config.initial_scale,
            min_scale: config.min_scale,
        }
    }

    /// Apparent marker size in pixels: the mean length of the two edges
    /// leaving the first corner.
    pub fn marker_size(corners: &Corners) -> f64 {
        (corners[0].distance(&corners[1]) + corners[0].distance(&corners[3])) / 2.0
    }

    /// Estimated camera distance. A collapsed marker is infinitely far away.
    pub fn distance(&self, corners: &Corners) -> f64 {
        let size = Self::marker_size(corners);
        if size > 0.0 {
            self.real_width * self.focal_length / size
        } else {
            f64::INFINITY
        }
    }

    /// Overlay scale of the vehicle image, never below the minimal scale.
    pub fn visual_scale(&self, corners: &Corners) -> f64 {
        let scale = self.initial_scale / self.distance(corners);
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.max(self.min_scale)
    }
}
