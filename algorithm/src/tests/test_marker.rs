use crate::marker::{ScaleModel, marker_centroid};
use common::{
    detection::MarkerDetection,
    geometry::{Corners, Point},
    race_config::MarkerConfig,
};

#[test]
fn centroid_of_square_marker() {
    let detection = MarkerDetection::square(7, Point::new(120.0, 80.0), 20.0);
    assert_eq!(marker_centroid(&detection.corners), Point::new(120.0, 80.0));
}

#[test]
fn centroid_of_skewed_marker() {
    let corners: Corners = [
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(6.0, 2.0),
        Point::new(2.0, 2.0),
    ];
    assert_eq!(marker_centroid(&corners), Point::new(3.0, 1.0));
}

#[test]
fn marker_size_and_distance() {
    let model = ScaleModel::new(&MarkerConfig::default());
    let detection = MarkerDetection::square(1, Point::new(0.0, 0.0), 64.0);

    assert_eq!(ScaleModel::marker_size(&detection.corners), 64.0);
    // 0.08 * 800 / 64
    assert!((model.distance(&detection.corners) - 1.0).abs() < 1e-9);
}

#[test]
fn visual_scale_is_bounded_below() {
    let model = ScaleModel::new(&MarkerConfig::default());

    let near = MarkerDetection::square(1, Point::new(0.0, 0.0), 640.0);
    // distance 0.1, so 0.2 / 0.1
    assert!((model.visual_scale(&near.corners) - 2.0).abs() < 1e-9);

    let far = MarkerDetection::square(1, Point::new(0.0, 0.0), 8.0);
    assert_eq!(model.visual_scale(&far.corners), 0.2);
}

#[test]
fn collapsed_marker_gets_minimal_scale() {
    let model = ScaleModel::new(&MarkerConfig::default());
    let corners: Corners = [Point::new(5.0, 5.0); 4];

    assert_eq!(model.distance(&corners), f64::INFINITY);
    assert_eq!(model.visual_scale(&corners), 0.2);
}
