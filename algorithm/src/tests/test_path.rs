use crate::path::*;
use common::{geometry::Point, race_config::ConfigError, test_helper::track::get_track};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn cumulative_distances_are_prefix_sums() {
    let path = vec![p(0.0, 0.0), p(3.0, 4.0), p(3.0, 4.0), p(3.0, 10.0), p(0.0, 6.0)];

    let distances = cumulative_distances(&path);

    assert_eq!(distances, vec![0.0, 5.0, 5.0, 11.0, 16.0]);
    assert!(distances.windows(2).all(|d| d[0] <= d[1]));
}

#[test]
fn projection_onto_segment_is_clamped() {
    let (along, perp) = project_point_to_segment(p(50.0, 10.0), p(0.0, 0.0), p(100.0, 0.0));
    assert_close(along, 50.0);
    assert_close(perp, 10.0);

    let (along, perp) = project_point_to_segment(p(-30.0, 40.0), p(0.0, 0.0), p(100.0, 0.0));
    assert_close(along, 0.0);
    assert_close(perp, 50.0);

    let (along, perp) = project_point_to_segment(p(130.0, 0.0), p(0.0, 0.0), p(100.0, 0.0));
    assert_close(along, 100.0);
    assert_close(perp, 30.0);
}

#[test]
fn degenerate_segment_projects_to_its_start() {
    let (along, perp) = project_point_to_segment(p(3.0, 4.0), p(0.0, 0.0), p(0.0, 0.0));
    assert_eq!(along, 0.0);
    assert_close(perp, 5.0);
}

#[test]
fn perpendicular_offset_is_ignored() {
    let path = vec![p(0.0, 0.0), p(100.0, 0.0)];
    assert_close(project_to_centerline(p(50.0, 10.0), &path), 50.0);
}

#[test]
fn projection_picks_the_closest_segment() {
    let path = get_track().centerline;

    assert_close(project_to_centerline(p(300.0, 95.0), &path), 200.0);
    assert_close(project_to_centerline(p(505.0, 200.0), &path), 500.0);
    assert_close(project_to_centerline(p(300.0, 310.0), &path), 800.0);
    assert_close(project_to_centerline(p(90.0, 250.0), &path), 1050.0);
}

#[test]
fn centerline_rejects_invalid_paths() {
    assert!(matches!(
        Centerline::new(vec![p(1.0, 1.0)]),
        Err(ConfigError::TooFewPathPoints(1))
    ));
    assert!(matches!(
        Centerline::new(vec![p(1.0, 1.0), p(1.0, 1.0)]),
        Err(ConfigError::ZeroLengthPath)
    ));
    assert!(matches!(
        Centerline::new(vec![p(0.0, 0.0), p(f64::NAN, 1.0)]),
        Err(ConfigError::NonFinitePoint)
    ));
}

#[test]
fn lap_progress_wraps_at_the_start_point() {
    let centerline = Centerline::from_track(&get_track()).unwrap();

    assert_close(centerline.total_length(), 1200.0);
    assert_close(centerline.start_offset(), 50.0);
    assert_close(centerline.lap_progress(p(150.0, 100.0)), 0.0);
    assert_close(centerline.lap_progress(p(300.0, 100.0)), 150.0);
    assert_close(centerline.lap_progress(p(110.0, 100.0)), 1160.0);
}

#[test]
fn point_at_walks_the_lap() {
    let centerline = Centerline::from_track(&get_track()).unwrap();

    assert_eq!(centerline.point_at(0.0), p(150.0, 100.0));
    assert_eq!(centerline.point_at(400.0), p(500.0, 150.0));
    assert_eq!(centerline.point_at(1100.0), p(100.0, 150.0));
    assert_eq!(centerline.point_at(1200.0), p(150.0, 100.0));
    assert_eq!(centerline.point_at(-50.0), p(100.0, 100.0));
    assert_close(centerline.lap_progress(centerline.point_at(777.0)), 777.0);
}

#[test]
fn forward_moves_follow_the_driving_direction() {
    let centerline = Centerline::from_track(&get_track()).unwrap();

    assert!(centerline.is_forward_move(p(200.0, 100.0), p(210.0, 100.0)));
    assert!(!centerline.is_forward_move(p(210.0, 100.0), p(200.0, 100.0)));
    // crossing the start point still counts as moving forward
    assert!(centerline.is_forward_move(p(140.0, 100.0), p(160.0, 100.0)));
    // on the left straight the track is driven upwards
    assert!(centerline.is_forward_move(p(100.0, 250.0), p(100.0, 240.0)));
    assert!(!centerline.is_forward_move(p(150.0, 100.0), p(150.0, 100.0)));
}

#[test]
fn expanded_straight_path_is_a_rectangle() {
    let band = expand_path(&[p(0.0, 0.0), p(100.0, 0.0)], 10.0);

    assert_eq!(
        band,
        vec![p(0.0, 5.0), p(100.0, 5.0), p(100.0, -5.0), p(0.0, -5.0)]
    );
}

#[test]
fn expand_path_survives_zero_length_segments() {
    let band = expand_path(&[p(0.0, 0.0), p(0.0, 0.0), p(100.0, 0.0), p(100.0, 0.0)], 10.0);

    assert_eq!(band.len(), 8);
    assert!(band.iter().all(|point| point.is_finite()));
    assert!(band.iter().all(|point| (point.y.abs() - 5.0).abs() < 1e-9));
}

#[test]
fn expand_path_needs_two_points() {
    assert!(expand_path(&[p(0.0, 0.0)], 10.0).is_empty());
    assert!(expand_path(&[p(0.0, 0.0), p(0.0, 0.0)], 10.0).is_empty());
}

#[test]
fn track_band_contains_the_driven_line() {
    let track = get_track();
    let band = Centerline::from_track(&track).unwrap().band(track.width);

    assert!(band.contains(p(150.0, 100.0)));
    assert!(band.contains(p(300.0, 110.0)));
    assert!(band.contains(p(500.0, 200.0)));
    assert!(!band.contains(p(300.0, 200.0)));
    assert!(!band.contains(p(300.0, 50.0)));
}
