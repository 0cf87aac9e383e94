use crate::{geometry::Point, zone::Zone};

fn assert_point_eq(actual: Point, expected: Point) {
    assert!(
        actual.distance(&expected) < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn unrotated_zone_corners() {
    let zone = Zone::new(Point::new(150.0, 100.0), 60.0, 40.0, 0.0);

    let corners = zone.corners();

    assert_point_eq(corners[0], Point::new(120.0, 120.0));
    assert_point_eq(corners[1], Point::new(120.0, 80.0));
    assert_point_eq(corners[2], Point::new(180.0, 80.0));
    assert_point_eq(corners[3], Point::new(180.0, 120.0));
}

#[test]
fn quarter_turn_swaps_extents() {
    let zone = Zone::new(Point::new(0.0, 0.0), 60.0, 40.0, 90.0);

    let corners = zone.corners();
    let max_x = corners.iter().map(|p| p.x).fold(f64::MIN, f64::max);
    let max_y = corners.iter().map(|p| p.y).fold(f64::MIN, f64::max);

    assert!((max_x - 20.0).abs() < 1e-9);
    assert!((max_y - 30.0).abs() < 1e-9);
}

#[test]
fn zone_without_area_is_rejected() {
    assert!(Zone::new(Point::new(0.0, 0.0), 10.0, 5.0, 45.0).has_area());
    assert!(!Zone::new(Point::new(0.0, 0.0), 0.0, 5.0, 0.0).has_area());
    assert!(!Zone::new(Point::new(0.0, 0.0), 10.0, -1.0, 0.0).has_area());
    assert!(!Zone::new(Point::new(f64::NAN, 0.0), 10.0, 5.0, 0.0).has_area());
}
