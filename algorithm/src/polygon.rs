use common::{geometry::Point, zone::Zone};

const EDGE_TOLERANCE: f64 = 1e-9;

/// A closed polygon given by its vertices in drawing order.
///
/// The last vertex connects back to the first one. Polygons don't need to be
/// convex; self overlapping outlines are evaluated with the even-odd rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Polygon { vertices }
    }

    /// The outline of a rotated rectangle zone.
    pub fn from_zone(zone: &Zone) -> Self {
        Polygon::new(zone.corners().to_vec())
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Tests whether `point` lies inside the polygon or on its boundary.
    ///
    /// Polygons with fewer than three vertices contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if is_on_segment(point, a, b) {
                return true;
            }
            if (a.y > point.y) != (b.y > point.y) {
                let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Tests whether both polygons share at least one point.
    pub fn intersects(&self, other: &Polygon) -> bool {
        let edges_cross = self
            .edges()
            .any(|(a, b)| other.edges().any(|(c, d)| segments_intersect(a, b, c, d)));
        edges_cross
            || self.vertices.iter().any(|v| other.contains(*v))
            || other.vertices.iter().any(|v| self.contains(*v))
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(&(c - a))
}

fn is_on_segment(p: Point, a: Point, b: Point) -> bool {
    let ab = b - a;
    let tolerance = EDGE_TOLERANCE * ab.length().max(1.0);
    if orientation(a, b, p).abs() > tolerance {
        return false;
    }
    p.x >= a.x.min(b.x) - tolerance
        && p.x <= a.x.max(b.x) + tolerance
        && p.y >= a.y.min(b.y) - tolerance
        && p.y <= a.y.max(b.y) + tolerance
}

fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    is_on_segment(a, c, d) || is_on_segment(b, c, d) || is_on_segment(c, a, b) || is_on_segment(d, a, b)
}
