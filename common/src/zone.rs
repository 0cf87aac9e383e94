use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// A rotated rectangle marking the finish or the checkpoint area.
///
/// `angle` is given in degrees and rotates the rectangle around its center,
/// the same convention the overlay uses to draw the zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
}

impl Zone {
    pub fn new(center: Point, width: f64, height: f64, angle: f64) -> Self {
        Zone {
            center,
            width,
            height,
            angle,
        }
    }

    /// Returns the four corners of the rotated rectangle.
    ///
    /// The corner order walks around the rectangle, so consecutive corners
    /// form its edges.
    pub fn corners(&self) -> [Point; 4] {
        let radians = self.angle.to_radians();
        let b = radians.cos() * 0.5;
        let a = radians.sin() * 0.5;
        let c = self.center;

        let p0 = Point::new(
            c.x - a * self.height - b * self.width,
            c.y + b * self.height - a * self.width,
        );
        let p1 = Point::new(
            c.x + a * self.height - b * self.width,
            c.y - b * self.height - a * self.width,
        );
        let p2 = Point::new(2.0 * c.x - p0.x, 2.0 * c.y - p0.y);
        let p3 = Point::new(2.0 * c.x - p1.x, 2.0 * c.y - p1.y);
        [p0, p1, p2, p3]
    }

    /// A zone is usable when it has a finite center and a positive area.
    pub fn has_area(&self) -> bool {
        self.center.is_finite()
            && self.angle.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}
