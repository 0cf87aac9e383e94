use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Represents the race track painted below the overhead camera.
///
/// A track consists of a name, the ordered centerline points in pixel space,
/// the width of the driven band and an optional start point. The start point
/// is where lap progress reads zero, normally the finish line.
///
/// # Fields
///
/// - `name` – The name of the track (e.g., "Oval").
/// - `centerline` – Ordered centerline points. At least two are required.
/// - `width` – Width of the track band in pixels.
/// - `start_point` – Zero point of the lap progress. Defaults to the first centerline point.
///
/// # Example
///
/// ```rust
/// use common::{geometry::Point, track::TrackConfig};
///
/// let track = TrackConfig {
///     name: "Example Track".into(),
///     centerline: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
///     width: 10.0,
///     start_point: None,
/// };
/// assert_eq!(track.start_point(), Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub name: String,
    pub centerline: Vec<Point>,
    pub width: f64,
    #[serde(default)]
    pub start_point: Option<Point>,
}

impl TrackConfig {
    /// The point used to normalize lap progress, falling back to the first
    /// centerline point when none is configured.
    pub fn start_point(&self) -> Point {
        self.start_point
            .or_else(|| self.centerline.first().copied())
            .unwrap_or_default()
    }

    /// Creates a `TrackConfig` instance by deserializing it from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
