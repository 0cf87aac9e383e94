// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::polygon::Polygon;
use common::{geometry::Point, race_config::ConfigError, track::TrackConfig};
use tracing::debug;

/// Returns the travelled distance at every point of `path`.
///
/// The first element is always `0.0` and the last one equals the total
/// length of the path. The result has as many elements as `path`.
pub fn cumulative_distances(path: &[Point]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(path.len());
    let mut total = 0.0;
    for (i, point) in path.iter().enumerate() {
        if i > 0 {
            total += path[i - 1].distance(point);
        }
        distances.push(total);
    }
    distances
}

/// Projects `point` orthogonally onto the segment `seg_start`..`seg_end`.
///
/// The projection is clamped to the extent of the segment.
///
/// # Returns
///
/// A tuple of the distance from `seg_start` to the projected point along the
/// segment and the distance of `point` to the projected point. A zero length
/// segment yields `(0.0, distance(point, seg_start))`.
pub fn project_point_to_segment(point: Point, seg_start: Point, seg_end: Point) -> (f64, f64) {
    let ab = seg_end - seg_start;
    let ap = point - seg_start;
    let ab_norm_sq = ab.dot(&ab);
    if ab_norm_sq == 0.0 {
        return (0.0, point.distance(&seg_start));
    }

    let t = (ap.dot(&ab) / ab_norm_sq).clamp(0.0, 1.0);
    let projection = seg_start + ab * t;
    (projection.distance(&seg_start), point.distance(&projection))
}

/// Returns the progress of `point` along `path`.
///
/// The segment closest to `point` wins; on equal distance the first one in
/// path order is taken. The progress is the cumulative distance up to that
/// segment plus the distance along it.
pub fn project_to_centerline(point: Point, path: &[Point]) -> f64 {
    project_with_distances(point, path, &cumulative_distances(path))
}

fn project_with_distances(point: Point, path: &[Point], cumulative: &[f64]) -> f64 {
    let mut best_progress = 0.0;
    let mut min_perp_distance = f64::INFINITY;
    for (i, segment) in path.windows(2).enumerate() {
        let (along, perp) = project_point_to_segment(point, segment[0], segment[1]);
        if perp < min_perp_distance {
            min_perp_distance = perp;
            best_progress = cumulative[i] + along;
        }
    }
    best_progress
}

/// Offsets the centerline by `width / 2` to both sides and returns the
/// closed outline of the resulting band.
///
/// Every vertex is moved along the average normal of its adjacent segments.
/// Zero length segments don't contribute a normal, they borrow the one of the
/// nearest proper segment instead. The outline lists the left side in path
/// order followed by the right side in reverse order.
///
/// Paths with fewer than two points or without any proper segment yield an
/// empty outline.
pub fn expand_path(path: &[Point], width: f64) -> Vec<Point> {
    if path.len() < 2 {
        return vec![];
    }

    let mut normals: Vec<Option<Point>> = path
        .windows(2)
        .map(|s| (s[1] - s[0]).normalized().map(|d| d.perpendicular()))
        .collect();
    // forward fill, then backward fill the gaps left by degenerate segments
    let mut last = None;
    for normal in normals.iter_mut() {
        if normal.is_none() {
            *normal = last;
        }
        last = *normal;
    }
    let mut next = None;
    for normal in normals.iter_mut().rev() {
        if normal.is_none() {
            *normal = next;
        }
        next = *normal;
    }
    let normals: Vec<Point> = match normals.into_iter().collect::<Option<Vec<_>>>() {
        Some(normals) => normals,
        None => return vec![],
    };

    let half_width = width / 2.0;
    let last_vertex = path.len() - 1;
    let mut left = Vec::with_capacity(path.len());
    let mut right = Vec::with_capacity(path.len());
    for (i, point) in path.iter().enumerate() {
        let normal = if i == 0 {
            normals[0]
        } else if i == last_vertex {
            normals[i - 1]
        } else {
            // a full reversal cancels both normals, keep the incoming one then
            (normals[i - 1] + normals[i])
                .normalized()
                .unwrap_or(normals[i - 1])
        };
        left.push(*point + normal * half_width);
        right.push(*point - normal * half_width);
    }
    right.reverse();
    left.extend(right);
    left
}

/// The validated centerline of a track with cached cumulative distances.
///
/// Lap progress is measured relative to a start point, so it reads zero at
/// the finish line and wraps modulo the total length.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    points: Vec<Point>,
    cumulative: Vec<f64>,
    start_offset: f64,
}

impl Centerline {
    /// Builds a centerline whose progress starts at its first point.
    ///
    /// # Errors
    ///
    /// Fails for fewer than two points, non finite coordinates and paths
    /// without any length.
    pub fn new(points: Vec<Point>) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::TooFewPathPoints(points.len()));
        }
        if !points.iter().all(Point::is_finite) {
            return Err(ConfigError::NonFinitePoint);
        }
        let cumulative = cumulative_distances(&points);
        if cumulative.last().copied().unwrap_or_default() <= 0.0 {
            return Err(ConfigError::ZeroLengthPath);
        }
        let degenerate = points.windows(2).filter(|s| s[0] == s[1]).count();
        if degenerate > 0 {
            debug!("Centerline contains {degenerate} zero length segments");
        }
        Ok(Centerline {
            points,
            cumulative,
            start_offset: 0.0,
        })
    }

    /// Builds the centerline of `track` normalized to its start point.
    pub fn from_track(track: &TrackConfig) -> Result<Self, ConfigError> {
        let start_point = track.start_point();
        if !start_point.is_finite() {
            return Err(ConfigError::NonFinitePoint);
        }
        Ok(Self::new(track.centerline.clone())?.with_start_point(start_point))
    }

    /// Moves the zero of the lap progress to the projection of `start_point`.
    pub fn with_start_point(mut self, start_point: Point) -> Self {
        self.start_offset = self.project(start_point);
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn cumulative_distances(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or_default()
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// Raw progress of `point` from the first centerline point.
    pub fn project(&self, point: Point) -> f64 {
        project_with_distances(point, &self.points, &self.cumulative)
    }

    /// Progress of `point` in the current lap, in `[0, total_length)`.
    pub fn lap_progress(&self, point: Point) -> f64 {
        let total = self.total_length();
        let progress = (self.project(point) - self.start_offset).rem_euclid(total);
        if progress >= total { 0.0 } else { progress }
    }

    /// The centerline point at lap `progress`, the inverse of
    /// [`Centerline::lap_progress`]. Progress wraps around the total length.
    pub fn point_at(&self, progress: f64) -> Point {
        let last_segment = self.points.len() - 2;
        let distance = (progress + self.start_offset).rem_euclid(self.total_length());
        let segment = self
            .cumulative
            .partition_point(|d| *d <= distance)
            .saturating_sub(1)
            .min(last_segment);
        let (start, end) = (self.points[segment], self.points[segment + 1]);
        let length = self.cumulative[segment + 1] - self.cumulative[segment];
        if length <= 0.0 {
            return start;
        }
        let t = ((distance - self.cumulative[segment]) / length).clamp(0.0, 1.0);
        start + (end - start) * t
    }

    /// Returns whether moving from `from` to `to` advanced along the track.
    ///
    /// Moves wrap around the start point, so a step shorter than half a lap is
    /// taken in the direction it is shortest.
    pub fn is_forward_move(&self, from: Point, to: Point) -> bool {
        let total = self.total_length();
        let delta = (self.lap_progress(to) - self.lap_progress(from)).rem_euclid(total);
        delta > 0.0 && delta < total / 2.0
    }

    /// The outline of the track band of the given `width`.
    pub fn band(&self, width: f64) -> Polygon {
        Polygon::new(expand_path(&self.points, width))
    }
}
