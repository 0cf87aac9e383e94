// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Geometry and ranking computations of the race tracker.
//!
//! Everything in here is free of side effects apart from the rank and
//! progress fields written by [`ranking::rank_vehicles`].

pub mod marker;
pub mod path;
pub mod polygon;
pub mod ranking;

pub use marker::{ScaleModel, marker_centroid};
pub use path::{
    Centerline, cumulative_distances, expand_path, project_point_to_segment,
    project_to_centerline,
};
pub use polygon::Polygon;
pub use ranking::rank_vehicles;

#[cfg(test)]
mod tests;
