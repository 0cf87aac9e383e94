// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common Modul for the race tracker
//!
//! Provides the common data types that are used across every modul.

pub mod detection;
pub mod geometry;
pub mod race_clock;
pub mod race_config;
pub mod serde;
pub mod snapshot;
pub mod test_helper;
pub mod track;
pub mod vehicle;
pub mod zone;

#[cfg(test)]
mod tests;
