// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Stand-ins for the external marker detector.

pub mod constant_source;
pub mod replay_source;
