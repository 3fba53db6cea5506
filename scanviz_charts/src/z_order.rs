// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for generated marks.
//!
//! Renderers sort by `(z_index, id)` for a deterministic paint order.

/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Stacked bar segments.
pub const SERIES_FILL: i32 = 0;

/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;

/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;
