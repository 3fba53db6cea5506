// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout primitives shared by the chart and legend builders.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;

use crate::mark::Mark;

/// A width/height pair in mark coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Measures single-line text for layout.
///
/// Shaping stays with the renderer; layout only needs rough extents for tick labels and legend
/// rows.
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the marks.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Estimates text extents from the character count.
#[derive(Clone, Copy, Debug)]
pub struct HeuristicTextMeasurer {
    /// Average glyph advance, in ems.
    pub glyph_width: f64,
}

impl Default for HeuristicTextMeasurer {
    fn default() -> Self {
        Self { glyph_width: 0.6 }
    }
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = self.glyph_width * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

/// A laid-out chart: every mark plus the rectangles needed to frame it.
#[derive(Clone, Debug)]
pub struct ChartLayout {
    /// Bounds of everything drawn, including outer padding.
    pub view: Rect,
    /// The plot area the bars occupy.
    pub plot: Rect,
    /// Generated marks, unsorted.
    pub marks: Vec<Mark>,
}

pub(crate) fn union_rect(a: Rect, b: Rect) -> Rect {
    Rect::new(
        a.x0.min(b.x0),
        a.y0.min(b.y0),
        a.x1.max(b.x1),
        a.y1.max(b.y1),
    )
}
