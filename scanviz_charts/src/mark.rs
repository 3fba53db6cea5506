// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-neutral marks.
//!
//! Layout produces a flat list of rects and text runs with stable ids; renderers (SVG, a canvas,
//! a GPU scene) only need to paint them in `(z_index, id)` order.

extern crate alloc;

use alloc::string::String;

use kurbo::{Point, Rect};
use peniko::Brush;

use crate::layout::TextMeasurer;

/// Horizontal text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// The anchor is on the vertical center of the text.
    Middle,
    /// The anchor is on the alphabetic baseline.
    Alphabetic,
    /// The anchor is on the top of the text.
    Hanging,
}

/// A single line of unshaped text.
#[derive(Clone, Debug)]
pub struct TextMark {
    /// Anchor position.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in mark units.
    pub font_size: f64,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Text paint.
    pub fill: Brush,
}

impl TextMark {
    /// Estimated bounds of the text.
    pub fn bounds(&self, measurer: &impl TextMeasurer) -> Rect {
        let (w, h) = measurer.measure(&self.text, self.font_size);
        let (x, y) = (self.pos.x, self.pos.y);
        let (x0, x1) = match self.anchor {
            TextAnchor::Start => (x, x + w),
            TextAnchor::Middle => (x - w * 0.5, x + w * 0.5),
            TextAnchor::End => (x - w, x),
        };
        let (y0, y1) = match self.baseline {
            TextBaseline::Middle => (y - h * 0.5, y + h * 0.5),
            TextBaseline::Alphabetic => (y - h, y),
            TextBaseline::Hanging => (y, y + h),
        };
        Rect::new(x0, y0, x1, y1)
    }
}

/// What a mark draws.
#[derive(Clone, Debug)]
pub enum MarkPayload {
    /// A filled axis-aligned rectangle.
    Rect {
        /// Geometry.
        rect: Rect,
        /// Fill paint.
        fill: Brush,
    },
    /// A text run.
    Text(TextMark),
}

/// A positioned, painted primitive with a stable identity.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Stable id, unique within one layout.
    pub id: u64,
    /// Paint order hint; see [`crate::z_order`].
    pub z_index: i32,
    /// Geometry and paint.
    pub payload: MarkPayload,
}

impl Mark {
    /// Creates a filled rectangle mark.
    pub fn rect(id: u64, z_index: i32, rect: Rect, fill: impl Into<Brush>) -> Self {
        Self {
            id,
            z_index,
            payload: MarkPayload::Rect {
                rect,
                fill: fill.into(),
            },
        }
    }

    /// Creates a text mark.
    pub fn text(id: u64, z_index: i32, text: TextMark) -> Self {
        Self {
            id,
            z_index,
            payload: MarkPayload::Text(text),
        }
    }

    /// Estimated bounds of the mark.
    pub fn bounds(&self, measurer: &impl TextMeasurer) -> Rect {
        match &self.payload {
            MarkPayload::Rect { rect, .. } => *rect,
            MarkPayload::Text(t) => t.bounds(measurer),
        }
    }
}
