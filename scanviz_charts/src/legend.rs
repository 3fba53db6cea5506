// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend text formatting and swatch legends.
//!
//! [`LegendFormat`] turns a series total and label into display text. [`LegendSwatchesSpec`]
//! lays those strings out as a column of color swatches with labels.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};

use crate::layout::{Size, TextMeasurer, union_rect};
use crate::mark::{Mark, TextAnchor, TextBaseline, TextMark};
use crate::z_order;

/// Formats legend entries as `"<total> <label>"`.
///
/// Totals use `,` thousands grouping. Labels longer than `max_chars` Unicode scalar values are
/// cut and suffixed with `ellipsis`. Truncation is display-only; series keep their full labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendFormat {
    /// Longest label shown in full.
    pub max_chars: usize,
    /// Appended to truncated labels.
    pub ellipsis: String,
}

impl Default for LegendFormat {
    fn default() -> Self {
        Self {
            max_chars: 30,
            ellipsis: String::from("..."),
        }
    }
}

impl LegendFormat {
    /// Sets the maximum label length, in chars.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Sets the truncation marker.
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    /// Formats one legend entry.
    pub fn format(&self, total: u64, label: &str) -> String {
        let mut out = format_count(total);
        out.push(' ');
        out.push_str(&self.truncate(label));
        out
    }

    /// Truncates `label` to `max_chars`, appending the ellipsis if anything was cut.
    pub fn truncate(&self, label: &str) -> String {
        match label.char_indices().nth(self.max_chars) {
            None => String::from(label),
            Some((cut, _)) => {
                let mut out = String::from(&label[..cut]);
                out.push_str(&self.ellipsis);
                out
            }
        }
    }
}

/// Formats a count with `,` thousands separators (`1234567` -> `"1,234,567"`).
pub fn format_count(n: u64) -> String {
    let digits = alloc::format!("{n}");
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A legend row.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// Text shown next to the swatch.
    pub label: String,
    /// Swatch paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Creates an item with a solid swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// A positioned legend: swatches stacked top to bottom, then into further columns.
#[derive(Clone, Debug)]
pub struct LegendSwatches {
    /// Stable-id base; swatch `i` uses `id_base + 2i`, its label `id_base + 2i + 1`.
    pub id_base: u64,
    /// Top-left corner.
    pub origin: Point,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Number of columns.
    pub columns: usize,
    /// Horizontal gap between columns.
    pub column_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label paint.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatches {
    /// Generates one swatch rect and one label per item.
    pub fn marks(&self, measurer: &impl TextMeasurer) -> Vec<Mark> {
        let mut out = Vec::with_capacity(self.items.len() * 2);
        if self.items.is_empty() {
            return out;
        }
        let columns = self.columns.max(1);
        let rows_per_col = self.items.len().div_ceil(columns);
        let row_height = self.swatch_size.max(self.font_size);
        let column_width = self.column_width(measurer);

        for (i, item) in self.items.iter().enumerate() {
            let col = i / rows_per_col;
            let row = i % rows_per_col;
            let x = self.origin.x + col as f64 * (column_width + self.column_gap);
            let y = self.origin.y + row as f64 * (row_height + self.row_gap);
            let swatch_y = y + (row_height - self.swatch_size) * 0.5;
            let id = self.id_base + 2 * i as u64;

            out.push(Mark::rect(
                id,
                z_order::LEGEND_SWATCHES,
                Rect::new(x, swatch_y, x + self.swatch_size, swatch_y + self.swatch_size),
                item.fill.clone(),
            ));
            out.push(Mark::text(
                id + 1,
                z_order::LEGEND_LABELS,
                TextMark {
                    pos: Point::new(x + self.swatch_size + self.label_dx, y + row_height * 0.5),
                    text: item.label.clone(),
                    font_size: self.font_size,
                    anchor: TextAnchor::Start,
                    baseline: TextBaseline::Middle,
                    fill: self.text_fill.clone(),
                },
            ));
        }
        out
    }

    /// Returns the union of all generated mark bounds.
    pub fn bounds(&self, measurer: &impl TextMeasurer) -> Rect {
        self.marks(measurer)
            .iter()
            .map(|m| m.bounds(measurer))
            .reduce(union_rect)
            .unwrap_or_else(|| Rect::from_origin_size(self.origin, (0.0, 0.0)))
    }

    fn column_width(&self, measurer: &impl TextMeasurer) -> f64 {
        let widest = self
            .items
            .iter()
            .map(|item| measurer.measure(&item.label, self.font_size).0)
            .fold(0.0, f64::max);
        self.swatch_size + self.label_dx + widest
    }
}

/// An unpositioned legend.
///
/// Measure first with [`LegendSwatchesSpec::measure`], then place it with
/// [`LegendSwatchesSpec::at`].
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Stable-id base.
    pub id_base: u64,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Number of columns.
    pub columns: usize,
    /// Horizontal gap between columns.
    pub column_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label paint.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a single-column legend with default sizes.
    pub fn new(id_base: u64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            swatch_size: 10.0,
            row_gap: 6.0,
            label_dx: 6.0,
            columns: 1,
            column_gap: 12.0,
            font_size: 10.0,
            text_fill: css::BLACK.into(),
            items,
        }
    }

    /// Sets the label paint.
    pub fn with_text_fill(mut self, text_fill: impl Into<Brush>) -> Self {
        self.text_fill = text_fill.into();
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    /// Sets the number of columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Returns the size the legend needs.
    pub fn measure(&self, measurer: &impl TextMeasurer) -> Size {
        let b = self.at(Point::ZERO).bounds(measurer);
        Size {
            width: b.width(),
            height: b.height(),
        }
    }

    /// Places the legend with its top-left corner at `origin`.
    pub fn at(&self, origin: Point) -> LegendSwatches {
        LegendSwatches {
            id_base: self.id_base,
            origin,
            swatch_size: self.swatch_size,
            row_gap: self.row_gap,
            label_dx: self.label_dx,
            columns: self.columns,
            column_gap: self.column_gap,
            font_size: self.font_size,
            text_fill: self.text_fill.clone(),
            items: self.items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::layout::HeuristicTextMeasurer;

    #[test]
    fn totals_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn long_labels_are_truncated_for_display() {
        let f = LegendFormat::default();
        let long = "application/vnd.openxmlformats-officedocument";
        assert_eq!(
            f.format(1234, long),
            "1,234 application/vnd.openxmlformats..."
        );
        assert_eq!(f.format(7, "a"), "7 a");

        let exact = "x".repeat(30);
        assert_eq!(f.truncate(&exact), exact);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let f = LegendFormat::default().with_max_chars(2).with_ellipsis("\u{2026}");
        assert_eq!(f.truncate("\u{e9}\u{e9}\u{e9}"), "\u{e9}\u{e9}\u{2026}");
        assert_eq!(f.truncate("\u{e9}\u{e9}"), "\u{e9}\u{e9}");
    }

    #[test]
    fn more_columns_trade_height_for_width() {
        let measurer = HeuristicTextMeasurer::default();
        let items = vec![
            LegendItem::solid("A", css::BLACK),
            LegendItem::solid("BBBB", css::BLACK),
            LegendItem::solid("CC", css::BLACK),
            LegendItem::solid("DDDDDD", css::BLACK),
        ];

        let s1 = LegendSwatchesSpec::new(1, items.clone()).measure(&measurer);
        let s2 = LegendSwatchesSpec::new(1, items)
            .with_columns(2)
            .measure(&measurer);

        assert!(s2.width > s1.width);
        assert!(s2.height < s1.height);
    }

    #[test]
    fn placed_bounds_match_measure() {
        let measurer = HeuristicTextMeasurer::default();
        let spec = LegendSwatchesSpec::new(
            1,
            vec![
                LegendItem::solid("A", css::BLACK),
                LegendItem::solid("BBBB", css::BLACK),
            ],
        );

        let desired = spec.measure(&measurer);
        let b = spec.at(Point::new(10.0, 20.0)).bounds(&measurer);

        assert_eq!(b.x0, 10.0);
        assert_eq!(b.y0, 20.0);
        assert!((b.width() - desired.width).abs() < 1e-6);
        assert!((b.height() - desired.height).abs() < 1e-6);
    }

    #[test]
    fn mark_ids_are_unique_and_ordered() {
        let legend = LegendSwatchesSpec::new(
            100,
            vec![
                LegendItem::solid("A", css::RED),
                LegendItem::solid("B", css::BLUE),
            ],
        )
        .at(Point::ZERO);
        let ids: Vec<u64> = legend
            .marks(&HeuristicTextMeasurer::default())
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, [100, 101, 102, 103]);
    }
}
