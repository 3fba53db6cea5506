// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked bar layout for [`ChartData`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;

use crate::chart_data::ChartData;
use crate::layout::{ChartLayout, Size, TextMeasurer, union_rect};
use crate::legend::{LegendFormat, LegendSwatchesSpec, format_count};
use crate::mark::{Mark, TextAnchor, TextBaseline, TextMark};
use crate::palette::Palette;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::z_order;

/// Lays out one bar per bucket with series stacked bottom-up in series order.
///
/// Mark ids are allocated in consecutive blocks starting at `id_base`, sized from the data:
/// - segments: `id_base + series_index * bucket_count + bucket_index`,
/// - one bucket label per bucket,
/// - two legend marks per series,
/// - one gridline per y tick, then one tick label per y tick.
///
/// A segment therefore keeps its id across relayouts of the same data shape, and no two marks
/// share an id however many series or buckets there are. Zero counts produce no segment.
#[derive(Clone, Debug)]
pub struct StackedBarChartSpec {
    /// Stable-id base.
    pub id_base: u64,
    /// Size of the plot area (bars only; axes and legend are placed around it).
    pub plot_size: Size,
    /// Desired number of y ticks.
    pub tick_count: usize,
    /// Inner band padding, in band units.
    pub band_padding: f64,
    /// Font size for axis and legend text.
    pub font_size: f64,
    /// Gap between the plot edge and axis labels.
    pub label_gap: f64,
    /// Gap between the plot and the legend.
    pub legend_gap: f64,
    /// Padding around everything drawn.
    pub padding: f64,
    /// Axis text paint.
    pub text_fill: Brush,
    /// Gridline paint.
    pub grid_fill: Brush,
    /// Legend text formatting.
    pub legend_format: LegendFormat,
}

impl StackedBarChartSpec {
    /// Creates a spec with a `plot_size` plot area and default styling.
    pub fn new(plot_size: Size) -> Self {
        Self {
            id_base: 1,
            plot_size,
            tick_count: 5,
            band_padding: 0.2,
            font_size: 10.0,
            label_gap: 6.0,
            legend_gap: 16.0,
            padding: 8.0,
            text_fill: css::BLACK.into(),
            grid_fill: css::GAINSBORO.into(),
            legend_format: LegendFormat::default(),
        }
    }

    /// Sets the stable-id base.
    pub fn with_id_base(mut self, id_base: u64) -> Self {
        self.id_base = id_base;
        self
    }

    /// Sets the desired number of y ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the inner band padding.
    pub fn with_band_padding(mut self, band_padding: f64) -> Self {
        self.band_padding = band_padding.clamp(0.0, 1.0);
        self
    }

    /// Sets the font size used for every text mark.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the legend formatter.
    pub fn with_legend_format(mut self, legend_format: LegendFormat) -> Self {
        self.legend_format = legend_format;
        self
    }

    /// Lays out `data`, resolving series colors through `palette`.
    pub fn layout(
        &self,
        data: &ChartData,
        palette: &Palette,
        measurer: &impl TextMeasurer,
    ) -> ChartLayout {
        let Size { width, height } = self.plot_size;
        let plot = Rect::new(0.0, 0.0, width, height);
        let mut marks = Vec::new();

        let n = data.buckets.len();
        let segment_ids = self.id_base;
        let bucket_label_ids = segment_ids + (data.series.len() * n) as u64;
        let legend_items = data.legend_items(palette, &self.legend_format);
        let legend_ids = bucket_label_ids + n as u64;
        let grid_ids = legend_ids + 2 * legend_items.len() as u64;

        let y = ScaleLinear::nice_counts(data.max_bucket_total(), (height, 0.0), self.tick_count);
        let ticks = y.ticks(self.tick_count);
        let tick_label_ids = grid_ids + ticks.len() as u64;

        let band =
            ScaleBand::new((0.0, width), n).with_padding(self.band_padding, self.band_padding * 0.5);
        let bw = band.band_width();
        for (b, key) in data.buckets.iter().enumerate() {
            let x = band.x(b);
            let mut running = 0_u64;
            for (s, series) in data.series.iter().enumerate() {
                let count = series.points.get(b).map_or(0, |p| p.count);
                if count == 0 {
                    continue;
                }
                let base = y.map(running as f64);
                running = running.saturating_add(count);
                let top = y.map(running as f64);
                marks.push(Mark::rect(
                    segment_ids + (s * n + b) as u64,
                    z_order::SERIES_FILL,
                    Rect::new(x, top, x + bw, base),
                    palette.brush(series.color),
                ));
            }
            marks.push(self.text(
                bucket_label_ids + b as u64,
                Point::new(band.center(b), height + self.label_gap),
                key.clone(),
                TextAnchor::Middle,
                TextBaseline::Hanging,
            ));
        }

        for (i, tick) in ticks.into_iter().enumerate() {
            let i = i as u64;
            let py = y.map(tick);
            marks.push(Mark::rect(
                grid_ids + i,
                z_order::GRID_LINES,
                Rect::new(0.0, py - 0.5, width, py + 0.5),
                self.grid_fill.clone(),
            ));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ticks are whole, non-negative counts"
            )]
            let value = tick as u64;
            marks.push(self.text(
                tick_label_ids + i,
                Point::new(-self.label_gap, py),
                format_count(value),
                TextAnchor::End,
                TextBaseline::Middle,
            ));
        }

        let legend = LegendSwatchesSpec::new(legend_ids, legend_items)
            .with_font_size(self.font_size)
            .with_text_fill(self.text_fill.clone());
        marks.extend(
            legend
                .at(Point::new(width + self.legend_gap, 0.0))
                .marks(measurer),
        );

        let view = marks
            .iter()
            .map(|m| m.bounds(measurer))
            .fold(plot, union_rect)
            .inflate(self.padding, self.padding);

        ChartLayout { view, plot, marks }
    }

    fn text(
        &self,
        id: u64,
        pos: Point,
        text: String,
        anchor: TextAnchor,
        baseline: TextBaseline,
    ) -> Mark {
        Mark::text(
            id,
            z_order::AXIS_LABELS,
            TextMark {
                pos,
                text,
                font_size: self.font_size,
                anchor,
                baseline,
                fill: self.text_fill.clone(),
            },
        )
    }
}
