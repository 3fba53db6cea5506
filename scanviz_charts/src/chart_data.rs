// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-ready series built from an aggregation.
//!
//! This is the seam between the aggregator and any renderer: colors are resolved per label,
//! series come out in display order, and every series carries its total for the legend.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use scanviz_transforms::{Aggregation, Series};

use crate::colorize::Colorizer;
use crate::legend::{LegendFormat, LegendItem};
use crate::palette::{ColorToken, Palette};

/// Whether a series is a real category or the synthetic overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    /// One of the top-K categories.
    Retained,
    /// Everything that was not retained.
    Overflow,
}

/// One bucket's value within a series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    /// Bucket key.
    pub bucket: String,
    /// Count for this series in that bucket.
    pub count: u64,
}

/// A series ready to hand to a renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSeries {
    /// Full category label (the overflow label for the overflow series).
    pub label: String,
    /// Resolved color.
    pub color: ColorToken,
    /// Retained or overflow.
    pub kind: SeriesKind,
    /// Sum over every bucket.
    pub total: u64,
    /// One point per bucket, in bucket order.
    pub points: Vec<Point>,
}

/// Chart input: buckets plus series in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartData {
    /// Bucket keys in input order.
    pub buckets: Vec<String>,
    /// Retained series by descending total, then the overflow series (if any).
    pub series: Vec<RenderSeries>,
}

impl ChartData {
    /// Label given to the overflow series by [`ChartData::adapt`].
    pub const OVERFLOW_LABEL: &'static str = "other";

    /// Builds chart data, naming the overflow series [`Self::OVERFLOW_LABEL`].
    pub fn adapt(aggregation: &Aggregation, colorizer: &Colorizer) -> Self {
        Self::adapt_with_overflow_label(aggregation, colorizer, Self::OVERFLOW_LABEL)
    }

    /// Builds chart data with a custom overflow label.
    ///
    /// Retained colors depend only on the label, never on rank, so a category keeps its color
    /// when new data reshuffles the top-K. The overflow series always gets
    /// [`ColorToken::Overflow`], even if a real category shares its label.
    pub fn adapt_with_overflow_label(
        aggregation: &Aggregation,
        colorizer: &Colorizer,
        overflow_label: &str,
    ) -> Self {
        let buckets = aggregation.buckets();
        let mut series: Vec<RenderSeries> = aggregation
            .retained()
            .iter()
            .map(|s| {
                render_series(
                    buckets,
                    s,
                    s.label.clone(),
                    colorizer.color_for(&s.label),
                    SeriesKind::Retained,
                )
            })
            .collect();
        if let Some(overflow) = aggregation.overflow() {
            series.push(render_series(
                buckets,
                overflow,
                String::from(overflow_label),
                ColorToken::Overflow,
                SeriesKind::Overflow,
            ));
        }
        Self {
            buckets: buckets.to_vec(),
            series,
        }
    }

    /// Returns the overflow series, if present.
    pub fn overflow(&self) -> Option<&RenderSeries> {
        self.series
            .last()
            .filter(|s| s.kind == SeriesKind::Overflow)
    }

    /// Returns the summed count of every series at bucket `index`.
    pub fn bucket_total(&self, index: usize) -> u64 {
        self.series
            .iter()
            .filter_map(|s| s.points.get(index))
            .map(|p| p.count)
            .sum()
    }

    /// Returns the largest bucket total (the height of the tallest stack).
    pub fn max_bucket_total(&self) -> u64 {
        (0..self.buckets.len())
            .map(|i| self.bucket_total(i))
            .max()
            .unwrap_or(0)
    }

    /// Formats one legend string per series, in series order.
    pub fn legend_labels(&self, format: &LegendFormat) -> Vec<String> {
        self.series
            .iter()
            .map(|s| format.format(s.total, &s.label))
            .collect()
    }

    /// Builds legend items (formatted label + swatch fill) in series order.
    pub fn legend_items(&self, palette: &Palette, format: &LegendFormat) -> Vec<LegendItem> {
        self.series
            .iter()
            .map(|s| LegendItem {
                label: format.format(s.total, &s.label),
                fill: palette.brush(s.color),
            })
            .collect()
    }
}

fn render_series(
    buckets: &[String],
    series: &Series,
    label: String,
    color: ColorToken,
    kind: SeriesKind,
) -> RenderSeries {
    RenderSeries {
        label,
        color,
        kind,
        total: series.total,
        points: buckets
            .iter()
            .zip(&series.counts)
            .map(|(bucket, &count)| Point {
                bucket: bucket.clone(),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use scanviz_transforms::{Observation, TopKSpec, aggregate};

    use super::*;

    fn sample() -> Aggregation {
        aggregate(
            &Observation::new()
                .with_bucket("2024-01", [("a", 5), ("b", 3), ("c", 1)])
                .with_bucket("2024-02", [("a", 2), ("b", 0), ("c", 4)]),
            2,
        )
        .unwrap()
    }

    #[test]
    fn series_keep_rank_order_with_overflow_last() {
        let colorizer = Colorizer::default();
        let data = ChartData::adapt(&sample(), &colorizer);

        let labels: Vec<&str> = data.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["a", "c", "other"]);
        assert_eq!(data.series[0].color, colorizer.color_for("a"));
        assert_eq!(data.series[1].color, colorizer.color_for("c"));

        let overflow = data.overflow().expect("overflow is present");
        assert_eq!(overflow.color, ColorToken::Overflow);
        assert_eq!(
            overflow.points,
            vec![
                Point {
                    bucket: "2024-01".into(),
                    count: 3
                },
                Point {
                    bucket: "2024-02".into(),
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn bucket_totals_match_input() {
        let data = ChartData::adapt(&sample(), &Colorizer::default());
        assert_eq!(data.bucket_total(0), 9);
        assert_eq!(data.bucket_total(1), 6);
        assert_eq!(data.max_bucket_total(), 9);
    }

    #[test]
    fn colors_do_not_depend_on_rank() {
        let colorizer = Colorizer::default();
        let before = ChartData::adapt(&sample(), &colorizer);
        let after = ChartData::adapt(
            &aggregate(
                &Observation::new().with_bucket("2024-03", [("c", 50), ("z", 40), ("a", 1)]),
                2,
            )
            .unwrap(),
            &colorizer,
        );
        let color_of = |d: &ChartData, l: &str| {
            d.series
                .iter()
                .find(|s| s.label == l)
                .map(|s| s.color)
                .unwrap()
        };
        assert_eq!(before.series[1].label, "c");
        assert_eq!(after.series[0].label, "c");
        assert_eq!(color_of(&before, "c"), color_of(&after, "c"));
    }

    #[test]
    fn overflow_identity_survives_label_collision() {
        let agg = aggregate(
            &Observation::new().with_bucket("m", [("other", 9), ("x", 1)]),
            1,
        )
        .unwrap();
        let data = ChartData::adapt(&agg, &Colorizer::default());
        assert_eq!(data.series[0].label, "other");
        assert_eq!(data.series[0].kind, SeriesKind::Retained);
        assert_eq!(data.series[1].label, "other");
        assert_eq!(data.series[1].kind, SeriesKind::Overflow);
        assert_ne!(data.series[0].color, data.series[1].color);
    }

    #[test]
    fn dropped_empty_overflow_is_not_rendered() {
        let agg = TopKSpec::new(5)
            .with_empty_overflow(false)
            .apply(&Observation::new().with_bucket("m", [("x", 1)]))
            .unwrap();
        let data = ChartData::adapt_with_overflow_label(&agg, &Colorizer::default(), "rest");
        assert_eq!(data.series.len(), 1);
        assert!(data.overflow().is_none());
    }

    #[test]
    fn legend_labels_follow_series_order() {
        let data = ChartData::adapt(&sample(), &Colorizer::default());
        assert_eq!(
            data.legend_labels(&LegendFormat::default()),
            ["7 a", "5 c", "3 other"]
        );
        let items = data.legend_items(&Palette::preset(), &LegendFormat::default());
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].label, "3 other");
    }
}
