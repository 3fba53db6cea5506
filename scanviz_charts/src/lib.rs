// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category colors and chart layout for scan statistics.
//!
//! This crate sits between [`scanviz_transforms`] and a renderer:
//! - **Colors**: a [`Colorizer`] hashes labels into a fixed [`Palette`], so the same MIME type or
//!   rule family gets the same color in every chart, table and tag.
//! - **Chart data**: [`ChartData::adapt`] turns an [`Aggregation`](scanviz_transforms::Aggregation)
//!   into ordered, colored series with legend text.
//! - **Layout**: [`StackedBarChartSpec`] lays chart data out as renderer-neutral [`Mark`]s.
//!
//! Text shaping is out of scope; text marks store unshaped strings and layout uses a
//! [`TextMeasurer`] for rough extents.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod chart_data;
mod colorize;
#[cfg(not(feature = "std"))]
mod float;
mod layout;
mod legend;
mod mark;
mod palette;
mod scale;
mod stacked_bar_chart;
pub mod z_order;

pub use chart_data::{ChartData, Point, RenderSeries, SeriesKind};
pub use colorize::{Colorizer, HashScheme, PART_SEPARATOR, rule_family};
pub use layout::{ChartLayout, HeuristicTextMeasurer, Size, TextMeasurer};
pub use legend::{LegendFormat, LegendItem, LegendSwatches, LegendSwatchesSpec, format_count};
pub use mark::{Mark, MarkPayload, TextAnchor, TextBaseline, TextMark};
pub use palette::{ColorToken, Palette, PaletteError, Swatch};
pub use scale::{ScaleBand, ScaleLinear};
pub use stacked_bar_chart::StackedBarChartSpec;
