// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Band and count scales for the stacked bar layout.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Maps bucket indices to evenly spaced bands.
#[derive(Clone, Copy, Debug)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding, in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the width of one band.
    pub fn band_width(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let span = (self.range.1 - self.range.0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the start coordinate of band `index`.
    pub fn x(&self, index: usize) -> f64 {
        let bw = self.band_width();
        let step = bw * (1.0 + self.padding_inner);
        let start = self.range.0.min(self.range.1);
        start + bw * self.padding_outer + step * index as f64
    }

    /// Returns the center coordinate of band `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + self.band_width() * 0.5
    }
}

/// A linear mapping from counts to screen coordinates.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Creates a scale from zero to a rounded-up `max`, so the top tick lands on the domain end.
    pub fn nice_counts(max: u64, range: (f64, f64), tick_count: usize) -> Self {
        let top = count_ticks(max as f64, tick_count)
            .last()
            .copied()
            .unwrap_or(1.0)
            .max(1.0);
        Self::new((0.0, top), range)
    }

    /// Maps a domain value into range space.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        r0 + (v - d0) / denom * (r1 - r0)
    }

    /// Returns the domain end.
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }

    /// Returns whole-number tick values covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        count_ticks(self.domain.1, count)
    }
}

/// Tick values from zero through `max` (rounded up), on a 1/2/5 step that is at least 1.
fn count_ticks(max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !max.is_finite() || max <= 0.0 {
        return alloc::vec![0.0];
    }
    let step = nice_step(max / count as f64).max(1.0);
    let stop = (max / step).ceil() * step;
    let n = (stop / step).round().min(10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite, non-negative and capped at 10k"
    )]
    let n = n as u64;
    (0..=n).map(|i| step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let base = 10_f64.powf(step.log10().floor());
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn band_positions_are_monotonic_and_non_overlapping() {
        let band = ScaleBand::new((0.0, 100.0), 4);
        let bw = band.band_width();
        for i in 0..3 {
            assert!(band.x(i) + bw <= band.x(i + 1), "band {i} overlaps the next");
        }
        assert!(band.x(3) + bw <= 100.0 + 1e-9);
    }

    #[test]
    fn count_ticks_are_whole_and_cover_max() {
        assert_eq!(count_ticks(9.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(count_ticks(3.0, 5), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            count_ticks(1100.0, 4),
            vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]
        );
        assert_eq!(count_ticks(0.0, 5), vec![0.0]);
    }

    #[test]
    fn nice_counts_maps_zero_to_range_start() {
        let s = ScaleLinear::nice_counts(9, (100.0, 0.0), 5);
        assert_eq!(s.domain_max(), 10.0);
        assert!((s.map(0.0) - 100.0).abs() < 1e-9);
        assert!((s.map(10.0) - 0.0).abs() < 1e-9);
    }
}
