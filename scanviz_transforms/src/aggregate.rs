// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-K series aggregation.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Reverse;

use hashbrown::HashMap;

use crate::error::InvalidObservation;
use crate::observation::Observation;

/// A category series laid out over every input bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Series {
    /// Category label (empty for the overflow series).
    pub label: String,
    /// Sum of `counts`.
    pub total: u64,
    /// One count per input bucket, aligned to [`Aggregation::buckets`].
    pub counts: Vec<u64>,
}

/// Output of a top-K aggregation.
///
/// The grid is rectangular: every series has exactly one count per bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregation {
    buckets: Vec<String>,
    retained: Vec<Series>,
    overflow: Option<Series>,
}

impl Aggregation {
    /// Bucket keys, in input order.
    pub fn buckets(&self) -> &[String] {
        &self.buckets
    }

    /// Retained series, ordered by descending total and then by label.
    pub fn retained(&self) -> &[Series] {
        &self.retained
    }

    /// The overflow series, if present.
    ///
    /// See [`TopKSpec::with_empty_overflow`] for when it is omitted.
    pub fn overflow(&self) -> Option<&Series> {
        self.overflow.as_ref()
    }

    /// Returns all series in display order (retained first, overflow last).
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.retained.iter().chain(self.overflow.iter())
    }

    /// Returns the summed count of every series at bucket `index`.
    ///
    /// This equals the sum of the input counts for that bucket.
    pub fn bucket_total(&self, index: usize) -> u64 {
        self.series()
            .map(|s| s.counts.get(index).copied().unwrap_or(0))
            .fold(0, u64::saturating_add)
    }

    /// Returns the summed count of every series over every bucket.
    ///
    /// Aggregation rejects input whose grand total does not fit a `u64`, so this never saturates
    /// for an [`Aggregation`] built by [`TopKSpec::apply`].
    pub fn grand_total(&self) -> u64 {
        self.series().map(|s| s.total).fold(0, u64::saturating_add)
    }
}

/// Configuration for a top-K aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopKSpec {
    /// Number of categories retained as individual series.
    pub top_k: usize,
    /// Whether an overflow series that is zero in every bucket is still emitted.
    ///
    /// Default: `true`, so callers always see the same series shape.
    pub include_empty_overflow: bool,
}

impl TopKSpec {
    /// Creates a spec retaining `top_k` categories.
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            include_empty_overflow: true,
        }
    }

    /// Sets whether an all-zero overflow series is emitted.
    pub fn with_empty_overflow(mut self, include: bool) -> Self {
        self.include_empty_overflow = include;
        self
    }

    /// Aggregates `observation` into at most `top_k` retained series plus overflow.
    ///
    /// The whole input is validated before anything is summed.
    pub fn apply(&self, observation: &Observation) -> Result<Aggregation, InvalidObservation> {
        observation.validate()?;

        let grid = CategoryGrid::build(observation)?;
        let bucket_count = observation.len();

        let mut order: Vec<usize> = (0..grid.labels.len()).collect();
        order.sort_by_key(|&i| (Reverse(grid.totals[i]), grid.labels[i]));

        let split = self.top_k.min(order.len());
        let (kept, folded) = order.split_at(split);

        let retained = kept
            .iter()
            .map(|&i| Series {
                label: String::from(grid.labels[i]),
                total: grid.totals[i],
                counts: grid.counts[i].clone(),
            })
            .collect();

        // Every partial sum below is bounded by the grand total, which was overflow-checked.
        let mut overflow_counts = vec![0_u64; bucket_count];
        for &i in folded {
            for (slot, &c) in overflow_counts.iter_mut().zip(&grid.counts[i]) {
                *slot += c;
            }
        }
        let overflow_total: u64 = folded.iter().map(|&i| grid.totals[i]).sum();

        let overflow = if overflow_total > 0 || self.include_empty_overflow {
            Some(Series {
                label: String::new(),
                total: overflow_total,
                counts: overflow_counts,
            })
        } else {
            None
        };

        Ok(Aggregation {
            buckets: observation
                .buckets()
                .iter()
                .map(|b| b.key.clone())
                .collect(),
            retained,
            overflow,
        })
    }
}

/// Aggregates `observation`, retaining `top_k` categories and always emitting an overflow series.
///
/// Equivalent to `TopKSpec::new(top_k).apply(observation)`.
pub fn aggregate(observation: &Observation, top_k: usize) -> Result<Aggregation, InvalidObservation> {
    TopKSpec::new(top_k).apply(observation)
}

/// Dense `label x bucket` counts with per-label totals, in first-seen label order.
struct CategoryGrid<'a> {
    labels: Vec<&'a str>,
    totals: Vec<u64>,
    counts: Vec<Vec<u64>>,
}

impl<'a> CategoryGrid<'a> {
    fn build(observation: &'a Observation) -> Result<Self, InvalidObservation> {
        let bucket_count = observation.len();
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut grand_total = 0_u64;
        let mut grid = Self {
            labels: Vec::new(),
            totals: Vec::new(),
            counts: Vec::new(),
        };

        for (b, bucket) in observation.buckets().iter().enumerate() {
            let mut bucket_total = 0_u64;
            for (label, count) in &bucket.counts {
                // Validated non-negative upstream.
                let count = count.unsigned_abs();
                let i = *index.entry(label.as_str()).or_insert_with(|| {
                    grid.labels.push(label.as_str());
                    grid.totals.push(0);
                    grid.counts.push(vec![0; bucket_count]);
                    grid.labels.len() - 1
                });

                let overflowed = || InvalidObservation::TotalOverflow {
                    label: label.clone(),
                };
                grid.totals[i] = grid.totals[i].checked_add(count).ok_or_else(overflowed)?;
                grid.counts[i][b] = grid.counts[i][b].checked_add(count).ok_or_else(overflowed)?;
                bucket_total = bucket_total.checked_add(count).ok_or_else(|| {
                    InvalidObservation::BucketOverflow {
                        bucket: bucket.key.clone(),
                    }
                })?;
                grand_total = grand_total
                    .checked_add(count)
                    .ok_or(InvalidObservation::GrandTotalOverflow)?;
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn worked_example() -> Observation {
        Observation::new()
            .with_bucket("2024-01", [("a", 5), ("b", 3), ("c", 1)])
            .with_bucket("2024-02", [("a", 2), ("b", 0), ("c", 4)])
    }

    #[test]
    fn keeps_top_k_and_folds_the_rest() {
        let agg = aggregate(&worked_example(), 2).unwrap();

        assert_eq!(agg.buckets(), ["2024-01", "2024-02"]);
        let labels: Vec<&str> = agg.retained().iter().map(|s| s.label.as_str()).collect();
        // c (5) outranks b (3) on the total even though b is larger in the first bucket.
        assert_eq!(labels, ["a", "c"]);
        assert_eq!(agg.retained()[0].total, 7);
        assert_eq!(agg.retained()[0].counts, vec![5, 2]);
        assert_eq!(agg.retained()[1].total, 5);
        assert_eq!(agg.retained()[1].counts, vec![1, 4]);

        let overflow = agg.overflow().expect("overflow is always emitted by default");
        assert_eq!(overflow.counts, vec![3, 0]);
        assert_eq!(overflow.total, 3);

        assert_eq!(agg.bucket_total(0), 9);
        assert_eq!(agg.bucket_total(1), 6);
        assert_eq!(agg.grand_total(), 15);
    }

    #[test]
    fn ties_break_by_label() {
        let obs = Observation::new().with_bucket("m", [("zeta", 4), ("alpha", 4), ("mid", 4)]);
        let agg = aggregate(&obs, 2).unwrap();
        let labels: Vec<&str> = agg.retained().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["alpha", "mid"]);
        assert_eq!(agg.overflow().unwrap().counts, vec![4]);
    }

    #[test]
    fn missing_labels_are_zero_filled() {
        let obs = Observation::new()
            .with_bucket("2024-01", [("a", 1)])
            .with_bucket("2024-02", [("b", 2)])
            .with_bucket("2024-03", [("a", 3)]);
        let agg = aggregate(&obs, 5).unwrap();
        assert_eq!(agg.retained()[0].label, "a");
        assert_eq!(agg.retained()[0].counts, vec![1, 0, 3]);
        assert_eq!(agg.retained()[1].counts, vec![0, 2, 0]);
    }

    #[test]
    fn repeated_labels_in_a_bucket_are_summed() {
        let obs = Observation::new().with_bucket("2024-01", [("a", 2), ("b", 1), ("a", 3)]);
        let agg = aggregate(&obs, 1).unwrap();
        assert_eq!(agg.retained()[0].counts, vec![5]);
        assert_eq!(agg.overflow().unwrap().counts, vec![1]);
    }

    #[test]
    fn empty_overflow_policy_is_explicit() {
        let obs = Observation::new().with_bucket("2024-01", [("a", 2), ("b", 1)]);

        let kept = TopKSpec::new(5).apply(&obs).unwrap();
        let overflow = kept.overflow().expect("empty overflow included by default");
        assert_eq!(overflow.counts, vec![0]);
        assert_eq!(overflow.total, 0);

        let dropped = TopKSpec::new(5).with_empty_overflow(false).apply(&obs).unwrap();
        assert!(dropped.overflow().is_none());

        // Non-empty overflow is never dropped.
        let folded = TopKSpec::new(1).with_empty_overflow(false).apply(&obs).unwrap();
        assert_eq!(folded.overflow().unwrap().counts, vec![1]);
    }

    #[test]
    fn top_k_zero_folds_everything() {
        let agg = aggregate(&worked_example(), 0).unwrap();
        assert!(agg.retained().is_empty());
        assert_eq!(agg.overflow().unwrap().counts, vec![9, 6]);
    }

    #[test]
    fn empty_observation_keeps_shape() {
        let agg = aggregate(&Observation::new(), 3).unwrap();
        assert!(agg.buckets().is_empty());
        assert!(agg.retained().is_empty());
        assert!(agg.overflow().unwrap().counts.is_empty());
    }

    #[test]
    fn buckets_without_counts_are_kept() {
        let obs = Observation::new()
            .with_bucket("2024-01", [("a", 1)])
            .with_bucket("2024-02", Vec::<(&str, i64)>::new());
        let agg = aggregate(&obs, 1).unwrap();
        assert_eq!(agg.buckets(), ["2024-01", "2024-02"]);
        assert_eq!(agg.retained()[0].counts, vec![1, 0]);
    }

    #[test]
    fn rejects_negative_counts_without_partial_output() {
        let obs = Observation::new().with_bucket("b1", [("x", -1)]);
        assert!(matches!(
            aggregate(&obs, 5),
            Err(InvalidObservation::NegativeCount { count: -1, .. })
        ));
    }

    #[test]
    fn rejects_overflowing_bucket_totals() {
        let obs = Observation::new().with_bucket("b1", [("x", i64::MAX), ("y", i64::MAX), ("z", 2)]);
        assert!(matches!(
            aggregate(&obs, 5),
            Err(InvalidObservation::BucketOverflow { .. })
        ));
    }

    #[test]
    fn rejects_overflowing_grand_totals() {
        let obs = Observation::new()
            .with_bucket("b1", [("x", i64::MAX)])
            .with_bucket("b2", [("y", i64::MAX)])
            .with_bucket("b3", [("z", i64::MAX)]);
        // Each label and each bucket fits on its own; only the sum of everything overflows.
        for top_k in [0, 5] {
            assert_eq!(
                aggregate(&obs, top_k),
                Err(InvalidObservation::GrandTotalOverflow),
                "top_k = {top_k}"
            );
        }
    }

    #[test]
    fn largest_representable_grand_total_is_exact() {
        let obs = Observation::new()
            .with_bucket("b1", [("x", i64::MAX)])
            .with_bucket("b2", [("y", i64::MAX)]);
        let expected = 2 * i64::MAX.unsigned_abs();
        for top_k in [0, 1, 5] {
            let agg = aggregate(&obs, top_k).unwrap();
            assert_eq!(agg.grand_total(), expected, "top_k = {top_k}");
            assert_eq!(agg.bucket_total(0), i64::MAX.unsigned_abs(), "top_k = {top_k}");
        }
        assert_eq!(aggregate(&obs, 0).unwrap().overflow().unwrap().total, expected);
    }

    #[test]
    fn is_idempotent() {
        let obs = worked_example();
        assert_eq!(aggregate(&obs, 1), aggregate(&obs, 1));
    }
}
