// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for top-K aggregation.

use proptest::prelude::*;

use scanviz_transforms::{Observation, TopKSpec, aggregate};

/// Up to 8 buckets over a small label alphabet so labels repeat across buckets (and within them).
fn arb_observation() -> impl Strategy<Value = Observation> {
    let pair = ("[a-f]{0,2}", 0_i64..1_000);
    let bucket = prop::collection::vec(pair, 0..12);
    prop::collection::vec(bucket, 0..8).prop_map(|buckets| {
        let mut obs = Observation::new();
        for (i, counts) in buckets.into_iter().enumerate() {
            obs = obs.with_bucket(format!("2024-{:02}", i + 1), counts);
        }
        obs
    })
}

fn input_bucket_sum(obs: &Observation, index: usize) -> u64 {
    obs.buckets()[index]
        .counts
        .iter()
        .map(|(_, c)| c.unsigned_abs())
        .sum()
}

proptest! {
    #[test]
    fn conserves_every_bucket(obs in arb_observation(), top_k in 0_usize..6) {
        let agg = aggregate(&obs, top_k).unwrap();
        for b in 0..obs.len() {
            let retained: u64 = agg.retained().iter().map(|s| s.counts[b]).sum();
            let overflow = agg.overflow().map_or(0, |s| s.counts[b]);
            prop_assert_eq!(retained + overflow, input_bucket_sum(&obs, b));
        }
    }

    #[test]
    fn retained_is_bounded_and_ranked(obs in arb_observation(), top_k in 0_usize..6) {
        let agg = aggregate(&obs, top_k).unwrap();
        prop_assert!(agg.retained().len() <= top_k);
        for pair in agg.retained().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.total > b.total || (a.total == b.total && a.label < b.label));
        }
    }

    #[test]
    fn grid_is_rectangular_and_buckets_are_preserved(obs in arb_observation(), top_k in 0_usize..6) {
        let agg = aggregate(&obs, top_k).unwrap();
        let keys: Vec<&str> = obs.buckets().iter().map(|b| b.key.as_str()).collect();
        prop_assert_eq!(agg.buckets().iter().map(String::as_str).collect::<Vec<_>>(), keys);
        for s in agg.series() {
            prop_assert_eq!(s.counts.len(), obs.len());
            prop_assert_eq!(s.counts.iter().sum::<u64>(), s.total);
        }
    }

    #[test]
    fn overflow_policy_only_drops_all_zero_overflow(obs in arb_observation(), top_k in 0_usize..6) {
        let with = TopKSpec::new(top_k).apply(&obs).unwrap();
        let without = TopKSpec::new(top_k).with_empty_overflow(false).apply(&obs).unwrap();
        prop_assert_eq!(with.retained(), without.retained());
        let overflow = with.overflow().expect("included by default");
        if overflow.total == 0 {
            prop_assert!(without.overflow().is_none());
        } else {
            prop_assert_eq!(without.overflow(), Some(overflow));
        }
    }

    #[test]
    fn recomputation_is_identical(obs in arb_observation(), top_k in 0_usize..6) {
        prop_assert_eq!(aggregate(&obs, top_k), aggregate(&obs.clone(), top_k));
    }
}
