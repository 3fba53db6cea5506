// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw time-bucketed category counts.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hasher;

use hashbrown::HashSet;

use crate::error::InvalidObservation;
use crate::fingerprint::Fnv1aHasher;

/// One observation period and the category counts reported for it.
///
/// Counts are kept exactly as received (signed) so that validation can reject bad input instead
/// of the type system silently coercing it. Labels are neither sorted nor deduplicated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket key (for example a `YYYY-MM` month).
    pub key: String,
    /// `(label, count)` pairs in source order.
    pub counts: Vec<(String, i64)>,
}

impl Bucket {
    /// Creates a bucket from `(label, count)` pairs.
    pub fn new<L: Into<String>>(
        key: impl Into<String>,
        counts: impl IntoIterator<Item = (L, i64)>,
    ) -> Self {
        Self {
            key: key.into(),
            counts: counts.into_iter().map(|(l, c)| (l.into(), c)).collect(),
        }
    }
}

/// Raw statistics: an ordered sequence of buckets.
///
/// Bucket order is the caller's order; nothing downstream re-sorts it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    buckets: Vec<Bucket>,
}

impl Observation {
    /// Creates an empty observation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bucket.
    pub fn push_bucket(&mut self, bucket: Bucket) {
        self.buckets.push(bucket);
    }

    /// Appends a bucket built from `(label, count)` pairs.
    pub fn with_bucket<L: Into<String>>(
        mut self,
        key: impl Into<String>,
        counts: impl IntoIterator<Item = (L, i64)>,
    ) -> Self {
        self.buckets.push(Bucket::new(key, counts));
        self
    }

    /// Returns the buckets in input order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Returns the number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Checks the whole observation without aggregating it.
    ///
    /// Rejects negative counts and repeated bucket keys. Totals are checked for overflow by the
    /// aggregator itself since that needs the summed values.
    pub fn validate(&self) -> Result<(), InvalidObservation> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            if !seen.insert(bucket.key.as_str()) {
                return Err(InvalidObservation::DuplicateBucket {
                    bucket: bucket.key.clone(),
                });
            }
            for (label, count) in &bucket.counts {
                if *count < 0 {
                    return Err(InvalidObservation::NegativeCount {
                        bucket: bucket.key.clone(),
                        label: label.clone(),
                        count: *count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns a stable 64-bit hash of the observation content.
    ///
    /// Equal observations (same buckets, same order, same pairs) always produce the same value,
    /// across runs and platforms. Callers that memoize pipeline output can key their cache on it.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1aHasher::new();
        for bucket in &self.buckets {
            write_str(&mut h, &bucket.key);
            h.write_u8(0x1d);
            for (label, count) in &bucket.counts {
                write_str(&mut h, label);
                h.write(&count.to_le_bytes());
            }
            h.write_u8(0x1c);
        }
        h.finish()
    }
}

fn write_str(h: &mut Fnv1aHasher, s: &str) {
    // Length prefix keeps `("ab", "c")` and `("a", "bc")` apart.
    h.write(&(s.len() as u64).to_le_bytes());
    h.write(s.as_bytes());
}

impl<K: Into<String>> FromIterator<(K, Vec<(String, i64)>)> for Observation {
    fn from_iter<T: IntoIterator<Item = (K, Vec<(String, i64)>)>>(iter: T) -> Self {
        Self {
            buckets: iter
                .into_iter()
                .map(|(key, counts)| Bucket {
                    key: key.into(),
                    counts,
                })
                .collect(),
        }
    }
}
