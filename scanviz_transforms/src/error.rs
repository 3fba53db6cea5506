// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation validation errors.

extern crate alloc;

use alloc::string::String;

/// Errors returned when raw statistics cannot be aggregated.
///
/// Malformed input is rejected as a whole; nothing is partially aggregated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidObservation {
    /// The payload could not be parsed at all.
    #[error("statistics payload is not valid JSON: {0}")]
    Syntax(String),
    /// The payload root is not a `bucket -> counts` mapping.
    #[error("statistics payload is not a mapping of buckets")]
    NotAnObject,
    /// A bucket value is not a `label -> count` mapping.
    #[error("bucket '{bucket}' is not a mapping of category counts")]
    BucketNotAnObject {
        /// The offending bucket key.
        bucket: String,
    },
    /// A count is not an integer.
    #[error("count for '{label}' in bucket '{bucket}' is not an integer")]
    NonIntegerCount {
        /// Bucket key.
        bucket: String,
        /// Category label.
        label: String,
    },
    /// A count is negative.
    #[error("count for '{label}' in bucket '{bucket}' is negative ({count})")]
    NegativeCount {
        /// Bucket key.
        bucket: String,
        /// Category label.
        label: String,
        /// The rejected value.
        count: i64,
    },
    /// A count does not fit the supported integer range.
    #[error("count for '{label}' in bucket '{bucket}' is out of range")]
    CountOutOfRange {
        /// Bucket key.
        bucket: String,
        /// Category label.
        label: String,
    },
    /// The same bucket key occurs more than once.
    #[error("bucket '{bucket}' occurs more than once")]
    DuplicateBucket {
        /// The repeated bucket key.
        bucket: String,
    },
    /// Summing a category across buckets overflowed.
    #[error("total for '{label}' overflows")]
    TotalOverflow {
        /// Category label.
        label: String,
    },
    /// Summing a bucket across categories overflowed.
    #[error("total for bucket '{bucket}' overflows")]
    BucketOverflow {
        /// Bucket key.
        bucket: String,
    },
    /// Summing every count in the observation overflowed.
    #[error("sum of all counts overflows")]
    GrandTotalOverflow,
}
