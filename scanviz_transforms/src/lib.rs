// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category aggregation for time-bucketed scan statistics.
//!
//! This crate provides:
//! - an [`Observation`] model for raw `bucket -> label -> count` statistics, and
//! - a top-K aggregator that keeps the highest-total categories as individual series and folds
//!   everything else into a single overflow series.
//!
//! The aggregator is a full-recompute, pure function of its input:
//! - bucket order is taken from the input and never changed,
//! - per-bucket totals are conserved exactly (retained + overflow == input), and
//! - ranking ties are broken by label so repeated runs produce identical output.
//!
//! With the `json` feature, [`Observation::from_json_str`] parses the statistics payload served
//! by the scan backend (`{"2024-01": {"application/pdf": 120}}`).

#![no_std]

extern crate alloc;

mod aggregate;
mod error;
mod fingerprint;
#[cfg(feature = "json")]
mod json;
mod observation;

pub use aggregate::{Aggregation, Series, TopKSpec, aggregate};
pub use error::InvalidObservation;
pub use fingerprint::Fnv1aHasher;
pub use observation::{Bucket, Observation};
