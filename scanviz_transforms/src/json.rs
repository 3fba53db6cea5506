// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON boundary for the scan backend's statistics payload.
//!
//! The payload shape is `{"<bucket>": {"<label>": <count>, ...}, ...}`. Objects are read entry by
//! entry, so document order becomes bucket order and repeated keys are kept rather than
//! collapsed: a repeated label is summed by the aggregator and a repeated bucket is rejected by
//! [`Observation::validate`].

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::{Number, Value};

use crate::error::InvalidObservation;
use crate::observation::{Bucket, Observation};

/// `bucket -> label -> count` entries in document order, duplicates included.
type Payload = Entries<Entries<Value>>;

impl Observation {
    /// Parses and validates a statistics payload.
    pub fn from_json_str(input: &str) -> Result<Self, InvalidObservation> {
        let payload: Payload =
            serde_json::from_str(input).map_err(|e| InvalidObservation::Syntax(e.to_string()))?;
        Self::from_payload(payload)
    }

    /// Converts an already-parsed payload.
    ///
    /// Every bucket must be an object and every count a non-negative integer; anything else is
    /// rejected rather than coerced. A [`Value`] object cannot hold repeated keys, so any
    /// duplicates were already collapsed when it was built; prefer
    /// [`Observation::from_json_str`] for raw input.
    pub fn from_json_value(value: &Value) -> Result<Self, InvalidObservation> {
        let payload =
            Payload::deserialize(value).map_err(|e| InvalidObservation::Syntax(e.to_string()))?;
        Self::from_payload(payload)
    }

    fn from_payload(payload: Payload) -> Result<Self, InvalidObservation> {
        let Entries::Map(root) = payload else {
            return Err(InvalidObservation::NotAnObject);
        };
        let mut obs = Self::new();
        for (key, counts) in root {
            let Entries::Map(counts) = counts else {
                return Err(InvalidObservation::BucketNotAnObject { bucket: key });
            };
            obs.push_bucket(parse_bucket(key, counts)?);
        }
        obs.validate()?;
        Ok(obs)
    }
}

/// A JSON object read as an ordered list of entries, or some other JSON value.
enum Entries<V> {
    Map(Vec<(String, V)>),
    NotAMap,
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntriesVisitor(PhantomData))
    }
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
    type Value = Entries<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some(entry) = map.next_entry::<String, V>()? {
            entries.push(entry);
        }
        Ok(Entries::Map(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Entries::NotAMap)
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Entries::NotAMap)
    }

    fn visit_bool<E: Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Entries::NotAMap)
    }

    fn visit_i64<E: Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Entries::NotAMap)
    }

    fn visit_u64<E: Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Entries::NotAMap)
    }

    fn visit_f64<E: Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Entries::NotAMap)
    }

    fn visit_str<E: Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Entries::NotAMap)
    }
}

fn parse_bucket(key: String, counts: Vec<(String, Value)>) -> Result<Bucket, InvalidObservation> {
    let mut out = Vec::with_capacity(counts.len());
    for (label, count) in counts {
        let Value::Number(n) = count else {
            return Err(InvalidObservation::NonIntegerCount { bucket: key, label });
        };
        let count = parse_count(&key, &label, &n)?;
        out.push((label, count));
    }
    Ok(Bucket { key, counts: out })
}

fn parse_count(bucket: &str, label: &str, n: &Number) -> Result<i64, InvalidObservation> {
    if let Some(v) = n.as_i64() {
        if v < 0 {
            return Err(InvalidObservation::NegativeCount {
                bucket: bucket.to_string(),
                label: label.to_string(),
                count: v,
            });
        }
        return Ok(v);
    }
    if n.is_u64() {
        return Err(InvalidObservation::CountOutOfRange {
            bucket: bucket.to_string(),
            label: label.to_string(),
        });
    }
    Err(InvalidObservation::NonIntegerCount {
        bucket: bucket.to_string(),
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::aggregate;

    #[test]
    fn parses_in_document_order() {
        let obs = Observation::from_json_str(
            r#"{"2024-03": {"text/plain": 1}, "2024-01": {"application/pdf": 120, "text/plain": 30}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = obs.buckets().iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["2024-03", "2024-01"]);
        assert_eq!(
            obs.buckets()[1].counts,
            [("application/pdf".to_string(), 120), ("text/plain".to_string(), 30)]
        );
    }

    #[test]
    fn repeated_labels_are_kept_and_summed() {
        let obs = Observation::from_json_str(r#"{"b1": {"x": 1, "y": 4, "x": 2}}"#).unwrap();
        assert_eq!(
            obs.buckets()[0].counts,
            [
                ("x".to_string(), 1),
                ("y".to_string(), 4),
                ("x".to_string(), 2)
            ]
        );
        let agg = aggregate(&obs, 5).unwrap();
        assert_eq!(agg.bucket_total(0), 7);
        assert_eq!(agg.retained()[0].label, "y");
        assert_eq!(agg.retained()[1].label, "x");
        assert_eq!(agg.retained()[1].total, 3);
    }

    #[test]
    fn repeated_buckets_are_rejected() {
        assert_eq!(
            Observation::from_json_str(r#"{"b1": {"x": 1}, "b1": {"y": 5}}"#),
            Err(InvalidObservation::DuplicateBucket {
                bucket: "b1".to_string()
            })
        );
    }

    #[test]
    fn rejects_negative_count() {
        let err = Observation::from_json_str(r#"{"b1": {"x": -1}}"#).unwrap_err();
        assert!(matches!(err, InvalidObservation::NegativeCount { count: -1, .. }));
    }

    #[test]
    fn rejects_non_integer_counts() {
        for payload in [
            r#"{"b1": {"x": 1.5}}"#,
            r#"{"b1": {"x": 2.0}}"#,
            r#"{"b1": {"x": "3"}}"#,
            r#"{"b1": {"x": null}}"#,
            r#"{"b1": {"x": true}}"#,
            r#"{"b1": {"x": {"y": 1}}}"#,
        ] {
            let err = Observation::from_json_str(payload).unwrap_err();
            assert!(
                matches!(err, InvalidObservation::NonIntegerCount { .. }),
                "{payload} => {err:?}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_count() {
        let err = Observation::from_json_str(r#"{"b1": {"x": 18446744073709551615}}"#).unwrap_err();
        assert!(matches!(err, InvalidObservation::CountOutOfRange { .. }));
    }

    #[test]
    fn rejects_malformed_shapes() {
        for root in ["[1, 2]", "null", "7", r#""text""#, "false"] {
            assert_eq!(
                Observation::from_json_str(root),
                Err(InvalidObservation::NotAnObject),
                "{root}"
            );
        }
        assert_eq!(
            Observation::from_json_str(r#"{"b1": [1]}"#),
            Err(InvalidObservation::BucketNotAnObject {
                bucket: "b1".to_string()
            })
        );
        assert!(matches!(
            Observation::from_json_str("{"),
            Err(InvalidObservation::Syntax(_))
        ));
    }

    #[test]
    fn parsed_values_convert_like_text() {
        let text = r#"{"2024-01": {"a": 5, "b": 3}, "2024-02": {"a": 2}}"#;
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(
            Observation::from_json_value(&value),
            Observation::from_json_str(text)
        );
        assert_eq!(
            Observation::from_json_value(&Value::Null),
            Err(InvalidObservation::NotAnObject)
        );
    }

    #[test]
    fn payload_feeds_the_aggregator() {
        let obs = Observation::from_json_str(
            r#"{"2024-01": {"a": 5, "b": 3, "c": 1}, "2024-02": {"a": 2, "b": 0, "c": 4}}"#,
        )
        .unwrap();
        let agg = aggregate(&obs, 2).unwrap();
        assert_eq!(agg.overflow().unwrap().counts, [3, 0]);
    }
}
