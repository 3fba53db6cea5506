// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic label colors.
//!
//! A [`Colorizer`] maps any string to a [`ColorToken`] by hashing it into the palette. It is a
//! pure function of `(configuration, label)`: no state is carried between calls, so the same
//! label gets the same color in every chart, list and tag that shares a configuration.

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;
use scanviz_transforms::Fnv1aHasher;

use crate::palette::{ColorToken, Palette};

/// Separator placed between label parts before hashing.
///
/// `U+001F` (unit separator) does not occur in MIME types or rule names, so `["ab", "c"]` and
/// `["a", "bc"]` hash differently.
pub const PART_SEPARATOR: char = '\u{1f}';

/// MIME types the dashboard pins to a fixed preset name.
const MIME_TYPE_OVERRIDES: &[(&str, &str)] = &[
    ("application/octet-stream", "gold"),
    ("text/html", "purple"),
    ("text/csv", "lime"),
    ("image/png", "blue"),
    ("image/jpeg", "blue"),
    ("image/gif", "gold"),
    ("image/svg+xml", "green"),
    ("application/pdf", "red"),
    ("text/xml", "orange"),
    ("application/x-executable", "red"),
    ("application/x-dosexec", "red"),
    ("application/zip", "gold"),
    ("application/gzip", "gold"),
    ("application/vnd.ms-excel", "green"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "green",
    ),
    ("application/msword", "geekblue"),
    ("application/encrypted", "cyan"),
    ("message/rfc822", "blue"),
    ("text/rtf", "green"),
    ("text/css", "cyan"),
    ("text/markdown", "lime"),
    ("application/json", "purple"),
    ("application/xml", "purple"),
    ("application/javascript", "orange"),
];

/// String hash used to pick a palette index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashScheme {
    /// Rolling `hash * 31 + unit` over UTF-16 code units.
    ///
    /// The shift truncates to 32 bits while the subtraction does not, and the index is
    /// `|hash| mod P`. This reproduces the web dashboard's tag colors exactly.
    #[default]
    Polynomial31,
    /// 64-bit FNV-1a over UTF-8 bytes, `hash mod P`.
    Fnv1a,
}

impl HashScheme {
    /// Hashes `input` to an unsigned value.
    pub fn hash(self, input: &str) -> u64 {
        match self {
            Self::Polynomial31 => polynomial31(input),
            Self::Fnv1a => Fnv1aHasher::hash_bytes(input.as_bytes()),
        }
    }

    /// Maps `input` into `0..len`. Returns `0` when `len` is zero.
    pub fn index(self, input: &str, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "the remainder is below `len`, which is a usize"
        )]
        {
            (self.hash(input) % len as u64) as usize
        }
    }
}

fn polynomial31(input: &str) -> u64 {
    let mut hash: i64 = 0;
    for unit in input.encode_utf16() {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "the shift operates on the low 32 bits"
        )]
        let low = hash as i32;
        let shifted = i64::from(low.wrapping_shl(5));
        hash = i64::from(unit).wrapping_add(shifted.wrapping_sub(hash));
    }
    hash.unsigned_abs()
}

/// Returns the family prefix of a YARA rule name: everything before the first `_`.
///
/// Rules of one family (`Win32_Trojan_Emotet`, `Win32_Dropper_Generic`) share a tag color.
pub fn rule_family(rule: &str) -> &str {
    rule.split('_').next().unwrap_or(rule)
}

/// Maps labels to palette tokens.
#[derive(Clone, Debug)]
pub struct Colorizer {
    palette: Palette,
    scheme: HashScheme,
    /// Lower-cased label -> preset index.
    overrides: HashMap<String, usize>,
}

impl Colorizer {
    /// Creates a colorizer over `palette` using [`HashScheme::Polynomial31`].
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            scheme: HashScheme::default(),
            overrides: HashMap::new(),
        }
    }

    /// Sets the hash scheme.
    pub fn with_scheme(mut self, scheme: HashScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Pins `label` (ASCII case-insensitively) to the preset swatch named `preset`.
    ///
    /// Unknown preset names are ignored, so a table written for one palette can be applied to
    /// another without failing.
    pub fn with_override(mut self, label: &str, preset: &str) -> Self {
        if let Some(ColorToken::Preset(i)) = self.palette.token_named(preset) {
            self.overrides.insert(label.to_ascii_lowercase(), i);
        }
        self
    }

    /// Pins well-known MIME types to the colors the dashboard's file-type icons use.
    pub fn with_mime_type_overrides(self) -> Self {
        MIME_TYPE_OVERRIDES
            .iter()
            .fold(self, |c, (label, preset)| c.with_override(label, preset))
    }

    /// Returns the palette tokens resolve against.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Returns the active hash scheme.
    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Returns the color token for `label`.
    ///
    /// The empty string maps to [`ColorToken::Default`]. Every other input, of any length or
    /// content, maps to a preset.
    pub fn color_for(&self, label: &str) -> ColorToken {
        if label.is_empty() {
            return ColorToken::Default;
        }
        if !self.overrides.is_empty()
            && let Some(&i) = self.overrides.get(label.to_ascii_lowercase().as_str())
        {
            return ColorToken::Preset(i);
        }
        ColorToken::Preset(self.scheme.index(label, self.palette.len()))
    }

    /// Returns the color token for an ordered list of label parts.
    ///
    /// Parts are joined with [`PART_SEPARATOR`]. An empty list, or a single empty part, maps to
    /// [`ColorToken::Default`].
    pub fn color_for_parts<I, S>(&self, parts: I) -> ColorToken
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                joined.push(PART_SEPARATOR);
            }
            joined.push_str(part.as_ref());
        }
        self.color_for(&joined)
    }

    /// Returns the tag color for a YARA rule, keyed by its [`rule_family`].
    pub fn color_for_rule(&self, rule: &str) -> ColorToken {
        self.color_for(rule_family(rule))
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::new(Palette::preset())
    }
}
