// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color tokens and the palette that resolves them.
//!
//! Tokens are opaque to the pipeline: the colorizer only ever produces a token, and the
//! renderer resolves it through the host's [`Palette`]. The palette never grows at runtime, so
//! the number of distinct colors is independent of how many categories are observed.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::vec::Vec;

use peniko::{Brush, Color};

/// A color assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorToken {
    /// The designated color for empty labels.
    Default,
    /// Reserved for the synthetic overflow series.
    Overflow,
    /// Index into the palette's preset swatches.
    Preset(usize),
}

/// A named color.
#[derive(Clone, Debug)]
pub struct Swatch {
    /// Theme name (`"blue"`, `"gold"`, ...).
    pub name: Cow<'static, str>,
    /// Render color.
    pub color: Color,
}

impl Swatch {
    /// Creates a swatch.
    pub fn new(name: impl Into<Cow<'static, str>>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Errors returned when building a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    /// No preset swatches were supplied.
    #[error("palette must contain at least one preset swatch")]
    Empty,
}

/// An ordered, fixed set of swatches plus the default and overflow swatches.
#[derive(Clone, Debug)]
pub struct Palette {
    presets: Vec<Swatch>,
    default: Swatch,
    overflow: Swatch,
}

impl Palette {
    /// Creates a palette from preset swatches, in order.
    ///
    /// Reordering the presets changes which color every label maps to.
    pub fn new(presets: Vec<Swatch>) -> Result<Self, PaletteError> {
        if presets.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self {
            presets,
            default: default_swatch(),
            overflow: overflow_swatch(),
        })
    }

    /// The thirteen Ant Design preset colors, in their canonical order.
    ///
    /// This is the palette the web dashboard hashes labels into, so the default colorizer
    /// configuration reproduces its tag colors.
    pub fn preset() -> Self {
        let presets = [
            ("blue", 0x16, 0x77, 0xff),
            ("purple", 0x72, 0x2e, 0xd1),
            ("cyan", 0x13, 0xc2, 0xc2),
            ("green", 0x52, 0xc4, 0x1a),
            ("magenta", 0xeb, 0x2f, 0x96),
            ("pink", 0xeb, 0x2f, 0x96),
            ("red", 0xf5, 0x22, 0x2d),
            ("orange", 0xfa, 0x8c, 0x16),
            ("yellow", 0xfa, 0xdb, 0x14),
            ("volcano", 0xfa, 0x54, 0x1c),
            ("geekblue", 0x2f, 0x54, 0xeb),
            ("lime", 0xa0, 0xd9, 0x11),
            ("gold", 0xfa, 0xad, 0x14),
        ]
        .into_iter()
        .map(|(name, r, g, b)| Swatch::new(name, Color::from_rgb8(r, g, b)))
        .collect();
        Self {
            presets,
            default: default_swatch(),
            overflow: overflow_swatch(),
        }
    }

    /// Sets the swatch used for [`ColorToken::Default`].
    pub fn with_default(mut self, swatch: Swatch) -> Self {
        self.default = swatch;
        self
    }

    /// Sets the swatch used for [`ColorToken::Overflow`].
    pub fn with_overflow(mut self, swatch: Swatch) -> Self {
        self.overflow = swatch;
        self
    }

    /// Returns the number of preset swatches (the hash modulus).
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Always `false`: construction rejects empty palettes.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Returns the preset swatches in order.
    pub fn presets(&self) -> &[Swatch] {
        &self.presets
    }

    /// Resolves a token.
    ///
    /// Preset indices outside this palette (a token produced against a larger palette) fall back
    /// to the default swatch.
    pub fn swatch(&self, token: ColorToken) -> &Swatch {
        match token {
            ColorToken::Default => &self.default,
            ColorToken::Overflow => &self.overflow,
            ColorToken::Preset(i) => self.presets.get(i).unwrap_or(&self.default),
        }
    }

    /// Resolves a token to its render color.
    pub fn color(&self, token: ColorToken) -> Color {
        self.swatch(token).color
    }

    /// Resolves a token to a solid brush.
    pub fn brush(&self, token: ColorToken) -> Brush {
        Brush::Solid(self.color(token))
    }

    /// Looks up a preset token by swatch name.
    pub fn token_named(&self, name: &str) -> Option<ColorToken> {
        self.presets
            .iter()
            .position(|s| s.name == name)
            .map(ColorToken::Preset)
    }
}

fn default_swatch() -> Swatch {
    Swatch::new("default", Color::from_rgb8(0x66, 0x66, 0x66))
}

fn overflow_swatch() -> Swatch {
    Swatch::new("gray", Color::from_rgb8(0x8c, 0x8c, 0x8c))
}

impl Default for Palette {
    fn default() -> Self {
        Self::preset()
    }
}
