// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration: JSON file values with command-line overrides on top.

use std::collections::BTreeMap;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use scanviz_charts::{Colorizer, HashScheme, LegendFormat, Palette, Size, StackedBarChartSpec};
use scanviz_transforms::TopKSpec;

use crate::cli::Args;
use crate::error::DemoError;

/// Hash scheme names accepted in config files and on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum HashName {
    /// Dashboard-compatible rolling hash.
    #[default]
    Polynomial31,
    /// 64-bit FNV-1a.
    Fnv1a,
}

impl From<HashName> for HashScheme {
    fn from(name: HashName) -> Self {
        match name {
            HashName::Polynomial31 => Self::Polynomial31,
            HashName::Fnv1a => Self::Fnv1a,
        }
    }
}

/// Everything that shapes one rendered chart.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DemoConfig {
    /// Categories kept as individual series.
    pub(crate) top_k: usize,
    /// Emit the overflow series even when it is zero everywhere.
    pub(crate) include_empty_overflow: bool,
    /// Label of the overflow series.
    pub(crate) overflow_label: String,
    /// Legend label length before truncation, in chars.
    pub(crate) legend_max_chars: usize,
    /// Label hash.
    pub(crate) hash: HashName,
    /// Install the built-in MIME type colors.
    pub(crate) mime_overrides: bool,
    /// Extra `label -> preset name` pins, applied after the MIME table.
    pub(crate) overrides: BTreeMap<String, String>,
    /// Plot area width.
    pub(crate) width: f64,
    /// Plot area height.
    pub(crate) height: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            include_empty_overflow: true,
            overflow_label: String::from("other"),
            legend_max_chars: LegendFormat::default().max_chars,
            hash: HashName::default(),
            mime_overrides: false,
            overrides: BTreeMap::new(),
            width: 640.0,
            height: 320.0,
        }
    }
}

impl DemoConfig {
    /// Loads `path`, or the defaults when no file is given, then applies `args`.
    pub(crate) fn load(path: Option<&Path>, args: &Args) -> Result<Self, DemoError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| DemoError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&text).map_err(|source| DemoError::Config {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(top_k) = args.top_k {
            self.top_k = top_k;
        }
        if args.no_empty_overflow {
            self.include_empty_overflow = false;
        }
        if let Some(chars) = args.legend_width {
            self.legend_max_chars = chars;
        }
        if let Some(hash) = args.hash {
            self.hash = hash;
        }
        if args.mime_overrides {
            self.mime_overrides = true;
        }
    }

    pub(crate) fn top_k(&self) -> TopKSpec {
        TopKSpec::new(self.top_k).with_empty_overflow(self.include_empty_overflow)
    }

    pub(crate) fn colorizer(&self, palette: Palette) -> Colorizer {
        let mut colorizer = Colorizer::new(palette).with_scheme(self.hash.into());
        if self.mime_overrides {
            colorizer = colorizer.with_mime_type_overrides();
        }
        for (label, preset) in &self.overrides {
            if colorizer.palette().token_named(preset).is_none() {
                log::warn!("override {label:?}: unknown preset {preset:?}, ignored");
            }
            colorizer = colorizer.with_override(label, preset);
        }
        colorizer
    }

    pub(crate) fn legend_format(&self) -> LegendFormat {
        LegendFormat::default().with_max_chars(self.legend_max_chars)
    }

    pub(crate) fn chart(&self) -> StackedBarChartSpec {
        StackedBarChartSpec::new(Size {
            width: self.width,
            height: self.height,
        })
        .with_legend_format(self.legend_format())
    }
}
