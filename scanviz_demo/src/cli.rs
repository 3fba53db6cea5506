// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use clap::Parser;

use crate::config::HashName;

/// Render scan statistics JSON (`{"2024-01": {"application/pdf": 120}}`) as a stacked bar chart.
#[derive(Parser, Debug, Clone)]
#[command(name = "scanviz_demo", version)]
pub(crate) struct Args {
    /// Statistics file to read.
    pub(crate) input: PathBuf,

    /// Where to write the SVG.
    #[arg(short, long, default_value = "scanviz_chart.svg")]
    pub(crate) output: PathBuf,

    /// JSON chart configuration; flags below override its values.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Categories kept as individual series.
    #[arg(long)]
    pub(crate) top_k: Option<usize>,

    /// Drop the overflow series when it is zero in every bucket.
    #[arg(long)]
    pub(crate) no_empty_overflow: bool,

    /// Legend label length before truncation, in chars.
    #[arg(long)]
    pub(crate) legend_width: Option<usize>,

    /// Label hash used to pick colors.
    #[arg(long, value_enum)]
    pub(crate) hash: Option<HashName>,

    /// Pin well-known MIME types to the dashboard's colors.
    #[arg(long)]
    pub(crate) mime_overrides: bool,

    /// Log debug output (overridden by `RUST_LOG`).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}
