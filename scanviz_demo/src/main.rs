// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a scan statistics file as a stacked bar chart SVG.
//!
//! ```text
//! RUST_LOG=debug scanviz_demo stats.json -o mime_types.svg --top-k 10 --mime-overrides
//! ```

mod cli;
mod config;
mod error;
mod svg;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use scanviz_charts::{ChartData, HeuristicTextMeasurer, Palette};
use scanviz_transforms::Observation;

use crate::cli::Args;
use crate::config::DemoConfig;
use crate::error::DemoError;

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), DemoError> {
    let config = DemoConfig::load(args.config.as_deref(), args)?;
    log::debug!("{config:?}");

    let text = std::fs::read_to_string(&args.input).map_err(|source| DemoError::Read {
        path: args.input.clone(),
        source,
    })?;
    let observation =
        Observation::from_json_str(&text).map_err(|source| DemoError::Statistics {
            path: args.input.clone(),
            source,
        })?;
    log::info!(
        "read {} buckets from {} (fingerprint {:016x})",
        observation.len(),
        args.input.display(),
        observation.fingerprint()
    );

    let aggregation = config
        .top_k()
        .apply(&observation)
        .map_err(|source| DemoError::Statistics {
            path: args.input.clone(),
            source,
        })?;
    log::debug!(
        "retained {} of the categories, grand total {}",
        aggregation.retained().len(),
        aggregation.grand_total()
    );

    let palette = Palette::preset();
    let colorizer = config.colorizer(palette.clone());
    let data = ChartData::adapt_with_overflow_label(&aggregation, &colorizer, &config.overflow_label);

    let layout = config
        .chart()
        .layout(&data, &palette, &HeuristicTextMeasurer::default());
    std::fs::write(&args.output, svg::render(&layout)).map_err(|source| DemoError::Write {
        path: args.output.clone(),
        source,
    })?;
    log::info!("wrote {} marks to {}", layout.marks.len(), args.output.display());

    for (series, line) in data.series.iter().zip(data.legend_labels(&config.legend_format())) {
        println!("{:<8} {line}", palette.swatch(series.color).name);
    }
    Ok(())
}
