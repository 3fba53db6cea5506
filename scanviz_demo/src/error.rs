// Copyright 2025 the Scanviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use scanviz_transforms::InvalidObservation;

/// Everything that stops a chart from being written.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DemoError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("malformed statistics in {}: {source}", path.display())]
    Statistics {
        path: PathBuf,
        source: InvalidObservation,
    },
}
