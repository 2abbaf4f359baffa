// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Bikestem: a bicycle stem and fit calculator.
//!
//! Given frame stack and reach, a fit target for the handlebar position and
//! the adjustable components (spacers, stem length, head-tube angle, stem
//! angle), it computes where the handlebar ends up and how far that is from
//! the target. The whole configuration round-trips through a single
//! `urlstate` query parameter so it can be bookmarked and shared.

pub mod config;
pub mod diff;
pub mod geometry;
pub mod model;
pub mod persistence;
pub mod settings;
pub mod sync;
pub mod validation;

mod cli;

pub use cli::{CliOptions, CliOutput, execute};
pub use config::ReconcilerConfig;
pub use diff::FitReport;
pub use geometry::Geometry;
pub use model::{FitState, NumericInput};
pub use sync::Reconciler;

/// Entry point for the `bikestem` command
pub fn run<I>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = String>,
{
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bikestem=info".parse()?),
        )
        .init();

    cli::run(args)
}
