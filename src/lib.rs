//! # fpm packager
//!
//! A release pipeline stage that turns already-built Linux binaries into
//! distribution packages (deb, rpm, ...) by driving the external `fpm` tool,
//! and records every produced package as a pipeline artifact.
//!
//! ## Features
//!
//! - Deterministic fpm argument construction from a declarative package spec
//! - One package per (format, platform) pair, with bounded parallelism
//! - Handlebars package name templates
//! - Thread-safe, append-only artifact registry
//! - Cancellation of running fpm processes
//!
//! ## Example
//!
//! ```no_run
//! use fpm_packager::{
//!     config::Config,
//!     context::PipelineContext,
//!     core::{Artifact, FpmPipe, Platform},
//! };
//!
//! # async fn run() -> fpm_packager::error::Result<()> {
//! let mut config = Config {
//!     project_name: "app".into(),
//!     version: "1.0.0".into(),
//!     ..Config::default()
//! };
//! config.fpm.formats = vec!["deb".into(), "rpm".into()];
//! config.apply_defaults();
//!
//! let ctx = PipelineContext::new(config);
//! let platform = Platform::new("linux", "amd64", None);
//! ctx.artifacts.add(Artifact::binary("app", "target/app", &platform));
//!
//! FpmPipe::fpm(false).run(&ctx).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
