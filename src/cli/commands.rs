//! Command implementations for the CLI

use crate::{
    cli::{BinaryInput, Command},
    config::Config,
    context::PipelineContext,
    core::{
        artifacts::{Artifact, ArtifactKind, by_kind},
        pipe::{self, FpmPipe, PipeOutcome},
        tool::FPM_BINARY,
    },
};
use anyhow::Context;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Workdir shown by `plan`; the real one is created per run
const PLAN_WORKDIR: &str = "<workdir>";

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config))]
pub async fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Package { input } => execute_package_command(config, &input.binaries).await,
        Command::Plan { input } => execute_plan_command(config, &input.binaries),
    }
}

/// Build a context holding the binaries given on the command line
fn context_with_binaries(
    config: &Config,
    binaries: &[BinaryInput],
    cancel: CancellationToken,
) -> PipelineContext {
    let ctx = PipelineContext::new(config.clone()).with_cancellation(cancel);
    for binary in binaries {
        ctx.artifacts
            .add(Artifact::binary(binary.name(), &binary.path, &binary.platform));
    }
    ctx
}

/// Execute the package command
#[instrument(skip(config, binaries))]
async fn execute_package_command(config: &Config, binaries: &[BinaryInput]) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let ctx = context_with_binaries(config, binaries, cancel.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping running fpm processes");
            cancel.cancel();
        }
    });

    let stage = FpmPipe::fpm(config.debug);
    info!("{}", stage.description());

    match stage.run(&ctx).await.context("Failed to create Linux packages")? {
        PipeOutcome::Skipped { reason } => {
            info!("Skipped: {}", reason);
        }
        PipeOutcome::Packaged { packages } => {
            for package in ctx.artifacts.filter(by_kind(ArtifactKind::LinuxPackage)) {
                println!("{}", package.path.display());
            }
            info!("Packaging completed successfully. {} package(s) created", packages);
        }
    }

    Ok(())
}

/// Execute the plan command
#[instrument(skip(config, binaries))]
fn execute_plan_command(config: &Config, binaries: &[BinaryInput]) -> anyhow::Result<()> {
    let ctx = context_with_binaries(config, binaries, CancellationToken::new());
    let stage = FpmPipe::fpm(config.debug);

    if config.fpm.formats.is_empty() {
        info!("No output formats configured, nothing to plan");
        return Ok(());
    }

    let tasks = stage.plan(&ctx);
    info!("Planned {} package(s)", tasks.len());

    for task in &tasks {
        let name = pipe::package_name(&ctx, task)
            .with_context(|| format!("Failed to name {} package for {}", task.format, task.platform))?;
        let spec = pipe::package_spec(&ctx, task, &name, Path::new(PLAN_WORKDIR));
        println!("{} {}", FPM_BINARY, spec.to_args().join(" "));
    }

    Ok(())
}
