//! Linux packaging stage
//!
//! Fans out one fpm run per (format, platform) pair over the Linux binaries
//! in the artifact registry, with at most `parallelism` runs in flight, and
//! registers every produced package.

use crate::{
    context::PipelineContext,
    core::{
        artifacts::{self, Artifact, ArtifactKind},
        package::{BinaryMapping, PackageSpec},
        platform::Platform,
        template::{NameTemplate, TemplateFields},
        tool::{FpmTool, PackageTool},
    },
    error::{PackagerError, Result},
    utils::fs::FileSystemUtils,
};
use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, instrument};

/// How a run of the stage ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeOutcome {
    /// Nothing to do, the stage was skipped
    Skipped { reason: String },
    /// All planned packages were produced
    Packaged { packages: usize },
}

/// One package to produce
#[derive(Debug, Clone)]
pub struct PackageTask {
    pub format: String,
    pub platform: Platform,
    /// Binaries of the platform, in registration order
    pub binaries: Vec<Artifact>,
}

/// Holds the first error reported by any task
#[derive(Debug, Default)]
struct FirstError(Mutex<Option<PackagerError>>);

impl FirstError {
    fn record(&self, error: PackagerError) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match *slot {
            None => *slot = Some(error),
            Some(_) => debug!("Discarding additional error: {}", error),
        }
    }

    fn is_set(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn take(&self) -> Option<PackagerError> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Stage that creates Linux packages with a [`PackageTool`]
#[derive(Debug)]
pub struct FpmPipe<T> {
    tool: Arc<T>,
    fs_utils: FileSystemUtils,
}

impl FpmPipe<FpmTool> {
    /// Stage driving the real fpm binary
    pub fn fpm(debug: bool) -> Self {
        Self::new(Arc::new(FpmTool::new(debug)))
    }
}

impl<T: PackageTool + 'static> FpmPipe<T> {
    /// Create the stage around a packaging tool
    pub fn new(tool: Arc<T>) -> Self {
        Self {
            tool,
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Human readable name of the stage
    pub fn description(&self) -> &'static str {
        "creating Linux packages with fpm"
    }

    /// Enumerate every (format, platform) pair to package.
    ///
    /// Only Linux binaries take part; platforms without binaries produce no task.
    pub fn plan(&self, ctx: &PipelineContext) -> Vec<PackageTask> {
        let is_binary = artifacts::by_kind(ArtifactKind::Binary);
        let is_linux = artifacts::by_os("linux");
        let groups = artifacts::group_by_platform(
            ctx.artifacts.filter(|a| is_binary(a) && is_linux(a)),
        );

        ctx.config
            .fpm
            .formats
            .iter()
            .flat_map(|format| {
                groups.iter().map(move |(platform, binaries)| PackageTask {
                    format: format.clone(),
                    platform: platform.clone(),
                    binaries: binaries.clone(),
                })
            })
            .collect()
    }

    /// Run the stage.
    ///
    /// Returns the first error any task reported. Packages produced by tasks
    /// that succeeded stay registered either way.
    #[instrument(skip_all)]
    pub async fn run(&self, ctx: &PipelineContext) -> Result<PipeOutcome> {
        if ctx.config.fpm.formats.is_empty() {
            info!("Skipping: no output formats configured");
            return Ok(PipeOutcome::Skipped {
                reason: "no output formats configured".to_string(),
            });
        }

        let tool_path = self.tool.locate()?;
        debug!("Using packaging tool at {}", tool_path.display());

        let tasks = self.plan(ctx);
        if tasks.is_empty() {
            info!("No Linux binaries to package");
            return Ok(PipeOutcome::Packaged { packages: 0 });
        }

        self.fs_utils.create_dir_all(&ctx.config.dist)?;

        info!(
            "{}: {} package(s), parallelism {}",
            self.description(),
            tasks.len(),
            ctx.config.parallelism
        );

        let semaphore = Arc::new(Semaphore::new(ctx.config.parallelism.max(1)));
        let first_error = Arc::new(FirstError::default());
        let mut join_set = JoinSet::new();

        for task in tasks {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| PackagerError::task(format!("admission gate closed: {e}")))?;

            if first_error.is_set() {
                debug!("Not scheduling more packages after a failure");
                break;
            }

            let tool = Arc::clone(&self.tool);
            let program = tool_path.clone();
            let ctx = ctx.clone();
            let first_error = Arc::clone(&first_error);

            join_set.spawn(async move {
                // Released when the task ends, however it ends
                let _permit = permit;
                match create(tool.as_ref(), &program, &ctx, task).await {
                    Ok(artifact) => {
                        ctx.artifacts.add(artifact);
                        true
                    }
                    Err(e) => {
                        first_error.record(e);
                        false
                    }
                }
            });
        }

        let mut packages = 0;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(true) => packages += 1,
                Ok(false) => {}
                Err(e) => first_error.record(PackagerError::task(format!(
                    "packaging task did not complete: {e}"
                ))),
            }
        }

        match first_error.take() {
            Some(e) => Err(e),
            None => {
                info!("Created {} Linux package(s)", packages);
                Ok(PipeOutcome::Packaged { packages })
            }
        }
    }
}

/// Resolve the package file name, without the format extension
pub fn package_name(ctx: &PipelineContext, task: &PackageTask) -> Result<String> {
    let fields = TemplateFields::new(&ctx.config, &ctx.config.fpm.replacements, &task.binaries);
    NameTemplate::new(&ctx.config.fpm.name_template).apply(&fields)
}

/// Describe the package for `task`, named `name`, built inside `workdir`
pub fn package_spec(
    ctx: &PipelineContext,
    task: &PackageTask,
    name: &str,
    workdir: &Path,
) -> PackageSpec {
    let config = &ctx.config;
    let fpm = &config.fpm;

    PackageSpec {
        format: task.format.clone(),
        architecture: task.platform.linux_arch(),
        name: config.project_name.clone(),
        version: config.version.clone(),
        vendor: fpm.vendor.clone(),
        homepage: fpm.homepage.clone(),
        maintainer: fpm.maintainer.clone(),
        description: fpm.description.clone(),
        license: fpm.license.clone(),
        dependencies: fpm.dependencies.clone(),
        conflicts: fpm.conflicts.clone(),
        binaries: task
            .binaries
            .iter()
            .map(|binary| BinaryMapping {
                source: binary.path.clone(),
                name: binary.name.clone(),
            })
            .collect(),
        files: fpm
            .files
            .iter()
            .map(|(src, dest)| (src.clone(), dest.clone()))
            .collect(),
        bindir: fpm.bindir.clone(),
        package: config.dist.join(format!("{name}.{}", task.format)),
        workdir: workdir.to_path_buf(),
        debug: config.debug,
    }
}

/// Produce a single package and describe it as an artifact
#[instrument(skip_all, fields(format = %task.format, arch = %task.platform.linux_arch()))]
async fn create<T: PackageTool + ?Sized>(
    tool: &T,
    program: &Path,
    ctx: &PipelineContext,
    task: PackageTask,
) -> Result<Artifact> {
    let first = task.binaries.first().cloned().ok_or_else(|| {
        PackagerError::validation(format!("no binaries for platform {}", task.platform))
    })?;

    let name = package_name(ctx, &task)?;
    let workdir = FileSystemUtils::new().create_workdir()?;
    let spec = package_spec(ctx, &task, &name, workdir.path());

    info!(
        file = %spec.package.display(),
        workdir = %workdir.path().display(),
        "creating fpm package"
    );
    for binary in &task.binaries {
        debug!(path = %binary.path.display(), name = %binary.name, "added binary to fpm package");
    }
    for (src, dest) in &ctx.config.fpm.files {
        debug!(%src, %dest, "added an extra file to the fpm package");
    }

    let args = spec.to_args();
    debug!(?args, "running fpm");
    tool.invoke(program, &args, &ctx.cancel).await?;

    Ok(Artifact {
        kind: ArtifactKind::LinuxPackage,
        name: format!("{name}.{}", task.format),
        path: spec.package,
        os: first.os,
        arch: first.arch,
        arm: first.arm,
    })
}
