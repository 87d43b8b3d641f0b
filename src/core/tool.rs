//! The external packaging tool
//!
//! [`PackageTool`] is the seam between the orchestrator and the process that
//! actually writes packages. [`FpmTool`] drives the real `fpm` binary.

use crate::{
    error::Result,
    utils::{
        env::{GNU_TAR_PATH, tool_env},
        process::ProcessRunner,
    },
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Name of the fpm executable
pub const FPM_BINARY: &str = "fpm";

/// Something that can turn an argument list into a package file
#[async_trait]
pub trait PackageTool: Send + Sync {
    /// Find the tool, failing with `ToolMissing` when it is not installed
    fn locate(&self) -> Result<PathBuf>;

    /// Run the located `program` once with the given arguments
    async fn invoke(
        &self,
        program: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// The fpm command line tool, resolved through PATH
#[derive(Debug, Clone)]
pub struct FpmTool {
    runner: ProcessRunner,
    path_prefix: String,
}

impl FpmTool {
    /// Create a new fpm driver
    #[must_use]
    pub fn new(debug: bool) -> Self {
        Self {
            runner: ProcessRunner::new(debug),
            path_prefix: GNU_TAR_PATH.to_string(),
        }
    }
}

#[async_trait]
impl PackageTool for FpmTool {
    fn locate(&self) -> Result<PathBuf> {
        self.runner.locate(FPM_BINARY)
    }

    async fn invoke(
        &self,
        program: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let env = tool_env(&self.path_prefix);
        self.runner
            .run_with_output(program, args, &env, cancel)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        let tool = FpmTool::new(false);
        assert_eq!(tool.path_prefix, GNU_TAR_PATH);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_runs_given_program() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("fpm-under-test");
        let marker = dir.path().join("ran");
        std::fs::write(&program, "#!/bin/sh\ntouch \"$1\"\n").unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        FpmTool::new(false)
            .invoke(
                &program,
                &[marker.display().to_string()],
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(marker.exists());
    }
}
