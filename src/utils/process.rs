//! Process execution utilities
//!
//! Runs external tools with captured output, an explicit environment and a
//! cancellation token that kills the child when fired.

use crate::error::{PackagerError, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Utility for running external processes
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    debug: bool,
}

/// Result of a process execution
#[derive(Debug)]
pub struct ProcessResult {
    /// Exit status code
    pub exit_code: Option<i32>,
    /// Standard output followed by standard error
    pub output: String,
    /// Whether the process was successful
    pub success: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a command with exactly the given environment and capture its output.
    ///
    /// A non-zero exit is an error carrying the combined output. When `cancel`
    /// fires the child is killed and [`PackagerError::Cancelled`] is returned.
    #[instrument(skip_all, fields(program = %program.as_ref().display()))]
    pub async fn run_with_output<P: AsRef<Path>>(
        &self,
        program: P,
        args: &[String],
        env: &[(OsString, OsString)],
        cancel: &CancellationToken,
    ) -> Result<ProcessResult> {
        let program = program.as_ref();
        let cmd_str = format!("{} {}", program.display(), args.join(" "));

        if self.debug {
            debug!("Running command: {}", cmd_str);
        } else {
            info!("+ {}", cmd_str);
        }

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env_clear()
            .envs(env.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| PackagerError::spawn(&cmd_str, e))?;

        let output = tokio::select! {
            output = child.wait_with_output() => {
                output.map_err(|e| PackagerError::spawn(&cmd_str, e))?
            }
            () = cancel.cancelled() => {
                // Dropping the wait future drops the child, which kills it
                warn!("Cancelled: {}", cmd_str);
                return Err(PackagerError::cancelled(&cmd_str));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let success = output.status.success();
        let exit_code = output.status.code();

        debug!(
            "Command finished: success={}, exit_code={:?}, output_len={}",
            success,
            exit_code,
            combined.len()
        );

        if !success {
            debug!("Command output: {}", combined);
            return Err(PackagerError::process(cmd_str, exit_code, combined));
        }

        Ok(ProcessResult {
            exit_code,
            output: combined,
            success,
        })
    }

    /// Resolve a command on PATH
    #[instrument(skip(self))]
    pub fn locate(&self, command: &str) -> Result<PathBuf> {
        match which::which(command) {
            Ok(path) => {
                debug!("Found {} at {}", command, path.display());
                Ok(path)
            }
            Err(e) => {
                debug!("Failed to locate '{}': {}", command, e);
                Err(PackagerError::tool_missing(command))
            }
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::env::tool_env;
    use std::time::{Duration, Instant};

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_process_runner_creation() {
        let runner = ProcessRunner::new(true);
        assert!(runner.debug);

        let runner = ProcessRunner::default();
        assert!(!runner.debug);
    }

    #[tokio::test]
    async fn test_run_with_output() {
        let runner = ProcessRunner::new(false);
        let result = runner
            .run_with_output(
                "echo",
                &args(&["hello", "world"]),
                &tool_env("/nonexistent"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.output.trim(), "hello world");
    }

    #[tokio::test]
    async fn test_failing_command_carries_output() {
        let runner = ProcessRunner::new(false);
        let result = runner
            .run_with_output(
                "sh",
                &args(&["-c", "echo out; echo err >&2; exit 3"]),
                &tool_env("/nonexistent"),
                &CancellationToken::new(),
            )
            .await;

        match result {
            Err(PackagerError::Process {
                exit_code, output, ..
            }) => {
                assert_eq!(exit_code, Some(3));
                assert!(output.contains("out"));
                assert!(output.contains("err"));
            }
            other => panic!("Expected process error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_env_is_passed() {
        let runner = ProcessRunner::new(false);
        let result = runner
            .run_with_output(
                "sh",
                &args(&["-c", "echo $PATH"]),
                &tool_env("/opt/alt/bin"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(result.output.starts_with("/opt/alt/bin:"));
    }

    #[tokio::test]
    async fn test_cancel_kills_process() {
        let runner = ProcessRunner::new(false);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result = runner
            .run_with_output("sleep", &args(&["30"]), &tool_env("/nonexistent"), &cancel)
            .await;

        assert!(matches!(result, Err(PackagerError::Cancelled { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ProcessRunner::new(false);
        let result = runner
            .run_with_output(
                "nonexistent_command_12345",
                &[],
                &tool_env("/nonexistent"),
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(PackagerError::Spawn { .. })));
    }

    #[test]
    fn test_locate() {
        let runner = ProcessRunner::new(false);

        assert!(runner.locate("sh").unwrap().is_absolute());
        assert!(matches!(
            runner.locate("nonexistent_command_12345"),
            Err(PackagerError::ToolMissing { .. })
        ));
    }
}
