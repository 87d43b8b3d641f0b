//! Error types for the packaging stage
//!
//! Provides structured error handling with context and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the packaging stage
#[derive(Error, Debug)]
pub enum PackagerError {
    /// The external packaging tool is not on PATH
    #[error("{tool} not present in $PATH")]
    ToolMissing { tool: String },

    /// Package name template could not be rendered
    #[error("Template error: failed to render '{template}'")]
    Template {
        template: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The external tool exited with a non-zero status
    #[error("Process error: {command} failed with exit code {exit_code:?}\n{output}")]
    Process {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    /// The external tool could not be started
    #[error("Process error: failed to execute {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline was cancelled while a command was running
    #[error("Cancelled: {command} was interrupted")]
    Cancelled { command: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A packaging task panicked or was aborted
    #[error("Task error: {message}")]
    Task { message: String },
}

impl PackagerError {
    /// Create a new missing tool error
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Create a new template error
    pub fn template(template: impl Into<String>, source: handlebars::RenderError) -> Self {
        Self::Template {
            template: template.into(),
            source: Box::new(source),
        }
    }

    /// Create a new process error
    pub fn process(
        command: impl Into<String>,
        exit_code: Option<i32>,
        output: impl Into<String>,
    ) -> Self {
        Self::Process {
            command: command.into(),
            exit_code,
            output: output.into(),
        }
    }

    /// Create a new spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new cancellation error
    pub fn cancelled(command: impl Into<String>) -> Self {
        Self::Cancelled {
            command: command.into(),
        }
    }

    /// Create a new configuration error wrapping its cause
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new task error
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PackagerError>;
