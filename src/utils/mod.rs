//! Utility modules for common functionality
//!
//! Provides reusable utilities for directory handling, process execution,
//! and environment handling.

pub mod env;
pub mod fs;
pub mod process;

pub use fs::FileSystemUtils;
pub use process::ProcessRunner;
