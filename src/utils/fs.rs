//! File system utility functions
//!
//! Provides directory handling with proper error mapping.

use crate::error::{PackagerError, Result};
use std::{fs, path::Path};
use tempfile::TempDir;
use tracing::{debug, instrument};

/// Prefix of the scratch directories handed to fpm
const WORKDIR_PREFIX: &str = "fpm";

/// Utility struct for file system operations
#[derive(Debug, Default)]
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Create a new file system utilities instance
    pub fn new() -> Self {
        Self
    }

    /// Create directories recursively
    #[instrument(skip(self, path))]
    pub fn create_dir_all<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Creating directory: {}", path.display());
        fs::create_dir_all(path).map_err(|e| PackagerError::file_system("create directory", path, e))
    }

    /// Allocate a fresh, uniquely named scratch directory under the system temp dir.
    ///
    /// The directory is removed when the returned guard is dropped.
    pub fn create_workdir(&self) -> Result<TempDir> {
        self.create_workdir_in(std::env::temp_dir())
    }

    /// Allocate a fresh scratch directory inside `parent`
    pub fn create_workdir_in<P: AsRef<Path>>(&self, parent: P) -> Result<TempDir> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| PackagerError::file_system("create temporary directory", parent, e))?;

        debug!("Created workdir: {}", dir.path().display());
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dir_all() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("dist").join("linux");

        FileSystemUtils::new().create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());

        // Existing directories are fine
        FileSystemUtils::new().create_dir_all(&nested).unwrap();
    }

    #[test]
    fn test_workdirs_are_unique_and_cleaned_up() {
        let root = tempfile::tempdir().unwrap();
        let fs_utils = FileSystemUtils::new();

        let first = fs_utils.create_workdir_in(root.path()).unwrap();
        let second = fs_utils.create_workdir_in(root.path()).unwrap();
        assert_ne!(first.path(), second.path());
        assert!(
            first
                .path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("fpm")
        );

        let path = first.path().to_path_buf();
        drop(first);
        assert!(!path.exists());
    }

    #[test]
    fn test_workdir_in_missing_parent_fails() {
        let root = tempfile::tempdir().unwrap();
        let result = FileSystemUtils::new().create_workdir_in(root.path().join("missing"));
        assert!(matches!(result, Err(PackagerError::FileSystem { .. })));
    }
}
