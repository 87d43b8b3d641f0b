//! Pipeline artifacts
//!
//! Handles the list of files the release pipeline knows about: the binaries
//! handed to this stage and the packages it produces.

use crate::core::platform::Platform;
use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

/// Type of a pipeline artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A compiled binary
    Binary,
    /// A deb, rpm or other Linux package
    LinuxPackage,
}

/// A file produced by some pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// File name as published, e.g. `app` or `app_1.0.0_linux_amd64.deb`
    pub name: String,
    pub path: PathBuf,
    pub os: String,
    pub arch: String,
    pub arm: Option<String>,
}

impl Artifact {
    /// Create a binary artifact for the given platform
    pub fn binary(name: impl Into<String>, path: impl Into<PathBuf>, platform: &Platform) -> Self {
        Self {
            kind: ArtifactKind::Binary,
            name: name.into(),
            path: path.into(),
            os: platform.os.clone(),
            arch: platform.arch.clone(),
            arm: platform.arm.clone(),
        }
    }

    /// Platform this artifact was built for
    pub fn platform(&self) -> Platform {
        Platform::new(self.os.clone(), self.arch.clone(), self.arm.clone())
    }
}

/// Matches artifacts of the given kind
pub fn by_kind(kind: ArtifactKind) -> impl Fn(&Artifact) -> bool {
    move |artifact| artifact.kind == kind
}

/// Matches artifacts built for the given OS
pub fn by_os(os: &str) -> impl Fn(&Artifact) -> bool + '_ {
    move |artifact| artifact.os == os
}

/// Append-only, thread-safe collection of artifacts
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    items: Mutex<Vec<Artifact>>,
}

impl ArtifactRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Artifact>> {
        // Appends never leave the list half-written, so a poisoned lock is still usable
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new artifact
    pub fn add(&self, artifact: Artifact) {
        debug!(
            "Registered artifact: {} ({:?}) at {}",
            artifact.name,
            artifact.kind,
            artifact.path.display()
        );
        self.lock().push(artifact);
    }

    /// Artifacts matching the predicate, in registration order
    pub fn filter<F>(&self, predicate: F) -> Vec<Artifact>
    where
        F: Fn(&Artifact) -> bool,
    {
        self.lock()
            .iter()
            .filter(|artifact| predicate(artifact))
            .cloned()
            .collect()
    }
}

/// Group artifacts by platform, keeping their relative order inside each group
pub fn group_by_platform(artifacts: Vec<Artifact>) -> BTreeMap<Platform, Vec<Artifact>> {
    let mut groups: BTreeMap<Platform, Vec<Artifact>> = BTreeMap::new();
    for artifact in artifacts {
        groups.entry(artifact.platform()).or_default().push(artifact);
    }
    groups
}
