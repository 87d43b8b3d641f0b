//! Core functionality for Linux packaging
//!
//! Contains the artifact model, the fpm argument builder, package name
//! templating and the stage that fans packaging out over platforms.

pub mod artifacts;
pub mod package;
pub mod pipe;
pub mod platform;
pub mod template;
pub mod tool;

pub use artifacts::{Artifact, ArtifactKind, ArtifactRegistry};
pub use package::{BinaryMapping, PackageSpec};
pub use pipe::{FpmPipe, PackageTask, PipeOutcome};
pub use platform::Platform;
pub use template::{NameTemplate, TemplateFields};
pub use tool::{FpmTool, PackageTool};
