//! Pipeline context
//!
//! Bundles what a stage needs from the surrounding pipeline: a config
//! snapshot, the shared artifact registry and the cancellation signal.

use crate::{config::Config, core::artifacts::ArtifactRegistry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Explicit dependencies of a pipeline stage
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: Arc<Config>,
    pub artifacts: Arc<ArtifactRegistry>,
    pub cancel: CancellationToken,
}

impl PipelineContext {
    /// Create a context with an empty registry and a fresh cancellation token
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            artifacts: Arc::new(ArtifactRegistry::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Use the given cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
