//! Artifact sink port: where rendered files end up.

use std::path::PathBuf;

use crate::artifact::{Artifact, WriteOutcome};

/// Failure to persist one artifact.
#[derive(Debug, thiserror::Error)]
#[error("failed to write artifact {}", path.display())]
pub struct SinkError {
    pub path: PathBuf,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl SinkError {
    pub fn new(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Persists rendered artifacts.
///
/// Implementations must honour [`Artifact::policy`]: an
/// [`Overwrite`](crate::artifact::WritePolicy::Overwrite) artifact always
/// replaces existing content, a
/// [`CreateOnly`](crate::artifact::WritePolicy::CreateOnly) artifact is
/// skipped with [`WriteOutcome::Kept`] when its path already exists.
pub trait ArtifactSink {
    /// Write one artifact.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the artifact cannot be persisted.
    fn write(&mut self, artifact: &Artifact) -> Result<WriteOutcome, SinkError>;
}
