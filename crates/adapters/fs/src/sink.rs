//! Filesystem implementation of the artifact sink port.

use std::fs;
use std::io::{self, ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use roomgen_app::artifact::{Artifact, WriteOutcome, WritePolicy};
use roomgen_app::ports::{ArtifactSink, SinkError};
use tempfile::NamedTempFile;

/// Writes artifacts below a root directory, creating folders as needed.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    root: PathBuf,
}

impl FsArtifactSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for FsArtifactSink {
    fn write(&mut self, artifact: &Artifact) -> Result<WriteOutcome, SinkError> {
        let path = self.root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| SinkError::new(parent, err))?;
        }

        let outcome = match artifact.policy {
            WritePolicy::Overwrite => {
                fs::write(&path, &artifact.contents)
                    .map_err(|err| SinkError::new(path.clone(), err))?;
                WriteOutcome::Written
            }
            WritePolicy::CreateOnly => {
                create_new_with(&path, |file| file.write_all(artifact.contents.as_bytes()))
                    .map_err(|err| SinkError::new(path.clone(), err))?
            }
        };
        if outcome == WriteOutcome::Written {
            tracing::trace!(path = %path.display(), bytes = artifact.contents.len(), "file written");
        }
        Ok(outcome)
    }
}

/// Create `path` with the content produced by `fill`, unless it already exists.
///
/// The content is staged in a temporary file next to `path` and moved into
/// place only once complete, so a failed write leaves nothing at `path`.
fn create_new_with(
    path: &Path,
    fill: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
) -> io::Result<WriteOutcome> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    fill(&mut file)?;
    // persist_noclobber refuses atomically when the target exists
    match file.persist_noclobber(path) {
        Ok(_) => Ok(WriteOutcome::Written),
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => Ok(WriteOutcome::Kept),
        Err(err) => Err(err.error),
    }
}
