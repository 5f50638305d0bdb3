//! Rendered output files and how they may be written.

use std::path::PathBuf;

/// How a sink treats an artifact whose path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Fully derived output; always replaced.
    Overwrite,
    /// Hand-editable output; written only when nothing exists yet.
    CreateOnly,
}

/// What a sink did with an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// A create-only artifact already existed and was left untouched.
    Kept,
}

/// One file to produce, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
    pub policy: WritePolicy,
}

impl Artifact {
    #[must_use]
    pub fn generated(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
            policy: WritePolicy::Overwrite,
        }
    }

    #[must_use]
    pub fn stub(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
            policy: WritePolicy::CreateOnly,
        }
    }
}
