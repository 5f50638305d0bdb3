//! House description loader.
//!
//! The format is chosen from the file extension: `.json` or `.toml`.

use std::fs;
use std::path::Path;

use roomgen_domain::definition::HouseDefinition;

use crate::error::FsError;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Detect the format of `path` from its extension, ignoring case.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Read and parse the house description at `path`.
///
/// # Errors
///
/// Returns [`FsError::UnsupportedFormat`] for an unknown extension,
/// [`FsError::Read`] when the file cannot be read, and a parse error naming
/// the file when its content does not match the expected shape.
pub fn load_house(path: &Path) -> Result<HouseDefinition, FsError> {
    let format = Format::from_path(path).ok_or_else(|| FsError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    tracing::debug!(path = %path.display(), ?format, "loading house description");

    let content = fs::read_to_string(path).map_err(|source| FsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_house(&content, format, path)
}

/// Parse a house description already read into memory. `path` is only used
/// in error messages.
///
/// # Errors
///
/// Returns [`FsError::ParseJson`] or [`FsError::ParseToml`] when `content`
/// does not match the house description shape.
pub fn parse_house(content: &str, format: Format, path: &Path) -> Result<HouseDefinition, FsError> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|source| FsError::ParseJson {
            path: path.to_path_buf(),
            source,
        }),
        Format::Toml => toml::from_str(content).map_err(|source| FsError::ParseToml {
            path: path.to_path_buf(),
            source: Box::new(source),
        }),
    }
}
