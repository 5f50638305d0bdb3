//! Errors raised while reading house descriptions.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {}", path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in {}", path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// Neither `.json` nor `.toml`.
    #[error("unsupported house file {}: expected a .json or .toml extension", path.display())]
    UnsupportedFormat { path: PathBuf },
}
