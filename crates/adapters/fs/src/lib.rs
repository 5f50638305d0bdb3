//! # roomgen-adapter-fs
//!
//! Filesystem adapter.
//!
//! ## Responsibilities
//! - Implement the `ArtifactSink` port defined in `roomgen-app::ports`,
//!   honouring overwrite and create-only write policies
//! - Load a house description from a JSON or TOML file
//!
//! ## Dependency rule
//! Depends on `roomgen-app` (for port traits) and `roomgen-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod loader;
pub mod sink;

pub use error::FsError;
pub use loader::load_house;
pub use sink::FsArtifactSink;
