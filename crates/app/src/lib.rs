//! # roomgen-app
//!
//! Application layer: rendering, use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters implement:
//!   - `ArtifactSink`: persist one rendered artifact under its write policy
//! - Render compiled rooms into TypeScript through **structured emitters**
//!   and a single serializer (`render`)
//! - Provide the `GenerateService` use-case: compile, assemble, render,
//!   then hand every artifact to the sink
//!
//! ## Dependency rule
//! Depends on `roomgen-domain` only. Never imports adapter crates. Adapters
//! depend on *this* crate, not the reverse.

pub mod artifact;
pub mod ports;
pub mod render;
pub mod services;
