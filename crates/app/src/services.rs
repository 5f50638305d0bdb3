//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod generate_service;

pub use generate_service::{GenerateError, GenerateService, GenerationReport};
