//! # roomgen-domain
//!
//! Pure model of the room/device configuration compiler.
//!
//! ## Responsibilities
//! - Hold the **device type catalog** and the capability table
//! - Define the **house description** (rooms, devices, custom types)
//! - Compile definitions into **compiled devices** and **compiled rooms**,
//!   enforcing the `(type, index)` uniqueness invariant
//! - **Assemble groups** (windows, presence, light, buttons, smoke, water,
//!   heating, speakers) from a room's tag buckets
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Rendering and file writing live in `roomgen-app` and the adapters.

pub mod error;

pub mod capability;
pub mod catalog;
pub mod definition;
pub mod device;
pub mod group;
pub mod house;
pub mod room;
pub mod tag;
