//! Shared API types for the teleoperation admin console.
//!
//! This crate holds the REST resource types consumed by the web client
//! (nodes, devices, teleop groups) and the server-declared type schemas
//! that drive the dynamic configuration forms. All types are
//! WASM-compatible and carry no DOM or async dependencies, so the wire
//! formats are testable with plain `cargo test` on the host.
//!
//! # Usage
//!
//! ```rust
//! use web_common::{Device, DevicesPayload, DeviceTypeCatalog, Node};
//! ```

mod models;
mod schema;

pub use models::*;
pub use schema::*;
