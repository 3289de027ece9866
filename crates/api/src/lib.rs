//! # Skiff App
//!
//! Application layer consumed by the command front end.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Tracing initialisation
//! - Outcome logging and exit-code helpers
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the gateways, clients and token source into one `Actor`
//! - Owns the only write of the config file

pub mod context;
pub mod utils;

pub use context::*;
