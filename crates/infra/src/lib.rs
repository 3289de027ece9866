//! # Skiff Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The HTTP gateway and its error-decoder dialects
//! - Controller v2/v3, UAA and logging clients
//! - The UAA-backed token source
//! - Config file loading and persistence
//!
//! ## Architecture
//! - Implements traits defined in `skiff-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    get_root_info, log_stream_base_url, AccessTokenProvider, LogClient, UaaClient, UaaTokenSource,
    V2Client, V3Client,
};
pub use errors::{ErrorDecoder, InfraError};
pub use http::{Gateway, GatewayBuilder, InsecureNotice, Request};
