//! Typed API clients
//!
//! Each client is a thin facade over one gateway: it declares the endpoint,
//! marshals the request, lifts the response into domain entities, and returns
//! the gateway's warnings and errors untouched. Clients never retry.

pub mod auth;
pub mod ccv2;
pub mod ccv3;
pub mod info;
pub mod logging;
pub mod uaa;

pub use auth::{AccessTokenProvider, UaaTokenSource};
pub use ccv2::V2Client;
pub use ccv3::V3Client;
pub use info::get_root_info;
pub use logging::{log_stream_base_url, LogClient};
pub use uaa::UaaClient;
