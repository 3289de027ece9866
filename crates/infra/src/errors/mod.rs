//! Error handling for the infrastructure layer
//!
//! Every gateway is constructed with one [`ErrorDecoder`]. The decoder turns a
//! non-2xx status and its raw body into the typed domain error for that API
//! dialect.

pub mod conversions;
mod mapping;
pub mod uaa;
pub mod v2;
pub mod v3;

pub use conversions::{into_domain, InfraError};
use skiff_domain::Error;

/// Maps a non-2xx response to a typed error.
pub type ErrorDecoder = fn(u16, &[u8]) -> Error;

/// The error synthesized when a body cannot be decoded in the dialect's shape.
pub(crate) fn raw_http_error(status: u16, body: &[u8]) -> Error {
    Error::Http {
        status,
        code: String::new(),
        description: String::from_utf8_lossy(body).into_owned(),
    }
}
