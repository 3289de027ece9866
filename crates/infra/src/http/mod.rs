//! HTTP gateway
//!
//! One [`Gateway`] exists per API dialect. Each is built with the error
//! decoder for its dialect, and every request it sends returns the warnings
//! read from the response headers alongside the result.

pub mod gateway;
pub mod pagination;
pub mod request;
pub mod streaming;
pub mod warnings;

pub use gateway::{default_user_agent, Gateway, GatewayBuilder, Response};
pub use pagination::{Flow, Page};
pub use request::{Request, RequestBody};
pub use streaming::{BodyReader, BodySink};
pub use warnings::{parse_warnings, InsecureNotice};
