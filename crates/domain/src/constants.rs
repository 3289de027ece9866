//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! workspace.

// Version gates
pub const MIN_V3_STAGE_VERSION: &str = "3.27.0";
pub const MIN_V3_CREATE_FROM_SOURCE_VERSION: &str = "3.27.0";

// UAA client defaults
pub const DEFAULT_UAA_CLIENT: &str = "cf";
pub const DEFAULT_UAA_CLIENT_SECRET: &str = "";

// Request timeouts (seconds)
pub const DEFAULT_DIAL_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// Job engine
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_STAGING_TIMEOUT_SECS: u64 = 900;
pub const POLL_INITIAL_INTERVAL_MS: u64 = 500;
pub const POLL_MULTIPLIER: f64 = 1.5;
pub const POLL_MAX_INTERVAL_MS: u64 = 15_000;
pub const UNKNOWN_JOB_FAILURE: &str = "unknown";

// HTTP
pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";
pub const BEARER_PREFIX: &str = "bearer ";
pub const INSECURE_SSL_WARNING: &str = "Request made with insecure SSL verification disabled.";

// Log streaming
pub const LOG_CHANNEL_CAPACITY: usize = 256;
pub const LOG_ENVELOPE_MAX_BYTES: usize = 1024 * 1024;
