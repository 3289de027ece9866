//! # Skiff Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the v2, v3, UAA and logging clients
//! - The Async Job Engine
//! - The Action Layer consumed by commands
//!
//! ## Architecture Principles
//! - Only depends on `skiff-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits
//! - The job engine is the only component that sleeps

pub mod actions;
pub mod jobs;
pub mod ports;

pub use actions::{Actor, Clients, DeployedApplication, LogStream};
pub use jobs::{JobPoller, JobPolling, PollConfig};
pub use ports::{
    Authenticator, CloudControllerV2, CloudControllerV3, JobSource, LogSource, TokenStore,
};
