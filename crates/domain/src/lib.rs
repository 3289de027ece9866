//! # Skiff Domain
//!
//! Business domain types and models for Skiff.
//!
//! This crate contains:
//! - Platform entities (Organization, Space, Application, Package, Droplet, Job)
//! - The `Warnings` / `Warned<T>` pair returned by every fallible operation
//! - The error taxonomy and Result definition
//! - Query predicates for the v2 and v3 index endpoints
//! - The persisted configuration view
//!
//! ## Architecture
//! - No dependencies on other Skiff crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod macros;
pub mod types;
pub mod warnings;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use filter::*;
pub use types::*;
pub use warnings::{Warned, Warnings};
