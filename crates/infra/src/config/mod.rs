//! Configuration loading and persistence
//!
//! This module reads and writes the persisted config file and reads the
//! runtime settings from environment variables.

pub mod loader;

// Re-export commonly used items
pub use loader::{config_path, load, load_from_file, load_settings, save_to_file};
