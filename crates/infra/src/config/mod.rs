//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load_from_file, load_from_lookup, load_with_fallback, probe_config_paths, standard_config_dirs,
};
