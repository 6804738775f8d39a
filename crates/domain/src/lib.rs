//! # lookupsync Domain
//!
//! Business domain types and models for lookupsync.
//!
//! This crate contains:
//! - Records exported from the cluster configuration repository
//! - Remote lookup table, search job and transport contract types
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - Depends only on the foundation tier of `lookupsync-common`
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
