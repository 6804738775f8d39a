//! # lookupsync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest-backed [`RateLimitedHttpClient`] implementing `ApiTransport`
//! - Loading of the line-delimited cluster/service export
//! - Configuration loading from the environment and from files
//!
//! ## Architecture
//! - Implements traits defined in `lookupsync-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod export;
pub mod http;

// Re-export commonly used items
pub use export::{load_cluster_services, parse_cluster_services};
pub use http::{RateLimitedHttpClient, RateLimitedHttpClientBuilder};
