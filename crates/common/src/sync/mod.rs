//! Concurrency helpers for driving remote work
//!
//! ## Submodules
//!
//! - **`mapper`**: order-preserving async map with a bounded worker count

pub mod mapper;

pub use mapper::map_concurrent;
