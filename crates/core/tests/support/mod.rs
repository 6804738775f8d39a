//! Shared test helpers for `lookupsync-core` integration tests.
//!
//! Provides a scripted in-memory transport and JSON fixtures shaped like the
//! remote API's responses.

#![allow(dead_code)]

pub mod fixtures;
pub mod transport;
