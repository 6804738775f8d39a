//! HTTP transport for the remote API

mod client;

pub use client::{RateLimitedHttpClient, RateLimitedHttpClientBuilder};
