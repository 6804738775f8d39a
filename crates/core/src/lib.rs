//! # lookupsync Core
//!
//! Pure business logic layer - no HTTP or environment code.
//!
//! This crate contains:
//! - The transport port implemented by the infrastructure layer
//! - The asynchronous job poller (submit → poll → fetch result)
//! - Lookup table reconciliation against the local export
//!
//! ## Architecture Principles
//! - Only depends on `lookupsync-common` and `lookupsync-domain`
//! - All remote access goes through [`ApiTransport`]
//! - Remote calls are serialized unless a caller opts into more workers

pub mod lookup;
pub mod poller;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use lookup::{
    build_search_payload, FetchOutcome, LookupTableSync, PruneReport, SearchPayload, SyncReport,
    SyncSettings, UploadReport,
};
pub use poller::{
    GenericJobProtocol, JobPoller, JobProgress, JobProtocol, PollSchedule, PollState,
    SearchJobProtocol,
};
pub use ports::ApiTransport;
