//! Lookup table reconciliation
//!
//! A run reads the target cluster's rows from every configured lookup table
//! through a search job, upserts every local record, and deletes the remote
//! rows no local record matched:
//!
//! 1. fetch: build a [`RemoteRowIndex`](lookupsync_domain::RemoteRowIndex)
//!    of deletion candidates
//! 2. upload: each attempted upsert removes its key from the candidates,
//!    whether or not the call succeeds
//! 3. prune: delete whatever candidates are left
//!
//! Read failures abort the run before anything is written. Write failures
//! are logged, counted and skipped.

mod payload;
mod report;
mod service;
mod wire;

pub use payload::{build_search_payload, SearchPayload};
pub use report::{FetchOutcome, PruneReport, SyncReport, UploadReport};
pub use service::{LookupTableSync, SyncSettings};
