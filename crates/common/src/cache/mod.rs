//! On-disk response cache
//!
//! Short-circuits repeated identical remote requests within one run. Entries
//! are keyed by the logical identity of a request (a table id, or a table id
//! plus the kind of query) and are never revalidated once written: a cache
//! directory is meant to live for a single invocation, or for a debugging
//! session where replaying stale responses is the point.
//!
//! # Example
//!
//! ```no_run
//! use lookupsync_common::cache::{CacheKey, ResponseCache};
//! use lookupsync_common::error::CommonError;
//!
//! # async fn example() -> Result<(), CommonError> {
//! let cache = ResponseCache::new("/tmp/lookupsync");
//! let value: Option<u32> = cache
//!     .read_or_compute(&CacheKey::new("answer"), || async { Ok::<_, CommonError>(Some(42)) })
//!     .await?;
//! assert_eq!(value, Some(42));
//! # Ok(())
//! # }
//! ```

mod key;
mod response;
mod stats;

pub use key::CacheKey;
pub use response::ResponseCache;
pub use stats::CacheStats;
