//! Domain types and models

pub mod api;
pub mod credentials;
pub mod index;
pub mod job;
pub mod lookup;
pub mod record;

pub use api::{ApiRequest, ApiResponse, HttpMethod};
pub use credentials::ApiCredentials;
pub use index::{RemoteRowIndex, TableRows};
pub use job::{GenericJobStatus, RemoteJob, SearchJobState};
pub use lookup::{Column, LookupTable};
pub use record::{ClusterServiceRecord, IdentityKey};
