//! Port interfaces for remote API access

use async_trait::async_trait;
use lookupsync_domain::{ApiRequest, ApiResponse, Result};

/// Issues authenticated calls against the remote API.
///
/// Implementations wait `request.pre_delay` before sending, and return every
/// HTTP status as an [`ApiResponse`]. `Err` is reserved for calls that never
/// produced a status (connection failures, timeouts).
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse>;
}
