use std::time::Duration;

use async_trait::async_trait;
use lookupsync_core::ApiTransport;
use lookupsync_domain::constants::ADMIN_MODE_HEADER;
use lookupsync_domain::{ApiCredentials, ApiRequest, ApiResponse, HttpMethod, Result, SyncError};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Authenticated client for the remote REST API.
///
/// Every call honours the request's pre-call delay before it is issued, and
/// returns the status code instead of failing on non-2xx responses. Only
/// transport failures (connect errors, timeouts) are retried, and only when
/// more than one attempt is configured.
#[derive(Clone)]
pub struct RateLimitedHttpClient {
    client: ReqwestClient,
    credentials: ApiCredentials,
    max_attempts: usize,
    base_backoff: Duration,
}

impl RateLimitedHttpClient {
    /// Start building a client for `credentials`.
    pub fn builder(credentials: ApiCredentials) -> RateLimitedHttpClientBuilder {
        RateLimitedHttpClientBuilder::new(credentials)
    }

    /// Convenience constructor with default configuration.
    pub fn new(credentials: ApiCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub const fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    /// Absolute URL for `path`.
    ///
    /// Links returned by the API already carry the endpoint; it is stripped
    /// so it never appears twice.
    pub fn url_for(&self, path: &str) -> String {
        let endpoint = self.credentials.endpoint.trim_end_matches('/');
        let relative = path.strip_prefix(endpoint).unwrap_or(path);
        if relative.starts_with('/') {
            format!("{endpoint}{relative}")
        } else {
            format!("{endpoint}/{relative}")
        }
    }

    fn build_request(&self, request: &ApiRequest) -> RequestBuilder {
        let mut builder = self
            .client
            .request(to_method(request.method), self.url_for(&request.path))
            .basic_auth(&self.credentials.id, Some(&self.credentials.key));

        if request.admin {
            builder = builder.header(ADMIN_MODE_HEADER, "true");
        }
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }
        builder
    }

    /// Execute the provided request builder, retrying transport failures.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                SyncError::Network("request body cannot be cloned for a retry".into())
            })?;

            let request = cloned_builder.build().map_err(|err| SyncError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    debug!(attempt = attempt + 1, %method, %url, status = %response.status(), "received HTTP response");
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(SyncError::Network("http client exhausted retries without producing a result".into()))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = u32::try_from(retry_number.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1_u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ApiTransport for RateLimitedHttpClient {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        if !request.pre_delay.is_zero() {
            tokio::time::sleep(request.pre_delay).await;
        }

        let response = self.send(self.build_request(&request)).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|err| SyncError::from(InfraError::from(err)))?;
        let body = decode_body(&bytes);
        debug!(status, bytes = bytes.len(), "decoded response");
        Ok(ApiResponse::new(status, body))
    }
}

impl std::fmt::Debug for RateLimitedHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedHttpClient")
            .field("credentials", &self.credentials)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RateLimitedHttpClient`].
#[derive(Debug)]
pub struct RateLimitedHttpClientBuilder {
    credentials: ApiCredentials,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl RateLimitedHttpClientBuilder {
    fn new(credentials: ApiCredentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(30),
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts for transport failures.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// `SyncError::Config` when the underlying client cannot be created.
    pub fn build(self) -> Result<RateLimitedHttpClient> {
        let agent = self
            .user_agent
            .unwrap_or_else(|| concat!("lookupsync/", env!("CARGO_PKG_VERSION")).to_string());
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(agent)
            .no_proxy()
            .build()
            .map_err(|err| SyncError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(RateLimitedHttpClient {
            client,
            credentials: self.credentials,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}

const fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when the body parses, the raw text otherwise, `Null` when empty.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}
