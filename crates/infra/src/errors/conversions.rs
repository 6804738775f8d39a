//! Conversions from external infrastructure errors into domain errors.

use lookupsync_domain::SyncError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SyncError);

impl From<InfraError> for SyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SyncError> for InfraError {
    fn from(value: SyncError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSyncError {
    fn into_sync_error(self) -> SyncError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SyncError */
/* -------------------------------------------------------------------------- */

impl IntoSyncError for HttpError {
    fn into_sync_error(self) -> SyncError {
        let target = self.url().map(|url| format!(" ({})", url.path())).unwrap_or_default();

        if self.is_timeout() {
            return SyncError::Network(format!("HTTP request timed out{target}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return SyncError::Network(format!("HTTP connection failure{target}"));
        }

        if self.is_builder() {
            return SyncError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return SyncError::Network(format!("failed to read HTTP response body{target}: {self}"));
        }

        SyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_sync_error())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn timeout_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        let mapped: SyncError = InfraError::from(error).into();
        match mapped {
            SyncError::Network(msg) => assert!(msg.contains("timed out"), "{msg}"),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get("http://127.0.0.1:9/").send().await.unwrap_err();

        let mapped: SyncError = InfraError::from(error).into();
        assert!(matches!(mapped, SyncError::Network(_)), "{mapped:?}");
        assert!(mapped.is_fatal());
    }
}
