use std::fmt;

use serde::{Deserialize, Serialize};

/// Access credentials for the remote API.
///
/// Sourced once from the environment or a config file and never mutated.
/// The key is redacted from `Debug` output and never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    pub id: String,
    #[serde(skip_serializing)]
    pub key: String,
    /// Base URL of the API, e.g. `https://api.us2.sumologic.com/api`
    pub endpoint: String,
}

impl ApiCredentials {
    pub fn new(id: impl Into<String>, key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self { id: id.into(), key: key.into(), endpoint: endpoint.into() }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
