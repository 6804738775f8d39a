//! Typed bodies of the lookup table and search endpoints.

use lookupsync_domain::constants::{
    COLUMN_CLUSTER, COLUMN_GIT_BRANCH, COLUMN_GIT_REPO, COLUMN_SERVICE,
};
use lookupsync_domain::{ClusterServiceRecord, Column, Result, SyncError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /v1/lookupTables/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TableInfoResponse {
    pub name: String,
    pub content_path: String,
}

/// `GET {href}/messages`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct SearchMessages {
    #[serde(default)]
    pub messages: Vec<SearchMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SearchMessage {
    pub map: Map<String, Value>,
}

impl SearchMessage {
    pub fn cluster(&self) -> Option<&str> {
        self.map.get(COLUMN_CLUSTER).and_then(Value::as_str)
    }

    /// Convert to a record, requiring the four primary-key fields.
    ///
    /// # Errors
    /// `MalformedResponse` naming the first missing key field.
    pub fn to_record(&self, endpoint: &str) -> Result<ClusterServiceRecord> {
        for field in [COLUMN_CLUSTER, COLUMN_SERVICE, COLUMN_GIT_REPO, COLUMN_GIT_BRANCH] {
            if !self.map.get(field).is_some_and(Value::is_string) {
                return Err(SyncError::malformed(endpoint, format!("message lacks `{field}`")));
            }
        }
        serde_json::from_value(Value::Object(self.map.clone()))
            .map_err(|e| SyncError::malformed(endpoint, e))
    }
}

/// `PUT /v1/lookupTables/{id}/row`
#[derive(Debug, Serialize)]
pub(crate) struct UpsertRowRequest {
    pub row: Vec<Column>,
}

/// `PUT /v1/lookupTables/{id}/deleteTableRow`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRowRequest {
    pub primary_key: Vec<Column>,
}
