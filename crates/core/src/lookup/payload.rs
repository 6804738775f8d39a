use chrono::{DateTime, Duration, Utc};
use lookupsync_domain::constants::SEARCH_WINDOW_MS;
use lookupsync_domain::LookupTable;
use serde::Serialize;
use serde_json::Value;

/// Search job submission body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPayload {
    pub query: String,
    /// Epoch milliseconds, as a string
    pub from: String,
    pub to: String,
}

impl SearchPayload {
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "query": self.query, "from": self.from, "to": self.to })
    }
}

/// Query dumping the contents of `table`, over the window ending at `now`.
///
/// Lookup tables are snapshots rather than time series, so the window only
/// has to be valid, not meaningful.
pub fn build_search_payload(table: &LookupTable, now: DateTime<Utc>) -> SearchPayload {
    let from = now - Duration::milliseconds(SEARCH_WINDOW_MS);
    SearchPayload {
        query: format!("cat path://\"{}\"", table.content_path),
        from: from.timestamp_millis().to_string(),
        to: now.timestamp_millis().to_string(),
    }
}
