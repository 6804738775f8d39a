//! Fake remote API for infrastructure integration tests.

#![allow(dead_code)]

use lookupsync_domain::ApiCredentials;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_PREFIX: &str = "/api";

/// WireMock server answering the lookup table and search job endpoints.
pub struct FakeApi {
    pub server: MockServer,
}

impl FakeApi {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{API_PREFIX}", self.server.uri())
    }

    pub fn credentials(&self) -> ApiCredentials {
        ApiCredentials::new("accessId", "secret", self.endpoint())
    }

    /// Serve metadata and a finished search job for `table_id`.
    ///
    /// The job link is absolute, as the platform returns it.
    pub async fn mount_table(&self, table_id: &str, rows: Vec<Value>) {
        let content_path = format!("/Library/Admin/Lookups/{table_id}");
        let job_path = format!("{API_PREFIX}/v1/search/jobs/J-{table_id}");

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/v1/lookupTables/{table_id}")))
            .and(header("isAdminMode", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": table_id,
                "name": format!("table {table_id}"),
                "contentPath": content_path,
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("{API_PREFIX}/v1/search/jobs")))
            .and(body_partial_json(json!({"query": format!("cat path://\"{content_path}\"")})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "id": format!("J-{table_id}"),
                "link": {"rel": "self", "href": format!("{}{job_path}", self.server.uri())},
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(job_path.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "DONE GATHERING RESULTS",
                "messageCount": rows.len(),
                "recordCount": 0,
            })))
            .mount(&self.server)
            .await;

        let messages: Vec<Value> = rows.into_iter().map(|map| json!({"map": map})).collect();
        Mock::given(method("GET"))
            .and(path(format!("{job_path}/messages")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": messages})))
            .mount(&self.server)
            .await;
    }

    /// Accept every row upsert and delete.
    pub async fn accept_mutations(&self) {
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&self.server)
            .await;
    }

    pub async fn requests(&self, http_method: &str, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .collect()
    }
}

pub fn row(cluster: &str, service: &str) -> Value {
    json!({"cluster": cluster, "service": service, "git_repo": "r", "git_branch": "main"})
}

pub fn body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}
