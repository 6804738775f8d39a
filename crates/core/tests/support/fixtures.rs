//! Records and response bodies shaped like the remote API's.

use lookupsync_domain::{ApiResponse, ClusterServiceRecord, HttpMethod};
use serde_json::{json, Value};

use super::transport::ScriptedTransport;

pub fn record(cluster: &str, service: &str) -> ClusterServiceRecord {
    ClusterServiceRecord {
        cluster: cluster.into(),
        service: service.into(),
        git_repo: "r".into(),
        git_branch: "main".into(),
        ecr_repo: "e".into(),
        ecr_tag: "t".into(),
    }
}

/// Remote row as a search message field map.
pub fn row(cluster: &str, service: &str) -> Value {
    json!({
        "cluster": cluster,
        "service": service,
        "git_repo": "r",
        "git_branch": "main",
        "_raw": format!("{cluster},{service},r,main")
    })
}

pub fn ok(body: Value) -> ApiResponse {
    ApiResponse::new(200, body)
}

pub fn status(code: u16) -> ApiResponse {
    ApiResponse::new(code, json!({"status": code, "code": "fixture.error"}))
}

pub fn search_job_path(table_id: &str) -> String {
    format!("/v1/search/jobs/J-{table_id}")
}

pub fn messages_path(table_id: &str) -> String {
    format!("{}/messages?offset=0&limit=10000", search_job_path(table_id))
}

/// Script metadata, search job and result for each `(table id, rows)`, in
/// the order tables are fetched.
pub fn script_tables(transport: &ScriptedTransport, tables: &[(&str, Vec<Value>)]) {
    let mut submissions = Vec::new();
    for (table_id, rows) in tables {
        transport.on(
            HttpMethod::Get,
            &format!("/v1/lookupTables/{table_id}"),
            vec![ok(json!({
                "id": table_id,
                "name": format!("table {table_id}"),
                "contentPath": format!("/Library/Admin/Lookups/{table_id}")
            }))],
        );
        submissions.push(ApiResponse::new(
            202,
            json!({"id": format!("J-{table_id}"), "link": {"rel": "self", "href": search_job_path(table_id)}}),
        ));
        transport.on(
            HttpMethod::Get,
            &search_job_path(table_id),
            vec![ok(json!({
                "state": "DONE GATHERING RESULTS",
                "messageCount": rows.len(),
                "recordCount": 0,
                "pendingErrors": []
            }))],
        );
        let messages: Vec<Value> = rows.iter().map(|map| json!({"map": map})).collect();
        transport.on(
            HttpMethod::Get,
            &messages_path(table_id),
            vec![ok(json!({"fields": [], "messages": messages}))],
        );
    }
    transport.on(HttpMethod::Post, "/v1/search/jobs", submissions);
}
