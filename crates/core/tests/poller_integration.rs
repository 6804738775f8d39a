//! Job poller behaviour against a scripted transport, on a paused clock.

mod support;

use std::sync::Arc;
use std::time::Duration;

use lookupsync_core::{GenericJobProtocol, JobPoller, PollSchedule, SearchJobProtocol};
use lookupsync_domain::{ApiRequest, ApiResponse, HttpMethod, SyncError};
use serde_json::json;
use support::fixtures::{ok, status};
use support::transport::ScriptedTransport;
use tokio::time::Instant;

const STATUS_PATH: &str = "/v1/search/jobs/J1";

fn submitted() -> ApiResponse {
    ApiResponse::new(202, json!({"id": "J1", "link": {"rel": "self", "href": STATUS_PATH}}))
}

fn search_request() -> ApiRequest {
    ApiRequest::post("/v1/search/jobs", json!({"query": "cat path://\"/x\""}))
}

fn poller_with(transport: &Arc<ScriptedTransport>) -> JobPoller {
    JobPoller::new(Arc::clone(transport) as Arc<dyn lookupsync_core::ApiTransport>)
}

#[tokio::test(start_paused = true)]
async fn rate_limited_status_uses_whole_schedule_then_times_out() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Post, "/v1/search/jobs", vec![submitted()]);
    transport.on(HttpMethod::Get, STATUS_PATH, vec![status(429)]);
    let poller = poller_with(&transport);
    let protocol = SearchJobProtocol::default();

    let job = poller.submit(&protocol, search_request()).await.unwrap();
    let started = Instant::now();
    let err = poller.await_completion(&protocol, &job).await.unwrap_err();

    assert_eq!(err, SyncError::JobTimeout { job_id: "J1".into(), attempts: 5 });
    assert_eq!(transport.calls_to(HttpMethod::Get, STATUS_PATH).len(), 5);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(114_000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(115_000), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn server_error_fails_without_consuming_retries() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Post, "/v1/search/jobs", vec![submitted()]);
    transport.on(HttpMethod::Get, STATUS_PATH, vec![status(500), ok(json!({"state": "DONE GATHERING RESULTS"}))]);
    let poller = poller_with(&transport);
    let protocol = SearchJobProtocol::default();

    let job = poller.submit(&protocol, search_request()).await.unwrap();
    let err = poller.await_completion(&protocol, &job).await.unwrap_err();

    assert!(matches!(err, SyncError::JobFailed { ref job_id, .. } if job_id == "J1"), "{err}");
    assert_eq!(transport.calls_to(HttpMethod::Get, STATUS_PATH).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_then_running_then_done_completes() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Post, "/v1/search/jobs", vec![submitted()]);
    transport.on(
        HttpMethod::Get,
        STATUS_PATH,
        vec![
            status(429),
            ok(json!({"state": "GATHERING RESULTS", "messageCount": 1})),
            ok(json!({"state": "DONE GATHERING RESULTS", "messageCount": 2, "recordCount": 0})),
        ],
    );
    transport.on(
        HttpMethod::Get,
        "/v1/search/jobs/J1/messages?offset=0&limit=10000",
        vec![ok(json!({"messages": [{"map": {"a": "1"}}, {"map": {"a": "2"}}]}))],
    );
    let poller = poller_with(&transport);

    let started = Instant::now();
    let response = poller.run(&SearchJobProtocol::default(), search_request()).await.unwrap();

    assert_eq!(response.body["messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(transport.calls_to(HttpMethod::Get, STATUS_PATH).len(), 3);
    // 1.5s + 7.5s + 15s
    assert!(started.elapsed() >= Duration::from_millis(24_000));
    assert!(started.elapsed() < Duration::from_millis(30_000));
}

#[tokio::test]
async fn rejected_submission_reports_platform_code() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(
        HttpMethod::Post,
        "/v1/search/jobs",
        vec![ApiResponse::new(
            400,
            json!({"status": 400, "code": "searchjob.invalid.timestamp.from", "message": "bad"}),
        )],
    );
    let poller = poller_with(&transport);

    let err = poller.submit(&SearchJobProtocol::default(), search_request()).await.unwrap_err();

    assert_eq!(
        err,
        SyncError::Submission {
            path: "/v1/search/jobs".into(),
            status: 400,
            detail: "searchjob.invalid.timestamp.from".into(),
        }
    );
    assert_eq!(transport.count(HttpMethod::Get), 0);
}

#[tokio::test(start_paused = true)]
async fn result_fetch_must_return_200() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Post, "/v1/search/jobs", vec![submitted()]);
    transport.on(HttpMethod::Get, STATUS_PATH, vec![ok(json!({"state": "DONE GATHERING RESULTS"}))]);
    transport.on(HttpMethod::Get, "/v1/search/jobs/J1/messages?offset=0&limit=10000", vec![status(202)]);
    let poller = poller_with(&transport);

    let err = poller.run(&SearchJobProtocol::default(), search_request()).await.unwrap_err();

    assert!(matches!(err, SyncError::ResultFetch { status: 202, .. }), "{err}");
}

#[tokio::test(start_paused = true)]
async fn transport_failure_during_poll_is_returned() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Post, "/v1/search/jobs", vec![submitted()]);
    transport.fail(HttpMethod::Get, STATUS_PATH, SyncError::Network("connection reset".into()));
    let poller = poller_with(&transport);

    let err = poller.run(&SearchJobProtocol::default(), search_request()).await.unwrap_err();

    assert_eq!(err, SyncError::Network("connection reset".into()));
    assert_eq!(transport.calls_to(HttpMethod::Get, STATUS_PATH).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn generic_job_polls_status_and_fetches_result() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Get, "/v1/exports", vec![ok(json!({"id": "E1"}))]);
    transport.on(
        HttpMethod::Get,
        "/v1/exports/E1/status",
        vec![ok(json!({"status": "InProgress"})), ok(json!({"status": "Success"}))],
    );
    transport.on(HttpMethod::Get, "/v1/exports/E1/result", vec![ok(json!({"content": "done"}))]);
    let poller = poller_with(&transport);

    let response = poller.run(&GenericJobProtocol, ApiRequest::get("/v1/exports")).await.unwrap();

    assert_eq!(response.body, json!({"content": "done"}));
    assert_eq!(transport.calls_to(HttpMethod::Get, "/v1/exports/E1/status").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn custom_schedule_bounds_attempts() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(HttpMethod::Post, "/v1/search/jobs", vec![submitted()]);
    transport.on(HttpMethod::Get, STATUS_PATH, vec![ok(json!({"state": "NOT STARTED"}))]);
    let poller = poller_with(&transport)
        .with_schedule(PollSchedule::new([Duration::from_millis(10), Duration::from_millis(20)]));

    let err = poller.run(&SearchJobProtocol::default(), search_request()).await.unwrap_err();

    assert_eq!(err, SyncError::JobTimeout { job_id: "J1".into(), attempts: 2 });
    assert_eq!(transport.calls_to(HttpMethod::Get, STATUS_PATH).len(), 2);
}
