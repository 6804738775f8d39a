//! Scripted `ApiTransport` for deterministic tests.

use std::collections::HashMap;

use async_trait::async_trait;
use lookupsync_core::ApiTransport;
use lookupsync_domain::{ApiRequest, ApiResponse, HttpMethod, Result, SyncError};
use parking_lot::Mutex;
use serde_json::json;

type Route = (HttpMethod, String);

/// Answers requests from per-route response queues.
///
/// Each queue is consumed front to back and its last entry repeats forever.
/// Unscripted routes answer 404. Every request is recorded, and the
/// request's pre-call delay is slept on the tokio clock so paused-time tests
/// observe pacing.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<Route, Vec<Result<ApiResponse>>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script successive responses for `method path`.
    pub fn on(&self, method: HttpMethod, path: &str, responses: Vec<ApiResponse>) -> &Self {
        self.routes
            .lock()
            .insert((method, path.to_string()), responses.into_iter().map(Ok).collect());
        self
    }

    /// Make `method path` fail at the transport level.
    pub fn fail(&self, method: HttpMethod, path: &str, error: SyncError) -> &Self {
        self.routes.lock().insert((method, path.to_string()), vec![Err(error)]);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> Vec<ApiRequest> {
        self.calls().into_iter().filter(|c| c.method == method && c.path == path).collect()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        if !request.pre_delay.is_zero() {
            tokio::time::sleep(request.pre_delay).await;
        }
        self.calls.lock().push(request.clone());

        let mut routes = self.routes.lock();
        match routes.get_mut(&(request.method, request.path.clone())) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(ApiResponse::new(404, json!({"code": "not.found"}))),
        }
    }
}
