//! The I/O seam: executes an `HttpRequest` and hands back the raw response.
//!
//! # Design
//! The endpoint clients never perform I/O themselves; the async components
//! take an `Arc<dyn Transport>` so tests can script responses in-process.
//! `UreqTransport` is the production implementation. ureq is blocking, so
//! each call runs on Tokio's blocking pool; dropping the returned future does
//! not stop a request already handed to that pool.

use async_trait::async_trait;
use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request`. Every HTTP status, 4xx and 5xx included, is a
    /// successful round-trip here; only failures below HTTP are errors.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::new(format!("transport task failed: {e}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, TransportError> {
    debug!(method = req.method.as_str(), url = %req.url, "dispatching request");

    let result = match req.method {
        HttpMethod::Post => {
            let mut builder = agent.post(&req.url);
            for (k, v) in &req.headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            let builder = builder.config().timeout_global(req.timeout).build();
            match &req.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::new(format!("failed to read response body: {e}")))?;

    Ok(HttpResponse { status, headers, body })
}
