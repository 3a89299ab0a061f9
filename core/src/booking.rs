//! Request builder and response classifier for the trip-request endpoint.
//!
//! # Design
//! An explicit `error` in the body decides failure before the HTTP status
//! does: the backend answers some rejections with 200. A non-2xx status
//! without an `error` field becomes a generic status message, whatever the
//! body holds.

use std::time::Duration;

use crate::error::ApiError;
use crate::http::{validate_endpoint, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{BookingPayload, BookingResult};

pub const BOOKING_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless client for the booking endpoint.
#[derive(Debug, Clone)]
pub struct BookingClient {
    endpoint: String,
}

impl BookingClient {
    /// `endpoint` is the full URL of the trip-request resource.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_submit(&self, payload: &BookingPayload) -> Result<HttpRequest, ApiError> {
        validate_endpoint(&self.endpoint)?;
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Encoding(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            timeout: Some(BOOKING_TIMEOUT),
        })
    }

    pub fn parse_submit(&self, response: HttpResponse) -> Result<BookingResult, ApiError> {
        let decoded = serde_json::from_str::<BookingResult>(&response.body);

        if let Ok(BookingResult { error: Some(message), .. }) = &decoded {
            return Err(ApiError::ServerRejected {
                status: response.status,
                message: message.clone(),
            });
        }
        if !response.is_success() {
            return Err(ApiError::ServerRejected {
                status: response.status,
                message: format!("server returned status {}", response.status),
            });
        }
        decoded.map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}
