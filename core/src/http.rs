//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! endpoint clients build `HttpRequest` values and parse `HttpResponse` values
//! without touching the network; a `Transport` (or a mobile host across the
//! C ABI) executes the actual I/O.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross FFI
//! boundaries without lifetime concerns.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by the `build_*` methods of `PlacesClient` and `BookingClient`.
/// `timeout` bounds the whole round-trip when set.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Keys ride along in headers, keep them out of logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let sensitive = k.eq_ignore_ascii_case("authorization")
                    || k.to_ascii_lowercase().contains("api-key");
                (k.as_str(), if sensitive { "[REDACTED]" } else { v.as_str() })
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(String::len))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` (or the FFI host) after executing an
/// `HttpRequest`. Non-2xx statuses are carried here, not turned into errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Check that `endpoint` is an absolute http(s) URL with a host.
pub(crate) fn validate_endpoint(endpoint: &str) -> Result<(), ApiError> {
    let parsed =
        url::Url::parse(endpoint).map_err(|_| ApiError::InvalidEndpoint(endpoint.to_string()))?;
    let http = matches!(parsed.scheme(), "http" | "https");
    if !http || parsed.host_str().is_none() {
        return Err(ApiError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(())
}
