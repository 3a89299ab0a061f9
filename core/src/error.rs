//! Error types for the places and booking clients.
//!
//! # Design
//! `ApiError` is shared by both endpoints. `ServerRejected` covers every
//! failure the server reported, whether through an explicit `error` field or
//! a status outside 2xx, so callers render one message. Transport failures
//! are surfaced verbatim; nothing here retries.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the endpoint clients and the async components.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint: {0:?}")]
    InvalidEndpoint(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Encoding(String),

    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server reported a failure, either in the body or via status.
    #[error("server rejected request (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// The response body could not be decoded into the expected envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// Server-supplied message for `ServerRejected`, `None` otherwise.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            ApiError::ServerRejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// A request that failed below HTTP: connect, TLS, timeout, body read.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.0)
    }
}

/// Errors raised while loading `ClientConfig` at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read secrets file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode secrets file: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("places API key is missing from the secrets file")]
    MissingApiKey,

    #[error("{field} is not a valid http(s) URL: {value:?}")]
    InvalidUrl { field: &'static str, value: String },
}
