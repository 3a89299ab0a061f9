//! Async booking submission: build, execute once, classify.

use std::sync::Arc;

use tracing::{info, warn};

use crate::booking::BookingClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{BookingPayload, BookingResult};

/// Posts trip requests through a `Transport`. No retries: a failure is
/// returned to the caller as is.
#[derive(Clone)]
pub struct BookingSubmitter {
    client: BookingClient,
    transport: Arc<dyn Transport>,
}

impl BookingSubmitter {
    pub fn new(client: BookingClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub async fn submit(&self, payload: &BookingPayload) -> Result<BookingResult, ApiError> {
        let request = self.client.build_submit(payload)?;
        let outcome = match self.transport.execute(request).await {
            Ok(response) => self.client.parse_submit(response),
            Err(e) => Err(e.into()),
        };

        match &outcome {
            Ok(result) => info!(request_id = ?result.request_id, "trip request accepted"),
            Err(e) => warn!(endpoint = self.client.endpoint(), error = %e, "trip request failed"),
        }
        outcome
    }
}
