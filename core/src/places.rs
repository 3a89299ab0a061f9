//! Request builder, response parser and locale join for the places
//! autocomplete endpoint.
//!
//! # Design
//! `PlacesClient` holds the base URL, the API key and a timeout, and carries
//! no mutable state between calls. `build_autocomplete` produces an
//! `HttpRequest`, `parse_autocomplete` consumes an `HttpResponse`, and
//! `merge_suggestions` joins a localized and an English answer by place id.
//! None of it touches the network.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{validate_endpoint, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AutocompleteQuery, PlacePrediction, Suggestion};

pub const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com";
pub const DEFAULT_PLACES_TIMEOUT: Duration = Duration::from_secs(10);

const AUTOCOMPLETE_PATH: &str = "/v1/places:autocomplete";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteRequestBody<'a> {
    input: &'a str,
    language_code: &'a str,
    region_code: &'a str,
    included_region_codes: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponseBody {
    #[serde(default)]
    suggestions: Vec<WireSuggestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSuggestion {
    place_prediction: Option<WirePrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePrediction {
    place_id: String,
    #[serde(default)]
    text: Option<FormattableText>,
    #[serde(default)]
    structured_format: Option<StructuredFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredFormat {
    main_text: FormattableText,
    #[serde(default)]
    secondary_text: Option<FormattableText>,
}

#[derive(Debug, Deserialize)]
struct FormattableText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
}

impl From<WirePrediction> for PlacePrediction {
    fn from(wire: WirePrediction) -> Self {
        let (main_text, secondary_text) = match wire.structured_format {
            Some(format) => (
                format.main_text.text,
                format.secondary_text.map(|t| t.text).unwrap_or_default(),
            ),
            None => (wire.text.map(|t| t.text).unwrap_or_default(), String::new()),
        };
        PlacePrediction {
            place_id: wire.place_id,
            main_text,
            secondary_text,
        }
    }
}

/// Stateless client for the places autocomplete endpoint.
#[derive(Clone)]
pub struct PlacesClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: DEFAULT_PLACES_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn autocomplete_url(&self) -> String {
        format!("{}{AUTOCOMPLETE_PATH}", self.base_url)
    }

    pub fn build_autocomplete(&self, query: &AutocompleteQuery) -> Result<HttpRequest, ApiError> {
        let url = self.autocomplete_url();
        validate_endpoint(&url)?;

        let body = AutocompleteRequestBody {
            input: &query.text,
            language_code: &query.language_code,
            region_code: &query.region_code,
            included_region_codes: &query.included_regions,
            session_token: query.session_token,
        };
        let body = serde_json::to_string(&body).map_err(|e| ApiError::Encoding(e.to_string()))?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("x-goog-api-key".to_string(), self.api_key.clone()),
            ],
            body: Some(body),
            timeout: Some(self.timeout),
        })
    }

    /// Decode the place predictions of one response, in provider order.
    /// Query predictions (entries without a place) are skipped.
    pub fn parse_autocomplete(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<PlacePrediction>, ApiError> {
        if !response.is_success() {
            let message = serde_json::from_str::<GoogleErrorBody>(&response.body)
                .ok()
                .map(|b| b.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("server returned status {}", response.status));
            return Err(ApiError::ServerRejected {
                status: response.status,
                message,
            });
        }

        let body: AutocompleteResponseBody = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        Ok(body
            .suggestions
            .into_iter()
            .filter_map(|s| s.place_prediction)
            .map(PlacePrediction::from)
            .collect())
    }
}

/// Join a localized and an English answer to the same query.
///
/// Localized order is kept. A localized prediction without an English
/// counterpart is dropped, as is any repeat of an already emitted place id.
pub fn merge_suggestions(
    localized: Vec<PlacePrediction>,
    english: Vec<PlacePrediction>,
) -> Vec<Suggestion> {
    let mut english_by_id: HashMap<String, PlacePrediction> = HashMap::with_capacity(english.len());
    for prediction in english {
        english_by_id.entry(prediction.place_id.clone()).or_insert(prediction);
    }

    let mut seen = HashSet::new();
    localized
        .into_iter()
        .filter_map(|local| {
            let english = english_by_id.get(&local.place_id)?;
            if !seen.insert(local.place_id.clone()) {
                return None;
            }
            Some(Suggestion {
                main_text: english.main_text.clone(),
                secondary_text: english.secondary_text.clone(),
                main_text_localized: local.main_text,
                secondary_text_localized: local.secondary_text,
                place_id: local.place_id,
            })
        })
        .collect()
}
