//! Startup configuration read from the local secrets file.
//!
//! The places API key has no default: a secrets file without it is refused,
//! so the app fails at startup instead of on the first keystroke.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::booking::BookingClient;
use crate::error::ConfigError;
use crate::http::validate_endpoint;
use crate::places::{PlacesClient, DEFAULT_PLACES_BASE_URL, DEFAULT_PLACES_TIMEOUT};
use crate::types::LocaleSettings;

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default)]
    places_api_key: Option<String>,
    pub booking_endpoint: String,
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,
    #[serde(default)]
    pub locale: LocaleSettings,
    #[serde(default = "default_places_timeout_secs")]
    pub places_timeout_secs: u64,
}

fn default_places_base_url() -> String {
    DEFAULT_PLACES_BASE_URL.to_string()
}

fn default_places_timeout_secs() -> u64 {
    DEFAULT_PLACES_TIMEOUT.as_secs()
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("booking_endpoint", &self.booking_endpoint)
            .field("places_base_url", &self.places_base_url)
            .field("locale", &self.locale)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        for (field, value) in [
            ("bookingEndpoint", &self.booking_endpoint),
            ("placesBaseUrl", &self.places_base_url),
        ] {
            if validate_endpoint(value).is_err() {
                return Err(ConfigError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn api_key(&self) -> &str {
        self.places_api_key.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn places_client(&self) -> PlacesClient {
        PlacesClient::new(&self.places_base_url, self.api_key())
            .with_timeout(Duration::from_secs(self.places_timeout_secs))
    }

    pub fn booking_client(&self) -> BookingClient {
        BookingClient::new(&self.booking_endpoint)
    }
}
