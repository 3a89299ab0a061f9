//! Domain DTOs shared by the places and booking clients.
//!
//! # Design
//! The booking types serialize to the backend's exact JSON field names; the
//! places wire format lives privately in `places` since callers only ever see
//! the decoded `PlacePrediction` and the joined `Suggestion`. Types are
//! defined independently from the mock-server crate; integration tests catch
//! schema drift.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One merged autocomplete entry: English text plus the user-locale text for
/// the same place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub place_id: String,
    pub main_text: String,
    pub secondary_text: String,
    pub main_text_localized: String,
    pub secondary_text_localized: String,
}

/// One prediction decoded from a single autocomplete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePrediction {
    pub place_id: String,
    pub main_text: String,
    pub secondary_text: String,
}

/// Inputs for one autocomplete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteQuery {
    pub text: String,
    pub language_code: String,
    pub region_code: String,
    pub included_regions: Vec<String>,
    pub session_token: Option<Uuid>,
}

/// The caller's locale and the region filter applied to every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSettings {
    pub language_code: String,
    pub region_code: String,
    #[serde(default)]
    pub included_regions: Vec<String>,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            language_code: "en".to_string(),
            region_code: "US".to_string(),
            included_regions: vec!["us".to_string()],
        }
    }
}

impl LocaleSettings {
    /// Query in the caller's own language.
    pub fn localized_query(&self, text: &str, session_token: Option<Uuid>) -> AutocompleteQuery {
        self.query(text, &self.language_code, session_token)
    }

    /// Same query forced to English.
    pub fn english_query(&self, text: &str, session_token: Option<Uuid>) -> AutocompleteQuery {
        self.query(text, "en", session_token)
    }

    fn query(
        &self,
        text: &str,
        language_code: &str,
        session_token: Option<Uuid>,
    ) -> AutocompleteQuery {
        AutocompleteQuery {
            text: text.to_string(),
            language_code: language_code.to_string(),
            region_code: self.region_code.clone(),
            included_regions: self.included_regions.clone(),
            session_token,
        }
    }
}

/// Vehicle category offered by the booking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Business,
    First,
    Xl,
}

impl VehicleClass {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Business => "business",
            VehicleClass::First => "first",
            VehicleClass::Xl => "xl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A pickup or destination, optionally pinned to a provider place id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub description: String,
    #[serde(rename = "place_id", default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl LocationRef {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            place_id: None,
        }
    }

    /// Location taken from an autocomplete pick, described in the user's locale.
    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        let description = if suggestion.secondary_text_localized.is_empty() {
            suggestion.main_text_localized.clone()
        } else {
            format!(
                "{}, {}",
                suggestion.main_text_localized, suggestion.secondary_text_localized
            )
        };
        Self {
            description,
            place_id: Some(suggestion.place_id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub pickup: LocationRef,
    pub destination: LocationRef,
    /// RFC 3339 instant, see `schedule::combine_date_and_time`.
    pub date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    pub vehicle_class: VehicleClass,
}

/// Request payload for `POST /trip-request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub customer: Customer,
    pub trip: Trip,
}

/// Response envelope of the booking endpoint. Every field is optional; an
/// `error` marks the submission as rejected regardless of HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BookingPayload {
        BookingPayload {
            customer: Customer {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 20 7946 0000".to_string(),
            },
            trip: Trip {
                pickup: LocationRef {
                    description: "Flughafen München".to_string(),
                    place_id: Some("ChIJmuc-airport".to_string()),
                },
                destination: LocationRef::new("Marienplatz 1"),
                date_time: "2025-06-01T14:30:00Z".to_string(),
                passengers: Some(2),
                flight_number: None,
                vehicle_class: VehicleClass::First,
            },
        }
    }

    #[test]
    fn booking_payload_uses_backend_field_names() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json["customer"]["name"], "Ada Lovelace");
        assert_eq!(json["trip"]["dateTime"], "2025-06-01T14:30:00Z");
        assert_eq!(json["trip"]["vehicleClass"], "first");
        assert_eq!(json["trip"]["passengers"], 2);
        assert_eq!(json["trip"]["pickup"]["place_id"], "ChIJmuc-airport");
        assert!(json["trip"].get("flightNumber").is_none());
        assert!(json["trip"]["destination"].get("place_id").is_none());
    }

    #[test]
    fn booking_result_tolerates_missing_fields() {
        let result: BookingResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, BookingResult::default());

        let result: BookingResult =
            serde_json::from_str(r#"{"success":true,"requestId":42,"message":"ok"}"#).unwrap();
        assert_eq!(result.success, Some(true));
        assert_eq!(result.request_id, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn english_query_keeps_region_filter() {
        let locale = LocaleSettings {
            language_code: "de".to_string(),
            region_code: "DE".to_string(),
            included_regions: vec!["de".to_string()],
        };
        let token = Uuid::nil();
        let localized = locale.localized_query("flug", Some(token));
        let english = locale.english_query("flug", Some(token));
        assert_eq!(localized.language_code, "de");
        assert_eq!(english.language_code, "en");
        assert_eq!(english.region_code, "DE");
        assert_eq!(english.included_regions, localized.included_regions);
        assert_eq!(english.session_token, localized.session_token);
        assert_eq!(english.text, "flug");
    }

    #[test]
    fn location_from_suggestion_uses_localized_text() {
        let suggestion = Suggestion {
            place_id: "p1".to_string(),
            main_text: "Munich Airport".to_string(),
            secondary_text: "Munich, Germany".to_string(),
            main_text_localized: "Flughafen München".to_string(),
            secondary_text_localized: "München, Deutschland".to_string(),
        };
        let loc = LocationRef::from_suggestion(&suggestion);
        assert_eq!(loc.description, "Flughafen München, München, Deutschland");
        assert_eq!(loc.place_id.as_deref(), Some("p1"));
    }
}
