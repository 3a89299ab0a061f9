use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const MOCK_API_KEY: &str = "mock-places-key";

/// One catalog entry. `en` is optional so a place can exist only in a
/// local-language index.
pub struct Place {
    pub id: &'static str,
    pub region: &'static str,
    pub en: Option<(&'static str, &'static str)>,
    pub de: (&'static str, &'static str),
}

pub const CATALOG: &[Place] = &[
    Place {
        id: "ChIJ-muc-airport",
        region: "de",
        en: Some(("Munich Airport", "Munich, Germany")),
        de: ("Flughafen München", "München, Deutschland"),
    },
    Place {
        id: "ChIJ-muc-hbf",
        region: "de",
        en: Some(("Munich Central Station", "Munich, Germany")),
        de: ("München Hauptbahnhof", "München, Deutschland"),
    },
    Place {
        id: "ChIJ-marienplatz",
        region: "de",
        en: Some(("Marienplatz", "Munich, Germany")),
        de: ("Marienplatz", "München, Deutschland"),
    },
    Place {
        id: "ChIJ-flughafenstrasse",
        region: "de",
        en: None,
        de: ("Flughafenstraße", "Freising, Deutschland"),
    },
    Place {
        id: "ChIJ-vie-airport",
        region: "at",
        en: Some(("Vienna International Airport", "Schwechat, Austria")),
        de: ("Flughafen Wien", "Schwechat, Österreich"),
    },
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    pub input: String,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub included_region_codes: Vec<String>,
    #[serde(default)]
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub description: String,
    #[serde(default)]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub pickup: Location,
    pub destination: Location,
    pub date_time: String,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub flight_number: Option<String>,
    pub vehicle_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub customer: Customer,
    pub trip: Trip,
}

#[derive(Default)]
pub struct Bookings {
    next_id: i64,
    taken_slots: HashSet<(String, String)>,
    pub requests: HashMap<i64, TripRequest>,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<String>,
    pub bookings: Arc<RwLock<Bookings>>,
}

impl AppState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::new(api_key.to_string()),
            bookings: Arc::new(RwLock::new(Bookings::default())),
        }
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(MOCK_API_KEY))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/v1/places:autocomplete", post(autocomplete))
        .route("/trip-request", post(trip_request))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn google_error(status: StatusCode, label: &str, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({"error": {"code": status.as_u16(), "message": message, "status": label}})),
    )
}

async fn autocomplete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AutocompleteRequest>,
) -> (StatusCode, Json<Value>) {
    let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok());
    if key != Some(state.api_key.as_str()) {
        return google_error(StatusCode::FORBIDDEN, "PERMISSION_DENIED", "API key not valid.");
    }
    if req.input.trim().is_empty() {
        return google_error(
            StatusCode::BAD_REQUEST,
            "INVALID_ARGUMENT",
            "input must not be empty.",
        );
    }

    let language = req.language_code.as_deref().unwrap_or("en");
    let needle = req.input.to_lowercase();
    let suggestions: Vec<Value> = CATALOG
        .iter()
        .filter(|p| {
            req.included_region_codes.is_empty()
                || req.included_region_codes.iter().any(|r| r.eq_ignore_ascii_case(p.region))
        })
        .filter(|p| {
            p.de.0.to_lowercase().contains(&needle)
                || p.en.is_some_and(|(main, _)| main.to_lowercase().contains(&needle))
        })
        .filter_map(|p| {
            let (main, secondary) = match language {
                "de" => p.de,
                _ => p.en?,
            };
            Some(json!({"placePrediction": {
                "placeId": p.id,
                "text": {"text": format!("{main}, {secondary}")},
                "structuredFormat": {
                    "mainText": {"text": main},
                    "secondaryText": {"text": secondary},
                },
            }}))
        })
        .collect();

    info!(input = %req.input, language, count = suggestions.len(), "autocomplete");
    (StatusCode::OK, Json(json!({ "suggestions": suggestions })))
}

async fn trip_request(
    State(state): State<AppState>,
    Json(req): Json<TripRequest>,
) -> (StatusCode, Json<Value>) {
    let missing = if req.customer.name.trim().is_empty() {
        Some("customer name is required")
    } else if req.customer.email.trim().is_empty() {
        Some("customer email is required")
    } else if req.trip.pickup.description.trim().is_empty() {
        Some("pickup is required")
    } else if req.trip.destination.description.trim().is_empty() {
        Some("destination is required")
    } else {
        None
    };
    if let Some(error) = missing {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": error })));
    }

    let mut bookings = state.bookings.write().await;
    let slot = (req.trip.date_time.clone(), req.trip.vehicle_class.clone());
    if !bookings.taken_slots.insert(slot) {
        info!(date_time = %req.trip.date_time, "slot already taken");
        return (StatusCode::OK, Json(json!({ "error": "slot full" })));
    }

    bookings.next_id += 1;
    let id = bookings.next_id;
    bookings.requests.insert(id, req);
    info!(request_id = id, "trip request stored");
    (
        StatusCode::OK,
        Json(json!({"success": true, "requestId": id, "message": "Trip request received"})),
    )
}
