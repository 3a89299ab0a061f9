//! Networking core of the ride-booking app: places autocomplete and trip
//! request submission.
//!
//! # Overview
//! The endpoint clients (`PlacesClient`, `BookingClient`) build `HttpRequest`
//! values and parse `HttpResponse` values without touching the network
//! (host-does-IO pattern), so a mobile shell can run them over its own HTTP
//! stack through the C ABI. On top of them sit two async components that
//! execute requests through a `Transport`:
//!
//! - `AutocompleteAggregator` debounces keystrokes, queries the places API
//!   in the user's language and in English concurrently, and publishes the
//!   suggestions both answers agree on.
//! - `BookingSubmitter` posts a trip request once and classifies the reply.
//!
//! # Design
//! - Endpoint clients are stateless; the aggregator owns the only mutable
//!   state (debounce task, session token, published suggestions).
//! - Request bodies are typed per endpoint and serialized in one
//!   `serde_json` step inside each `build_*` method.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod aggregator;
pub mod booking;
pub mod config;
pub mod error;
pub mod http;
pub mod places;
pub mod schedule;
pub mod submitter;
pub mod transport;
pub mod types;
pub mod vehicle;

pub use aggregator::{AutocompleteAggregator, SuggestionState};
pub use booking::BookingClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use places::{merge_suggestions, PlacesClient};
pub use schedule::combine_date_and_time;
pub use submitter::BookingSubmitter;
pub use transport::{Transport, UreqTransport};
pub use types::{
    AutocompleteQuery, BookingPayload, BookingResult, Customer, LocaleSettings, LocationRef,
    PlacePrediction, Suggestion, Trip, VehicleClass,
};
