//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::time::Duration;

use ridebook_core::{
    merge_suggestions, ApiError, BookingClient, BookingPayload, BookingResult, HttpMethod,
    HttpRequest, HttpResponse, LocaleSettings, PlacesClient, Suggestion,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn simulated(sim: &Value) -> HttpResponse {
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn request_body(req: &HttpRequest) -> Value {
    serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
}

/// Compare an error against `{"kind": ..., "status"?: ..., "message"?: ...}`.
fn assert_error(name: &str, err: &ApiError, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "server_rejected" => match err {
            ApiError::ServerRejected { status, message } => {
                assert_eq!(
                    u64::from(*status),
                    expected["status"].as_u64().unwrap(),
                    "{name}: status"
                );
                assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
            }
            other => panic!("{name}: expected ServerRejected, got {other:?}"),
        },
        "malformed_response" => {
            assert!(matches!(err, ApiError::MalformedResponse(_)), "{name}: got {err:?}");
        }
        other => panic!("{name}: unknown error kind {other}"),
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[test]
fn booking_test_vectors() {
    let raw = include_str!("../../test-vectors/booking.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = BookingClient::new(&format!("{BASE_URL}/trip-request"));
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: BookingPayload = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = client.build_submit(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post, "{name}: method");
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: url"
        );
        let expected_headers: Vec<(String, String)> =
            serde_json::from_value(expected_req["headers"].clone()).unwrap();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert_eq!(
            req.timeout,
            Some(Duration::from_secs(expected_req["timeout_secs"].as_u64().unwrap())),
            "{name}: timeout"
        );
        assert_eq!(request_body(&req), expected_req["body"], "{name}: body");

        // Verify parse
        let result = client.parse_submit(simulated(&case["simulated_response"]));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: BookingResult =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Autocomplete
// ---------------------------------------------------------------------------

#[test]
fn autocomplete_test_vectors() {
    let raw = include_str!("../../test-vectors/autocomplete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = PlacesClient::new(BASE_URL, "vector-key");
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let locale: LocaleSettings = serde_json::from_value(serde_json::json!({
            "languageCode": input["languageCode"],
            "regionCode": input["regionCode"],
            "includedRegions": input["includedRegions"],
        }))
        .unwrap();
        let text = input["text"].as_str().unwrap();

        // Verify build
        let localized_req = client.build_autocomplete(&locale.localized_query(text, None)).unwrap();
        let english_req = client.build_autocomplete(&locale.english_query(text, None)).unwrap();
        for (req, side) in [(&localized_req, "localized"), (&english_req, "english")] {
            assert_eq!(req.method, HttpMethod::Post, "{name}: {side} method");
            assert_eq!(req.url, format!("{BASE_URL}/v1/places:autocomplete"), "{name}: {side} url");
            assert_eq!(req.header("x-goog-api-key"), Some("vector-key"), "{name}: {side} key");
            assert_eq!(request_body(req), case["expected_requests"][side], "{name}: {side} body");
        }

        // Verify parse + join
        let responses = &case["simulated_responses"];
        let localized = client.parse_autocomplete(simulated(&responses["localized"]));
        let english = client.parse_autocomplete(simulated(&responses["english"]));
        let merged = localized.and_then(|l| english.map(|e| merge_suggestions(l, e)));

        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &merged.unwrap_err(), expected_error);
        } else {
            let expected: Vec<Suggestion> =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(merged.unwrap(), expected, "{name}: merged result");
        }
    }
}
