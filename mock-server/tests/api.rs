use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, MOCK_API_KEY};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn autocomplete_request(key: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/places:autocomplete")
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("x-goog-api-key", key);
    }
    builder.body(body.to_string()).unwrap()
}

fn trip_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/trip-request")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn place_ids(body: &Value) -> Vec<String> {
    body["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["placePrediction"]["placeId"].as_str().unwrap().to_string())
        .collect()
}

const TRIP: &str = r#"{
    "customer": {"name": "Ada", "email": "ada@example.com", "phone": "+49 89 0000"},
    "trip": {
        "pickup": {"description": "Flughafen München", "place_id": "ChIJ-muc-airport"},
        "destination": {"description": "Marienplatz"},
        "dateTime": "2025-06-01T14:30:00Z",
        "passengers": 2,
        "vehicleClass": "first"
    }
}"#;

// --- autocomplete ---

#[tokio::test]
async fn autocomplete_requires_api_key() {
    let resp = app()
        .oneshot(autocomplete_request(None, r#"{"input":"mün"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["status"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn autocomplete_rejects_wrong_api_key() {
    let resp = app()
        .oneshot(autocomplete_request(Some("wrong"), r#"{"input":"mün"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn autocomplete_empty_input_returns_400() {
    let resp = app()
        .oneshot(autocomplete_request(Some(MOCK_API_KEY), r#"{"input":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn autocomplete_answers_in_requested_language() {
    let resp = app()
        .oneshot(autocomplete_request(
            Some(MOCK_API_KEY),
            r#"{"input":"marien","languageCode":"de","includedRegionCodes":["de"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let prediction = &body["suggestions"][0]["placePrediction"];
    assert_eq!(prediction["placeId"], "ChIJ-marienplatz");
    assert_eq!(prediction["structuredFormat"]["secondaryText"]["text"], "München, Deutschland");
}

#[tokio::test]
async fn autocomplete_english_omits_untranslated_places() {
    let german = body_json(
        app()
            .oneshot(autocomplete_request(
                Some(MOCK_API_KEY),
                r#"{"input":"flughafen","languageCode":"de","includedRegionCodes":["de"]}"#,
            ))
            .await
            .unwrap(),
    )
    .await;
    let english = body_json(
        app()
            .oneshot(autocomplete_request(
                Some(MOCK_API_KEY),
                r#"{"input":"flughafen","languageCode":"en","includedRegionCodes":["de"]}"#,
            ))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(place_ids(&german), vec!["ChIJ-muc-airport", "ChIJ-flughafenstrasse"]);
    assert_eq!(place_ids(&english), vec!["ChIJ-muc-airport"]);
    assert_eq!(
        english["suggestions"][0]["placePrediction"]["structuredFormat"]["mainText"]["text"],
        "Munich Airport"
    );
}

#[tokio::test]
async fn autocomplete_filters_by_region() {
    let resp = app()
        .oneshot(autocomplete_request(
            Some(MOCK_API_KEY),
            r#"{"input":"airport","languageCode":"en","includedRegionCodes":["at"]}"#,
        ))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(place_ids(&body), vec!["ChIJ-vie-airport"]);
}

#[tokio::test]
async fn autocomplete_no_match_is_empty_list() {
    let resp = app()
        .oneshot(autocomplete_request(Some(MOCK_API_KEY), r#"{"input":"zzz"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(place_ids(&body).is_empty());
}

// --- trip-request ---

#[tokio::test]
async fn trip_request_returns_request_id() {
    let resp = app().oneshot(trip_request(TRIP)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["requestId"], 1);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn trip_request_missing_email_returns_400_with_error() {
    let body = TRIP.replace("ada@example.com", "");
    let resp = app().oneshot(trip_request(&body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "customer email is required");
}

#[tokio::test]
async fn trip_request_malformed_json_returns_4xx_without_envelope() {
    let resp = app()
        .oneshot(trip_request(r#"{"customer":{}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

#[tokio::test]
async fn same_slot_twice_is_slot_full_with_200() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(trip_request(TRIP))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["requestId"], 1);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(trip_request(TRIP))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "slot full");
    assert!(body.get("success").is_none());

    // a different vehicle class is a different slot
    let other = TRIP.replace(r#""vehicleClass": "first""#, r#""vehicleClass": "xl""#);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(trip_request(&other))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["requestId"], 2);
}
