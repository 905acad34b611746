//! Integration tests for `DirectoryClient` using wiremock HTTP mocks.

use std::time::Duration;

use rust_decimal::Decimal;
use welp_core::Coordinate;
use welp_directory::{CityId, DirectoryClient, DirectoryError, RetryPolicy};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DirectoryClient {
    DirectoryClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

fn immediate_retries(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::ZERO, Duration::ZERO)
}

fn restaurant(name: &str, cost_for_two: i64) -> serde_json::Value {
    serde_json::json!({
        "restaurant": {
            "name": name,
            "location": {
                "address": format!("{name} address"),
                "latitude": "30.2671530000",
                "longitude": "-97.7430608000"
            },
            "average_cost_for_two": cost_for_two,
            "user_rating": { "aggregate_rating": "4.0" }
        }
    })
}

#[tokio::test]
async fn find_city_returns_first_suggestion_id() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "location_suggestions": [
            { "id": 278, "name": "Austin, TX" },
            { "id": 9999, "name": "Austin, MN" }
        ],
        "status": "success",
        "has_more": 0
    });

    Mock::given(method("GET"))
        .and(path("/cities"))
        .and(query_param("q", "Austin"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client.find_city("Austin").await.expect("should parse cities");

    assert_eq!(id, Some(CityId(278)));
}

#[tokio::test]
async fn find_city_without_suggestions_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location_suggestions": [],
            "status": "success"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client.find_city("Atlantis").await.expect("empty list is not an error");
    assert!(id.is_none());
}

#[tokio::test]
async fn search_near_sends_coordinate_and_cost_sort() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "results_found": 2,
        "results_start": 0,
        "results_shown": 2,
        "restaurants": [restaurant("Cheap Eats", 10), restaurant("Mid Range", 40)]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("lat", "30.26715"))
        .and(query_param("lon", "-97.74306"))
        .and(query_param("sort", "cost"))
        .and(query_param("order", "asc"))
        .and(query_param("count", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client
        .search_near(Coordinate::new(30.267_15, -97.743_06))
        .await
        .expect("should parse search results");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].name.as_deref(), Some("Cheap Eats"));
    assert_eq!(candidates[0].average_cost_for_two, Some(Decimal::from(10)));
    assert_eq!(candidates[1].name.as_deref(), Some("Mid Range"));
}

#[tokio::test]
async fn search_city_sends_entity_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("entity_type", "city"))
        .and(query_param("entity_id", "278"))
        .and(query_param("sort", "cost"))
        .and(query_param("order", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results_found": 1,
            "restaurants": [restaurant("Food Truck", 16)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client
        .search_city(CityId(278))
        .await
        .expect("should parse search results");

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].rating.as_deref(), Some("4.0"));
}

#[tokio::test]
async fn search_skips_malformed_items_and_keeps_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "restaurants": [
                restaurant("First", 10),
                { "not_a_restaurant": true },
                "garbage",
                restaurant("Second", 20)
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client.search_city(CityId(1)).await.unwrap();

    let names: Vec<_> = candidates.iter().filter_map(|c| c.name.as_deref()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[tokio::test]
async fn error_envelope_is_surfaced_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "code": 403,
            "status": "Forbidden",
            "message": "Invalid API Key"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.find_city("Austin").await.unwrap_err();

    assert!(
        matches!(err, DirectoryError::ApiError { code: 403, ref message } if message == "Invalid API Key"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location_suggestions": [{ "id": 280 }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(immediate_retries(2));
    let id = client.find_city("New York").await.expect("retry should recover");
    assert_eq!(id, Some(CityId(280)));
}

#[tokio::test]
async fn client_error_envelope_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "code": 403,
            "status": "Forbidden",
            "message": "Invalid API Key"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(immediate_retries(3));
    let err = client.find_city("Austin").await.unwrap_err();
    assert!(matches!(err, DirectoryError::ApiError { code: 403, .. }));
}

#[tokio::test]
async fn rate_limited_request_gives_up_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(immediate_retries(2));
    let err = client.search_city(CityId(1)).await.unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(err, DirectoryError::ApiError { code: 429, .. }));
}

#[tokio::test]
async fn server_error_text_omits_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DirectoryClient::with_base_url("SECRET-KEY-123", 30, &server.uri())
        .expect("client construction should not fail");
    let err = client.search_near(Coordinate::new(30.27, -97.74)).await.unwrap_err();

    assert!(
        !err.to_string().contains("SECRET-KEY-123"),
        "api key leaked: {err}"
    );
}

#[tokio::test]
async fn unreachable_directory_error_omits_api_key() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DirectoryClient::with_base_url("SECRET-KEY-123", 5, &format!("http://{addr}"))
        .expect("client construction should not fail");
    let err = client.find_city("Austin").await.unwrap_err();

    assert!(matches!(err, DirectoryError::Http(_)), "unexpected error: {err:?}");
    assert!(err.is_transient());
    assert!(
        !err.to_string().contains("SECRET-KEY-123"),
        "api key leaked: {err}"
    );
    assert!(
        !format!("{err:?}").contains("SECRET-KEY-123"),
        "api key leaked: {err:?}"
    );
}

#[tokio::test]
async fn invalid_json_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_city(CityId(1)).await.unwrap_err();
    match err {
        DirectoryError::Deserialize { context, .. } => {
            assert!(!context.contains("test-key"), "api key leaked: {context}");
        }
        other => panic!("expected Deserialize, got {other:?}"),
    }
}
