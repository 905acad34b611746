//! Integration tests for `GeocodeClient` using wiremock HTTP mocks.

use welp_core::Coordinate;
use welp_geocode::{GeocodeClient, GeocodeError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeocodeClient {
    GeocodeClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn takes_first_coordinate_pair_and_rounds() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "statusCode": 200,
        "statusDescription": "OK",
        "resourceSets": [{
            "estimatedTotal": 2,
            "resources": [
                { "name": "78701, TX", "point": { "type": "Point", "coordinates": [30.2711286, -97.7436995] } },
                { "name": "other", "point": { "type": "Point", "coordinates": [1.0, 1.0] } }
            ]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/Locations"))
        .and(query_param("postalCode", "78701"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client
        .locate_postal_code("78701")
        .await
        .expect("should parse locations");

    assert_eq!(coordinate, Some(Coordinate::new(30.271_13, -97.743_70)));
}

#[tokio::test]
async fn empty_resource_set_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusCode": 200,
            "resourceSets": [{ "estimatedTotal": 0, "resources": [] }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.locate_postal_code("00000").await.unwrap().is_none());
}

#[tokio::test]
async fn skips_resources_without_point() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusCode": 200,
            "resourceSets": [{ "resources": [
                { "name": "no point" },
                { "point": { "coordinates": [40.0] } },
                { "point": { "coordinates": [40.5, -74.25] } }
            ] }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client.locate_postal_code("08540").await.unwrap();
    assert_eq!(coordinate, Some(Coordinate::new(40.5, -74.25)));
}

#[tokio::test]
async fn non_ok_status_code_in_body_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusCode": 401,
            "statusDescription": "Unauthorized",
            "errorDetails": ["Access was denied."],
            "resourceSets": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.locate_postal_code("78701").await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::Service { status_code: 401, ref description } if description == "Access was denied."),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn http_failure_status_is_service_error_without_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Locations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = GeocodeClient::with_base_url("SECRET-KEY-123", 30, &server.uri())
        .expect("client construction should not fail");
    let err = client.locate_postal_code("78701").await.unwrap_err();

    assert!(
        matches!(err, GeocodeError::Service { status_code: 500, .. }),
        "unexpected error: {err:?}"
    );
    assert!(
        !err.to_string().contains("SECRET-KEY-123"),
        "api key leaked: {err}"
    );
}

#[tokio::test]
async fn unreachable_service_error_omits_key() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeocodeClient::with_base_url("SECRET-KEY-123", 5, &format!("http://{addr}"))
        .expect("client construction should not fail");
    let err = client.locate_postal_code("78701").await.unwrap_err();

    assert!(matches!(err, GeocodeError::Http(_)), "unexpected error: {err:?}");
    assert!(
        !err.to_string().contains("SECRET-KEY-123"),
        "api key leaked: {err}"
    );
    assert!(
        !format!("{err:?}").contains("SECRET-KEY-123"),
        "api key leaked: {err:?}"
    );
}
