use super::*;

fn test_client(base_url: &str) -> DirectoryClient {
    DirectoryClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_endpoint_and_key() {
    let client = test_client("https://developers.zomato.com/api/v2.1");
    let url = client.build_url("cities", &[("q", "Austin")]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://developers.zomato.com/api/v2.1/cities?apikey=test-key&q=Austin"
    );
}

#[test]
fn build_url_tolerates_trailing_slash() {
    let client = test_client("https://developers.zomato.com/api/v2.1/");
    let url = client
        .build_url("search", &[("entity_type", "city"), ("entity_id", "280")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://developers.zomato.com/api/v2.1/search?apikey=test-key&entity_type=city&entity_id=280"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://developers.zomato.com/api/v2.1");
    let url = client.build_url("cities", &[("q", "Winston-Salem & Co")]).unwrap();
    assert!(
        url.as_str().contains("Winston-Salem+%26+Co"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = DirectoryClient::with_base_url("k", 30, "not a url");
    assert!(matches!(result, Err(DirectoryError::InvalidBaseUrl { .. })));
}

#[test]
fn redact_key_hides_api_key() {
    let client = test_client("https://developers.zomato.com/api/v2.1");
    let url = client.build_url("cities", &[("q", "Austin")]).unwrap();
    let redacted = redact_key(&url);
    assert!(!redacted.contains("test-key"), "{redacted}");
    assert!(redacted.contains("q=Austin"));
}

#[test]
fn check_api_error_detects_envelope() {
    let body = serde_json::json!({"code": 403, "status": "Forbidden", "message": "Invalid API Key"});
    let err = DirectoryClient::check_api_error(&body).unwrap_err();
    assert!(matches!(err, DirectoryError::ApiError { code: 403, ref message } if message == "Invalid API Key"));
}

#[test]
fn check_api_error_ignores_normal_body() {
    let body = serde_json::json!({"location_suggestions": [], "status": "success"});
    assert!(DirectoryClient::check_api_error(&body).is_ok());
}

#[test]
fn envelope_codes_decide_transience() {
    let envelope = |code| DirectoryError::ApiError {
        code,
        message: "x".to_owned(),
    };
    assert!(!envelope(403).is_transient());
    assert!(!envelope(404).is_transient());
    assert!(envelope(429).is_transient());
    assert!(envelope(503).is_transient());
}

#[test]
fn malformed_body_is_not_transient() {
    let source = serde_json::from_str::<()>("invalid").unwrap_err();
    let err = DirectoryError::Deserialize {
        context: "search".to_owned(),
        source,
    };
    assert!(!err.is_transient());
}
