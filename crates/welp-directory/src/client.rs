//! HTTP client for the place directory REST API.
//!
//! Wraps `reqwest` with API key management, transient-error retry, and typed
//! response deserialization. Every endpoint checks for the directory's
//! `{"code": .., "message": ..}` error envelope and surfaces it as
//! [`DirectoryError::ApiError`].

use std::time::Duration;

use reqwest::{Client, Url};
use welp_core::{Coordinate, RestaurantCandidate};

use crate::error::DirectoryError;
use crate::normalize::normalize_restaurant;
use crate::retry::RetryPolicy;
use crate::types::{CitiesResponse, CityId, RestaurantItem, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://developers.zomato.com/api/v2.1/";

/// Largest page the directory returns for one search call.
pub const PAGE_SIZE: usize = 20;

/// Client for the place directory.
///
/// Use [`DirectoryClient::new`] for production or
/// [`DirectoryClient::with_base_url`] to point at a mock server in tests.
pub struct DirectoryClient {
    client: Client,
    api_key: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl DirectoryClient {
    /// Creates a new client pointed at the production directory.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, DirectoryError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectoryError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("welp/0.1 (restaurant-search)")
            .build()?;

        // A trailing slash keeps `Url::join` appending endpoint names instead
        // of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DirectoryError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            retry: RetryPolicy::NONE,
        })
    }

    /// Retries transient failures according to `policy`.
    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Looks up the directory's identifier for a city name.
    ///
    /// Returns `None` when the directory has no suggestion for the name.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::ApiError`] on a non-2xx status or the error envelope.
    /// - [`DirectoryError::Http`] on network failure.
    /// - [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn find_city(&self, name: &str) -> Result<Option<CityId>, DirectoryError> {
        let url = self.build_url("cities", &[("q", name)])?;
        let body = self.request_json(&url).await?;
        Self::check_api_error(&body)?;

        let response: CitiesResponse =
            serde_json::from_value(body).map_err(|e| DirectoryError::Deserialize {
                context: format!("cities(q={name})"),
                source: e,
            })?;

        let id = response
            .location_suggestions
            .first()
            .and_then(|s| s.id)
            .map(CityId);
        tracing::debug!(city = name, id = ?id, "directory city lookup");
        Ok(id)
    }

    /// Searches for restaurants around a coordinate, cheapest first.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::ApiError`] on a non-2xx status or the error envelope.
    /// - [`DirectoryError::Http`] on network failure.
    /// - [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn search_near(
        &self,
        at: Coordinate,
    ) -> Result<Vec<RestaurantCandidate>, DirectoryError> {
        let lat = at.latitude().to_string();
        let lon = at.longitude().to_string();
        let count = PAGE_SIZE.to_string();
        let url = self.build_url(
            "search",
            &[
                ("lat", &lat),
                ("lon", &lon),
                ("sort", "cost"),
                ("order", "asc"),
                ("count", &count),
            ],
        )?;
        self.search(&url, &format!("search(lat={lat}, lon={lon})"))
            .await
    }

    /// Searches a whole city by its directory identifier, cheapest first.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::ApiError`] on a non-2xx status or the error envelope.
    /// - [`DirectoryError::Http`] on network failure.
    /// - [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn search_city(
        &self,
        city: CityId,
    ) -> Result<Vec<RestaurantCandidate>, DirectoryError> {
        let id = city.to_string();
        let count = PAGE_SIZE.to_string();
        let url = self.build_url(
            "search",
            &[
                ("entity_type", "city"),
                ("entity_id", &id),
                ("sort", "cost"),
                ("order", "asc"),
                ("count", &count),
            ],
        )?;
        self.search(&url, &format!("search(entity_id={id})")).await
    }

    async fn search(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<Vec<RestaurantCandidate>, DirectoryError> {
        let body = self.request_json(url).await?;
        Self::check_api_error(&body)?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| DirectoryError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;

        let candidates: Vec<RestaurantCandidate> = response
            .restaurants
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                serde_json::from_value::<RestaurantItem>(item)
                    .map_err(|e| {
                        tracing::warn!(index, error = %e, "{context}: skipping malformed restaurant");
                    })
                    .ok()
            })
            .map(|item| normalize_restaurant(&item.restaurant))
            .collect();

        tracing::debug!(
            results_found = ?response.results_found,
            returned = candidates.len(),
            "{context}: directory search complete"
        );
        Ok(candidates)
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, DirectoryError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| DirectoryError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apikey", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, retrying failures that
    /// [`DirectoryError::is_transient`] accepts.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, DirectoryError> {
        let mut retry = 0;
        loop {
            match self.fetch_once(url).await {
                Err(err) if err.is_transient() && retry < self.retry.max_retries() => {
                    retry += 1;
                    let delay = self.retry.delay(retry);
                    tracing::warn!(
                        retry,
                        max_retries = self.retry.max_retries(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "directory request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }

    /// Sends one GET request and parses the body as JSON.
    ///
    /// Non-2xx responses become [`DirectoryError::ApiError`] carrying the
    /// status code and, when the body is the directory's error envelope, its
    /// message.
    async fn fetch_once(&self, url: &Url) -> Result<serde_json::Value, DirectoryError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|json| {
                    json.get("message")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(DirectoryError::ApiError {
                code: i64::from(status.as_u16()),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| DirectoryError::Deserialize {
            context: redact_key(url),
            source: e,
        })
    }

    /// Checks for the `{"code": n, "status": .., "message": ..}` error envelope.
    fn check_api_error(body: &serde_json::Value) -> Result<(), DirectoryError> {
        let code = body.get("code").and_then(serde_json::Value::as_i64);
        let message = body.get("message").and_then(serde_json::Value::as_str);
        if let (Some(code), Some(message)) = (code, message) {
            if code >= 400 {
                return Err(DirectoryError::ApiError {
                    code,
                    message: message.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Strips the API key from a URL before it lands in an error message or log.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "[redacted]".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
