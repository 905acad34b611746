//! HTTP client for the Locations geocoding API.

use std::time::Duration;

use reqwest::{Client, Url};
use welp_core::Coordinate;

use crate::error::GeocodeError;
use crate::types::LocationsResponse;

const DEFAULT_BASE_URL: &str = "https://dev.virtualearth.net/REST/v1/";

/// Country every postal code is resolved in.
const COUNTRY_REGION: &str = "US";

const MAX_RESULTS: &str = "5";

pub struct GeocodeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a new client pointed at the production geocoding service.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the client cannot be constructed or
    /// [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("welp/0.1 (restaurant-search)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves a postal code to the first coordinate pair the service returns.
    ///
    /// Returns `None` when the service knows no location for the code.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::Service`] on a non-2xx HTTP status or when the body
    ///   reports a non-200 `statusCode`.
    /// - [`GeocodeError::Deserialize`] if the response shape is unexpected.
    pub async fn locate_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<Coordinate>, GeocodeError> {
        let url = self.build_url(postal_code)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let description = serde_json::from_str::<LocationsResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error_details.into_iter().next())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(GeocodeError::Service {
                status_code: status.as_u16(),
                description,
            });
        }

        let parsed: LocationsResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("Locations(postalCode={postal_code})"),
                source: e,
            })?;

        if let Some(status_code) = parsed.status_code.filter(|c| *c != 200) {
            return Err(GeocodeError::Service {
                status_code,
                description: parsed
                    .error_details
                    .first()
                    .cloned()
                    .or(parsed.status_description)
                    .unwrap_or_default(),
            });
        }

        let coordinate = parsed
            .resource_sets
            .iter()
            .flat_map(|set| set.resources.iter())
            .filter_map(|resource| resource.point.as_ref())
            .find_map(|point| match point.coordinates.as_slice() {
                [lat, lon, ..] => Coordinate::checked(*lat, *lon),
                _ => None,
            });

        tracing::debug!(postal_code, coordinate = ?coordinate, "postal code geocoded");
        Ok(coordinate)
    }

    fn build_url(&self, postal_code: &str) -> Result<Url, GeocodeError> {
        let mut url =
            self.base_url
                .join("Locations")
                .map_err(|e| GeocodeError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("postalCode", postal_code)
            .append_pair("countryRegion", COUNTRY_REGION)
            .append_pair("maxResults", MAX_RESULTS)
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}
