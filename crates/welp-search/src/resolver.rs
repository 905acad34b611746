//! Location resolution with an ordered fallback chain.
//!
//! 1. Ask the device for its position.
//! 2. Geocode the postal code the user typed.
//! 3. Give up on coordinates and let the directory search by city name.
//!
//! A failing or slow stage is never fatal; it hands over to the next one.

use std::time::Duration;

use welp_core::Coordinate;

use crate::providers::{DeviceLocator, Geocoder};

const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the search should be anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The device reported its position.
    Device(Coordinate),
    /// The postal code was geocoded.
    PostalCode(Coordinate),
    /// No coordinate; the directory must be queried by city name.
    CityOnly,
}

impl Resolution {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Resolution::Device(c) | Resolution::PostalCode(c) => Some(*c),
            Resolution::CityOnly => None,
        }
    }

    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Resolution::Device(_) => "device",
            Resolution::PostalCode(_) => "postal_code",
            Resolution::CityOnly => "city_name",
        }
    }
}

/// Result of one stage of the chain.
#[derive(Debug)]
enum StageOutcome {
    Resolved(Coordinate),
    FallThrough(String),
}

pub struct LocationResolver<L, G> {
    locator: L,
    geocoder: G,
    geolocation_timeout: Duration,
    geocode_timeout: Duration,
}

impl<L, G> LocationResolver<L, G>
where
    L: DeviceLocator,
    G: Geocoder,
{
    pub fn new(locator: L, geocoder: G) -> Self {
        Self {
            locator,
            geocoder,
            geolocation_timeout: DEFAULT_STAGE_TIMEOUT,
            geocode_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Bounds how long each stage may take before it falls through.
    #[must_use]
    pub fn with_timeouts(mut self, geolocation: Duration, geocode: Duration) -> Self {
        self.geolocation_timeout = geolocation;
        self.geocode_timeout = geocode;
        self
    }

    /// Runs the chain to completion. Never fails: exhausting both coordinate
    /// stages yields [`Resolution::CityOnly`].
    pub async fn resolve(&self, postal_code: &str, city_name: &str) -> Resolution {
        match self.device_stage().await {
            StageOutcome::Resolved(c) => {
                tracing::debug!(coordinate = %c, "resolved location from device");
                return Resolution::Device(c);
            }
            StageOutcome::FallThrough(reason) => {
                tracing::info!(%reason, "device location unavailable, trying postal code");
            }
        }

        match self.postal_code_stage(postal_code).await {
            StageOutcome::Resolved(c) => {
                tracing::debug!(postal_code, coordinate = %c, "resolved location from postal code");
                return Resolution::PostalCode(c);
            }
            StageOutcome::FallThrough(reason) => {
                tracing::warn!(postal_code, %reason, "postal code lookup failed");
            }
        }

        tracing::info!(city = city_name, "falling back to city-name search");
        Resolution::CityOnly
    }

    async fn device_stage(&self) -> StageOutcome {
        match tokio::time::timeout(self.geolocation_timeout, self.locator.current_position()).await
        {
            Ok(Ok(c)) => StageOutcome::Resolved(c),
            Ok(Err(e)) => StageOutcome::FallThrough(e.to_string()),
            Err(_) => StageOutcome::FallThrough(format!(
                "no position within {} ms",
                self.geolocation_timeout.as_millis()
            )),
        }
    }

    async fn postal_code_stage(&self, postal_code: &str) -> StageOutcome {
        let lookup = self.geocoder.locate_postal_code(postal_code);
        match tokio::time::timeout(self.geocode_timeout, lookup).await {
            Ok(Ok(Some(c))) => StageOutcome::Resolved(Coordinate::new(c.latitude(), c.longitude())),
            Ok(Ok(None)) => StageOutcome::FallThrough("no location for postal code".to_string()),
            Ok(Err(e)) => StageOutcome::FallThrough(e.to_string()),
            Err(_) => StageOutcome::FallThrough(format!(
                "no geocode within {} ms",
                self.geocode_timeout.as_millis()
            )),
        }
    }
}
