//! Seams to the external collaborators the pipeline depends on.
//!
//! The HTTP clients from `welp-directory` and `welp-geocode` implement these
//! traits directly; tests substitute in-process fakes.

use std::future::Future;

use welp_core::{Coordinate, RestaurantCandidate};
use welp_directory::{CityId, DirectoryClient, DirectoryError};
use welp_geocode::{GeocodeClient, GeocodeError};

use crate::error::LocateError;

/// Restaurant listings by coordinate or by city.
pub trait PlaceDirectory {
    /// Resolves a city name to the directory's identifier; `None` if unknown.
    fn find_city(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<CityId>, DirectoryError>> + Send;

    /// One page of restaurants near `at`, cheapest first.
    fn search_near(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<Vec<RestaurantCandidate>, DirectoryError>> + Send;

    /// One page of restaurants in `city`, cheapest first.
    fn search_city(
        &self,
        city: CityId,
    ) -> impl Future<Output = Result<Vec<RestaurantCandidate>, DirectoryError>> + Send;
}

/// Postal code to coordinate lookup.
pub trait Geocoder {
    fn locate_postal_code(
        &self,
        postal_code: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send;
}

/// The device's own idea of where it is.
pub trait DeviceLocator {
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocateError>> + Send;
}

impl PlaceDirectory for DirectoryClient {
    async fn find_city(&self, name: &str) -> Result<Option<CityId>, DirectoryError> {
        DirectoryClient::find_city(self, name).await
    }

    async fn search_near(&self, at: Coordinate) -> Result<Vec<RestaurantCandidate>, DirectoryError> {
        DirectoryClient::search_near(self, at).await
    }

    async fn search_city(&self, city: CityId) -> Result<Vec<RestaurantCandidate>, DirectoryError> {
        DirectoryClient::search_city(self, city).await
    }
}

impl Geocoder for GeocodeClient {
    async fn locate_postal_code(&self, postal_code: &str) -> Result<Option<Coordinate>, GeocodeError> {
        GeocodeClient::locate_postal_code(self, postal_code).await
    }
}

/// A locator that always reports the same answer.
///
/// With no position it behaves like a device whose user declined the
/// location permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    position: Option<Coordinate>,
}

impl FixedLocator {
    #[must_use]
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }

    #[must_use]
    pub fn denied() -> Self {
        Self { position: None }
    }
}

impl DeviceLocator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinate, LocateError> {
        self.position.ok_or(LocateError::PermissionDenied)
    }
}
