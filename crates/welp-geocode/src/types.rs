//! Locations API response types.
//!
//! ```json
//! { "statusCode": 200,
//!   "resourceSets": [ { "estimatedTotal": 1,
//!     "resources": [ { "point": { "type": "Point", "coordinates": [47.64, -122.13] } } ] } ] }
//! ```

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub status_description: Option<String>,
    #[serde(default)]
    pub error_details: Vec<String>,
    #[serde(default)]
    pub resource_sets: Vec<ResourceSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSet {
    #[serde(default)]
    pub estimated_total: Option<u32>,
    #[serde(default)]
    pub resources: Vec<LocationResource>,
}

#[derive(Debug, Deserialize)]
pub struct LocationResource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub point: Option<Point>,
}

/// GeoJSON-style point; `coordinates` is `[latitude, longitude]`.
#[derive(Debug, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}
