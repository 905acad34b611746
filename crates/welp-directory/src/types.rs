//! Place directory response types.
//!
//! These model the JSON the directory actually returns. Numeric fields that
//! the provider sometimes sends as strings (`"40.7128"`, `"25"`) are kept as
//! raw [`serde_json::Value`] here and interpreted in [`crate::normalize`].

use serde::Deserialize;

/// Directory-assigned identifier for a city, used by `search?entity_type=city`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CityId(pub i64);

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// cities
// ---------------------------------------------------------------------------

/// `cities?q=` response: `{ "location_suggestions": [ { "id": 280, ... } ] }`.
#[derive(Debug, Deserialize)]
pub struct CitiesResponse {
    #[serde(default)]
    pub location_suggestions: Vec<CitySuggestion>,
}

#[derive(Debug, Deserialize)]
pub struct CitySuggestion {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

/// `search` response. Items are kept raw so one malformed restaurant does
/// not discard the whole page.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results_found: Option<i64>,
    #[serde(default)]
    pub restaurants: Vec<serde_json::Value>,
}

/// Each entry of `restaurants` wraps the record: `{ "restaurant": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct RestaurantItem {
    pub restaurant: RawRestaurant,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRestaurant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub average_cost_for_two: Option<serde_json::Value>,
    #[serde(default)]
    pub user_rating: Option<RawUserRating>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<serde_json::Value>,
    #[serde(default)]
    pub longitude: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawUserRating {
    #[serde(default)]
    pub aggregate_rating: Option<serde_json::Value>,
}
