//! Restaurant records as they flow from the place directory into a result set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A restaurant record exactly as far as the directory could describe it.
///
/// Any field may be missing; the result filter decides what to do about it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantCandidate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub average_cost_for_two: Option<Decimal>,
    /// Aggregate rating as displayed by the provider (e.g. `"4.3"`).
    pub rating: Option<String>,
}

/// A candidate accepted into the active result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredResult {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub average_cost_for_two: Decimal,
    pub rating: Option<String>,
}

impl FilteredResult {
    /// Half of the provider's cost-for-two figure.
    #[must_use]
    pub fn cost_for_one(&self) -> Decimal {
        self.average_cost_for_two / Decimal::TWO
    }
}
