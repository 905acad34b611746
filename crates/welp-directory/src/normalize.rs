//! Conversion of raw directory records into [`RestaurantCandidate`]s.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use welp_core::{Coordinate, RestaurantCandidate};

use crate::types::RawRestaurant;

/// Reads a number that may arrive as a JSON number or a numeric string.
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(s: Option<&String>) -> Option<String> {
    s.map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Converts a raw directory record into a candidate.
///
/// Fields that are missing or unparseable become `None`. A `(0, 0)`
/// coordinate is the provider's placeholder for "unknown" and is dropped.
#[must_use]
pub fn normalize_restaurant(raw: &RawRestaurant) -> RestaurantCandidate {
    let location = raw.location.as_ref();

    let latitude = location
        .and_then(|l| l.latitude.as_ref())
        .and_then(value_as_f64);
    let longitude = location
        .and_then(|l| l.longitude.as_ref())
        .and_then(value_as_f64);
    let coordinate = match (latitude, longitude) {
        (Some(lat), Some(lon)) if lat != 0.0 || lon != 0.0 => Coordinate::checked(lat, lon),
        _ => None,
    };

    RestaurantCandidate {
        name: non_blank(raw.name.as_ref()),
        address: non_blank(location.and_then(|l| l.address.as_ref())),
        coordinate,
        average_cost_for_two: raw
            .average_cost_for_two
            .as_ref()
            .and_then(value_as_decimal)
            .filter(|c| !c.is_sign_negative()),
        rating: raw
            .user_rating
            .as_ref()
            .and_then(|r| r.aggregate_rating.as_ref())
            .and_then(value_as_text),
    }
}
