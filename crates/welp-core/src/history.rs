use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::SearchRequest;

/// One persisted past search, owned by a signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub city_name: String,
    pub postal_code: String,
    pub budget_per_person: Decimal,
    /// Email of the identity that ran the search.
    pub owner: String,
}

impl HistoryEntry {
    #[must_use]
    pub fn record(request: &SearchRequest, owner: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            city_name: request.city_name().to_string(),
            postal_code: request.postal_code().to_string(),
            budget_per_person: request.budget_per_person(),
            owner: owner.to_string(),
        }
    }

    /// The search this entry recorded, ready to run again.
    #[must_use]
    pub fn request(&self) -> SearchRequest {
        SearchRequest::from_validated(self.budget_per_person, &self.city_name, &self.postal_code)
    }

    /// Display text for the recent-searches list, e.g. `"Austin, 78701, $15"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}, {}, ${}",
            self.city_name,
            self.postal_code,
            self.budget_per_person.normalize()
        )
    }
}
