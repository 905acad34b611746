//! Budget filter over a page of directory candidates.

use std::sync::Arc;

use rust_decimal::Decimal;
use welp_core::{FilteredResult, RestaurantCandidate};

/// Number of candidates examined per search; the directory's single-page size.
pub const PAGE_LIMIT: usize = 20;

/// The ordered restaurants accepted for one search.
///
/// Immutable and cheap to clone; a new search replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet(Arc<[FilteredResult]>);

impl ResultSet {
    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FilteredResult> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilteredResult> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FilteredResult] {
        &self.0
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<FilteredResult>> for ResultSet {
    fn from(results: Vec<FilteredResult>) -> Self {
        Self(Arc::from(results))
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a FilteredResult;
    type IntoIter = std::slice::Iter<'a, FilteredResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keeps the candidates whose cost for one person fits the budget.
///
/// Only the first [`PAGE_LIMIT`] candidates are examined. Cost for one is
/// half of `average_cost_for_two`; a cost of zero means the directory has no
/// price and the candidate is dropped. Candidates missing a name, address,
/// coordinate or cost are dropped too. Order is preserved.
#[must_use]
pub fn filter_candidates(candidates: &[RestaurantCandidate], budget_per_person: Decimal) -> ResultSet {
    if candidates.len() > PAGE_LIMIT {
        tracing::debug!(
            received = candidates.len(),
            limit = PAGE_LIMIT,
            "truncating directory page"
        );
    }

    candidates
        .iter()
        .take(PAGE_LIMIT)
        .filter_map(|candidate| accept(candidate, budget_per_person))
        .collect::<Vec<_>>()
        .into()
}

fn accept(candidate: &RestaurantCandidate, budget_per_person: Decimal) -> Option<FilteredResult> {
    let (Some(name), Some(address), Some(coordinate), Some(cost_for_two)) = (
        candidate.name.as_ref(),
        candidate.address.as_ref(),
        candidate.coordinate,
        candidate.average_cost_for_two,
    ) else {
        tracing::debug!(name = ?candidate.name, "dropping incomplete candidate");
        return None;
    };

    let cost_for_one = cost_for_two / Decimal::TWO;
    if cost_for_one.is_zero() || cost_for_one > budget_per_person {
        return None;
    }

    Some(FilteredResult {
        name: name.clone(),
        address: address.clone(),
        coordinate,
        average_cost_for_two: cost_for_two,
        rating: candidate.rating.clone(),
    })
}
