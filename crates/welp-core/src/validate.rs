//! Input validation for search submissions and sign-in credentials.
//!
//! Every rule has its own [`ValidationError`] variant; the `Display` text of
//! each variant is the message shown to the user.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Lowest per-person budget accepted when no override is configured.
pub const DEFAULT_MIN_BUDGET: Decimal = Decimal::ONE;

pub const POSTAL_CODE_LEN: usize = 5;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a 5-digit zip code.")]
    InvalidPostalCode,

    #[error("Please enter a city name.")]
    EmptyCity,

    #[error("Please enter a dollar amount.")]
    InvalidBudget,

    #[error("Please enter a budget of at least ${min} per person.")]
    BudgetTooLow { min: Decimal },

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Passwords must be at least 6 characters long.")]
    PasswordTooShort,
}

/// A validated search submission.
///
/// Only obtainable through [`SearchRequest::parse`], so holding one means
/// every input rule has already passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    budget_per_person: Decimal,
    city_name: String,
    postal_code: String,
}

impl SearchRequest {
    /// Validates raw form input.
    ///
    /// Inputs are trimmed first. The budget may carry a leading `$`.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule, checked in the order postal code,
    /// city, budget.
    pub fn parse(
        budget: &str,
        city_name: &str,
        postal_code: &str,
        min_budget: Decimal,
    ) -> Result<Self, ValidationError> {
        let postal_code = postal_code.trim();
        if postal_code.len() != POSTAL_CODE_LEN
            || !postal_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidPostalCode);
        }

        let city_name = city_name.trim();
        if city_name.is_empty() {
            return Err(ValidationError::EmptyCity);
        }

        let budget = budget.trim();
        let budget = budget.strip_prefix('$').unwrap_or(budget);
        let budget_per_person =
            Decimal::from_str(budget).map_err(|_| ValidationError::InvalidBudget)?;
        if budget_per_person < min_budget {
            return Err(ValidationError::BudgetTooLow { min: min_budget });
        }

        Ok(Self {
            budget_per_person,
            city_name: city_name.to_string(),
            postal_code: postal_code.to_string(),
        })
    }

    /// Rebuilds a request from fields that were validated when first stored.
    pub(crate) fn from_validated(
        budget_per_person: Decimal,
        city_name: &str,
        postal_code: &str,
    ) -> Self {
        Self {
            budget_per_person,
            city_name: city_name.to_string(),
            postal_code: postal_code.to_string(),
        }
    }

    #[must_use]
    pub fn budget_per_person(&self) -> Decimal {
        self.budget_per_person
    }

    #[must_use]
    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

/// Checks sign-in credentials before they are sent to the account provider.
///
/// The email check is a shape heuristic, not a deliverability check: one `@`,
/// a non-empty local part, and a domain with an interior dot.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] or
/// [`ValidationError::PasswordTooShort`].
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    let domain_ok = !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    if password.trim().chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
