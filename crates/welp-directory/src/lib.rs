//! Client for the place directory: city lookup and restaurant search.

pub mod client;
pub mod error;
pub mod normalize;
pub mod retry;
pub mod types;

pub use client::{DirectoryClient, PAGE_SIZE};
pub use error::DirectoryError;
pub use normalize::normalize_restaurant;
pub use retry::RetryPolicy;
pub use types::CityId;
