//! Search resolution and result rendering.
//!
//! Turns a validated [`welp_core::SearchRequest`] into a rendered result set:
//! resolve the user's location (device, then postal code, then city name),
//! query the place directory, keep what fits the budget, and keep the map
//! markers, list rows and the single open popup in step with each other.
//! Signed-in searches are appended to a per-identity history that can be
//! replayed later.

pub mod error;
pub mod filter;
pub mod history;
pub mod identity;
pub mod orchestrator;
pub mod providers;
pub mod resolver;
pub mod session;
pub mod surface;
pub mod view;

pub use error::{AuthError, HistoryError, LocateError, SearchError, ViewError};
pub use filter::{filter_candidates, ResultSet, PAGE_LIMIT};
pub use history::{
    HistoryStore, HistorySubscription, JsonlHistoryStore, MemoryHistoryStore, RecentSearches,
    RECENT_SEARCH_CAP,
};
pub use identity::{sign_in_or_register, AccountProvider, Identity, LocalAccounts};
pub use orchestrator::{CompletedSearch, SearchOrchestrator, SearchOrigin, SearchOutcome};
pub use providers::{DeviceLocator, FixedLocator, Geocoder, PlaceDirectory};
pub use resolver::{LocationResolver, Resolution};
pub use session::{SearchSession, SearchTicket};
pub use surface::MemorySurface;
pub use view::{
    ListRowHandle, ListRowInfo, MarkerHandle, MarkerKind, MarkerInfo, ResultLink, ViewEvent,
    ViewSurface, ViewSynchronizer, INITIAL_ZOOM,
};
