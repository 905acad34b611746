//! End-to-end search: resolve location, query the directory, filter, record
//! history and render.

use chrono::Utc;
use rust_decimal::Decimal;
use welp_core::{HistoryEntry, RestaurantCandidate, SearchRequest, DEFAULT_MIN_BUDGET};

use crate::error::SearchError;
use crate::filter::{filter_candidates, ResultSet};
use crate::history::HistoryStore;
use crate::providers::{DeviceLocator, Geocoder, PlaceDirectory};
use crate::resolver::{LocationResolver, Resolution};
use crate::session::{SearchSession, SearchTicket};
use crate::view::ViewSurface;

/// Whether a search came from the form or from the recent-searches list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrigin {
    Submitted,
    Replay,
}

/// A search that has finished its network work but is not yet on screen.
#[derive(Debug, Clone)]
pub struct CompletedSearch {
    pub ticket: SearchTicket,
    pub request: SearchRequest,
    pub origin: SearchOrigin,
    pub resolution: Resolution,
    pub results: ResultSet,
}

/// Summary of a search that was rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub generation: u64,
    pub resolution: Resolution,
    pub result_count: usize,
    pub history_written: bool,
}

pub struct SearchOrchestrator<L, G, D, H> {
    resolver: LocationResolver<L, G>,
    directory: D,
    history: H,
    min_budget: Decimal,
}

impl<L, G, D, H> SearchOrchestrator<L, G, D, H>
where
    L: DeviceLocator,
    G: Geocoder,
    D: PlaceDirectory,
    H: HistoryStore,
{
    pub fn new(resolver: LocationResolver<L, G>, directory: D, history: H) -> Self {
        Self {
            resolver,
            directory,
            history,
            min_budget: DEFAULT_MIN_BUDGET,
        }
    }

    #[must_use]
    pub fn with_min_budget(mut self, min_budget: Decimal) -> Self {
        self.min_budget = min_budget;
        self
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Validates raw form input and runs it as a submitted search.
    ///
    /// # Errors
    ///
    /// [`SearchError::Invalid`] without touching the network, or any error
    /// from [`Self::run_search`].
    pub async fn submit<V: ViewSurface>(
        &self,
        session: &mut SearchSession<V>,
        budget: &str,
        city_name: &str,
        postal_code: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let request = SearchRequest::parse(budget, city_name, postal_code, self.min_budget)
            .inspect_err(|e| tracing::info!(error = %e, "rejected search input"))?;
        self.run_search(session, &request, SearchOrigin::Submitted)
            .await
    }

    /// Runs a past search again. Replays never write history.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::run_search`].
    pub async fn replay<V: ViewSurface>(
        &self,
        session: &mut SearchSession<V>,
        entry: &HistoryEntry,
    ) -> Result<SearchOutcome, SearchError> {
        tracing::info!(id = %entry.id, label = %entry.label(), "replaying search");
        self.run_search(session, &entry.request(), SearchOrigin::Replay)
            .await
    }

    /// Runs one search to a rendered view or an error.
    ///
    /// On error the previous results stay on screen.
    ///
    /// # Errors
    ///
    /// [`SearchError::CityNotFound`] or [`SearchError::Directory`] when no
    /// listing could be fetched.
    pub async fn run_search<V: ViewSurface>(
        &self,
        session: &mut SearchSession<V>,
        request: &SearchRequest,
        origin: SearchOrigin,
    ) -> Result<SearchOutcome, SearchError> {
        let ticket = session.begin();
        match self.execute(ticket, request, origin).await {
            Ok(completed) => self.settle(session, completed).await,
            Err(e) => {
                tracing::warn!(
                    generation = ticket.generation(),
                    city = request.city_name(),
                    error = %e,
                    "search failed"
                );
                session.abandon(ticket);
                Err(e)
            }
        }
    }

    /// Resolves, queries and filters. Touches no session state.
    ///
    /// # Errors
    ///
    /// [`SearchError::CityNotFound`] or [`SearchError::Directory`].
    pub async fn execute(
        &self,
        ticket: SearchTicket,
        request: &SearchRequest,
        origin: SearchOrigin,
    ) -> Result<CompletedSearch, SearchError> {
        let resolution = self
            .resolver
            .resolve(request.postal_code(), request.city_name())
            .await;

        let candidates = match resolution.coordinate() {
            Some(at) => match self.directory.search_near(at).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::warn!(
                        coordinate = %at,
                        error = %e,
                        "coordinate search failed, searching by city name"
                    );
                    self.search_by_city(request.city_name()).await?
                }
            },
            None => self.search_by_city(request.city_name()).await?,
        };

        let results = filter_candidates(&candidates, request.budget_per_person());
        tracing::info!(
            generation = ticket.generation(),
            source = resolution.source(),
            candidates = candidates.len(),
            accepted = results.len(),
            budget = %request.budget_per_person(),
            "search completed"
        );

        Ok(CompletedSearch {
            ticket,
            request: request.clone(),
            origin,
            resolution,
            results,
        })
    }

    /// Records history and renders, unless a newer search has started.
    ///
    /// # Errors
    ///
    /// [`SearchError::Superseded`] if `completed` is stale; nothing is
    /// written or rendered in that case.
    pub async fn settle<V: ViewSurface>(
        &self,
        session: &mut SearchSession<V>,
        completed: CompletedSearch,
    ) -> Result<SearchOutcome, SearchError> {
        let CompletedSearch {
            ticket,
            request,
            origin,
            resolution,
            results,
        } = completed;

        if !session.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                current = session.current_generation(),
                "discarding stale search"
            );
            return Err(SearchError::Superseded {
                generation: ticket.generation(),
                current: session.current_generation(),
            });
        }

        let mut history_written = false;
        if origin == SearchOrigin::Submitted {
            if let Some(identity) = session.identity().cloned() {
                let entry = HistoryEntry::record(&request, &identity.email, Utc::now());
                match self.history.push(&identity.uid, entry).await {
                    Ok(()) => history_written = true,
                    Err(e) => {
                        tracing::warn!(email = %identity.email, error = %e, "failed to record search history");
                    }
                }
            }
        }

        let result_count = results.len();
        session.install(ticket, results, resolution.coordinate());

        Ok(SearchOutcome {
            generation: ticket.generation(),
            resolution,
            result_count,
            history_written,
        })
    }

    async fn search_by_city(&self, city_name: &str) -> Result<Vec<RestaurantCandidate>, SearchError> {
        let Some(city) = self.directory.find_city(city_name).await? else {
            return Err(SearchError::CityNotFound(city_name.to_string()));
        };
        tracing::debug!(city = city_name, %city, "resolved city identifier");
        Ok(self.directory.search_city(city).await?)
    }
}
