//! Per-user search state: generation counter, identity, current results and
//! the view that shows them.

use welp_core::Coordinate;

use crate::error::ViewError;
use crate::filter::ResultSet;
use crate::identity::Identity;
use crate::view::{ViewEvent, ViewSurface, ViewSynchronizer};

/// Proof that a search was started, carrying its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

impl SearchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct SearchSession<V> {
    generation: u64,
    in_flight: Option<u64>,
    identity: Option<Identity>,
    results: ResultSet,
    user_position: Option<Coordinate>,
    view: ViewSynchronizer<V>,
}

impl<V: ViewSurface> SearchSession<V> {
    pub fn new(surface: V) -> Self {
        Self {
            generation: 0,
            in_flight: None,
            identity: None,
            results: ResultSet::empty(),
            user_position: None,
            view: ViewSynchronizer::new(surface),
        }
    }

    /// Starts a new search. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> SearchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        SearchTicket {
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// True between `begin` and the settle of the newest search. Front ends
    /// use this to refuse resubmission.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn sign_in(&mut self, identity: Identity) {
        tracing::info!(email = %identity.email, "signed in");
        self.identity = Some(identity);
    }

    /// Drops the identity and resets the page.
    pub fn sign_out(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!(email = %identity.email, "signed out");
        }
        self.reset();
    }

    /// Clears results and view. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.results = ResultSet::empty();
        self.user_position = None;
        self.view.clear();
    }

    #[must_use]
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    #[must_use]
    pub fn user_position(&self) -> Option<Coordinate> {
        self.user_position
    }

    pub fn view(&self) -> &ViewSynchronizer<V> {
        &self.view
    }

    /// Forwards a map or list interaction. Never triggers a new search.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownIndex`] for an index outside the current
    /// result set.
    pub fn interact(&mut self, event: ViewEvent) -> Result<(), ViewError> {
        self.view.handle(event)
    }

    pub(crate) fn install(
        &mut self,
        ticket: SearchTicket,
        results: ResultSet,
        user_position: Option<Coordinate>,
    ) {
        debug_assert!(self.is_current(ticket));
        self.in_flight = None;
        self.view.render(&results, user_position);
        self.results = results;
        self.user_position = user_position;
    }

    /// Ends a failed search without touching what is on screen.
    pub(crate) fn abandon(&mut self, ticket: SearchTicket) {
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }
    }
}
