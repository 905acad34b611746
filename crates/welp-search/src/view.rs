//! Map and list rendering, kept in step by result index.
//!
//! Every result at index `i` gets exactly one map marker and one list row.
//! At most one info popup is open at a time; opening another closes it.

use welp_core::Coordinate;

use crate::error::ViewError;
use crate::filter::ResultSet;

/// Zoom level used for every render and recenter.
pub const INITIAL_ZOOM: f64 = 11.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListRowHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Result { index: usize },
    UserPosition,
}

/// Marker placement plus the metadata its popup shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInfo {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub title: String,
    pub description: String,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRowInfo {
    pub index: usize,
    pub name: String,
    pub address: String,
}

/// Rendering primitives the synchronizer drives.
pub trait ViewSurface {
    fn place_marker(&mut self, info: MarkerInfo) -> MarkerHandle;
    fn remove_marker(&mut self, marker: MarkerHandle);
    fn append_row(&mut self, info: ListRowInfo) -> ListRowHandle;
    fn remove_row(&mut self, row: ListRowHandle);
    /// Shows the popup bound to `marker`, populated from its metadata.
    fn show_popup(&mut self, marker: MarkerHandle);
    fn hide_popup(&mut self, marker: MarkerHandle);
    fn set_view(&mut self, center: Coordinate, zoom: f64);
    fn show_no_results(&mut self, visible: bool);
}

/// User interactions with the rendered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    MarkerClick(usize),
    MarkerHover(usize),
    MarkerLeave(usize),
    RowClick(usize),
}

/// Marker and row rendered for one result index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLink {
    pub marker: MarkerHandle,
    pub row: ListRowHandle,
}

pub struct ViewSynchronizer<V> {
    surface: V,
    results: ResultSet,
    links: Vec<ResultLink>,
    user_marker: Option<MarkerHandle>,
    active_popup: Option<usize>,
}

impl<V: ViewSurface> ViewSynchronizer<V> {
    pub fn new(surface: V) -> Self {
        Self {
            surface,
            results: ResultSet::empty(),
            links: Vec::new(),
            user_marker: None,
            active_popup: None,
        }
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    #[must_use]
    pub fn active_popup(&self) -> Option<usize> {
        self.active_popup
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn link(&self, index: usize) -> Option<ResultLink> {
        self.links.get(index).copied()
    }

    #[must_use]
    pub fn user_marker(&self) -> Option<MarkerHandle> {
        self.user_marker
    }

    /// Replaces whatever is on screen with `results`.
    ///
    /// Old markers and rows are always removed first, so rendering the same
    /// set twice leaves the same number of handles. An empty set shows the
    /// no-results indication and leaves the map center and zoom alone.
    pub fn render(&mut self, results: &ResultSet, user_position: Option<Coordinate>) {
        self.clear();

        if results.is_empty() {
            self.surface.show_no_results(true);
            return;
        }

        self.results = results.clone();
        for (index, result) in results.iter().enumerate() {
            let marker = self.surface.place_marker(MarkerInfo {
                kind: MarkerKind::Result { index },
                position: result.coordinate,
                title: result.name.clone(),
                description: result.address.clone(),
                rating: result.rating.clone(),
            });
            let row = self.surface.append_row(ListRowInfo {
                index,
                name: result.name.clone(),
                address: result.address.clone(),
            });
            self.links.push(ResultLink { marker, row });
        }

        let center = match user_position {
            Some(position) => {
                self.user_marker = Some(self.surface.place_marker(MarkerInfo {
                    kind: MarkerKind::UserPosition,
                    position,
                    title: "You are here".to_string(),
                    description: String::new(),
                    rating: None,
                }));
                position
            }
            None => results.as_slice()[0].coordinate,
        };
        self.surface.set_view(center, INITIAL_ZOOM);

        tracing::debug!(
            markers = self.links.len(),
            user_marker = self.user_marker.is_some(),
            "rendered result set"
        );
    }

    /// Removes every marker and row and closes the popup.
    pub fn clear(&mut self) {
        self.close_active();
        for link in self.links.drain(..) {
            self.surface.remove_marker(link.marker);
            self.surface.remove_row(link.row);
        }
        if let Some(marker) = self.user_marker.take() {
            self.surface.remove_marker(marker);
        }
        self.results = ResultSet::empty();
        self.surface.show_no_results(false);
    }

    /// Applies one interaction.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownIndex`] if `event` names an index that is
    /// not rendered. The view is left unchanged in that case.
    pub fn handle(&mut self, event: ViewEvent) -> Result<(), ViewError> {
        match event {
            ViewEvent::MarkerClick(index) | ViewEvent::RowClick(index) => self.open(index, true),
            ViewEvent::MarkerHover(index) => self.open(index, false),
            ViewEvent::MarkerLeave(index) => {
                self.check_index(index)?;
                if self.active_popup == Some(index) {
                    self.close_active();
                }
                Ok(())
            }
        }
    }

    fn open(&mut self, index: usize, recenter: bool) -> Result<(), ViewError> {
        self.check_index(index)?;
        if self.active_popup != Some(index) {
            self.close_active();
            self.surface.show_popup(self.links[index].marker);
            self.active_popup = Some(index);
        }
        if recenter {
            if let Some(result) = self.results.get(index) {
                self.surface.set_view(result.coordinate, INITIAL_ZOOM);
            }
        }
        Ok(())
    }

    fn close_active(&mut self) {
        if let Some(index) = self.active_popup.take() {
            if let Some(link) = self.links.get(index) {
                self.surface.hide_popup(link.marker);
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ViewError> {
        if index < self.links.len() {
            Ok(())
        } else {
            Err(ViewError::UnknownIndex {
                index,
                len: self.links.len(),
            })
        }
    }
}
