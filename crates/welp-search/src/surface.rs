//! Headless rendering surface.
//!
//! Records what a map and list would show so the CLI can print it and tests
//! can assert on it.

use std::collections::{BTreeMap, BTreeSet};

use welp_core::Coordinate;

use crate::view::{ListRowHandle, ListRowInfo, MarkerHandle, MarkerInfo, ViewSurface};

#[derive(Debug, Default)]
pub struct MemorySurface {
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, MarkerInfo>,
    rows: BTreeMap<ListRowHandle, ListRowInfo>,
    open_popups: BTreeSet<MarkerHandle>,
    center: Option<Coordinate>,
    zoom: Option<f64>,
    no_results: bool,
}

impl MemorySurface {
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerInfo> {
        self.markers.get(&handle)
    }

    /// Markers in placement order.
    pub fn markers(&self) -> impl Iterator<Item = &MarkerInfo> {
        self.markers.values()
    }

    #[must_use]
    pub fn row(&self, handle: ListRowHandle) -> Option<&ListRowInfo> {
        self.rows.get(&handle)
    }

    /// List rows in the order they were appended.
    #[must_use]
    pub fn rows(&self) -> Vec<&ListRowInfo> {
        self.rows.values().collect()
    }

    /// Metadata of every marker whose popup is currently shown.
    #[must_use]
    pub fn open_popups(&self) -> Vec<&MarkerInfo> {
        self.open_popups
            .iter()
            .filter_map(|handle| self.markers.get(handle))
            .collect()
    }

    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> Option<f64> {
        self.zoom
    }

    #[must_use]
    pub fn no_results_shown(&self) -> bool {
        self.no_results
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl ViewSurface for MemorySurface {
    fn place_marker(&mut self, info: MarkerInfo) -> MarkerHandle {
        let handle = MarkerHandle(self.next());
        self.markers.insert(handle, info);
        handle
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.open_popups.remove(&marker);
        self.markers.remove(&marker);
    }

    fn append_row(&mut self, info: ListRowInfo) -> ListRowHandle {
        let handle = ListRowHandle(self.next());
        self.rows.insert(handle, info);
        handle
    }

    fn remove_row(&mut self, row: ListRowHandle) {
        self.rows.remove(&row);
    }

    fn show_popup(&mut self, marker: MarkerHandle) {
        if self.markers.contains_key(&marker) {
            self.open_popups.insert(marker);
        } else {
            tracing::warn!(?marker, "popup requested for unknown marker");
        }
    }

    fn hide_popup(&mut self, marker: MarkerHandle) {
        self.open_popups.remove(&marker);
    }

    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.center = Some(center);
        self.zoom = Some(zoom);
    }

    fn show_no_results(&mut self, visible: bool) {
        self.no_results = visible;
    }
}
