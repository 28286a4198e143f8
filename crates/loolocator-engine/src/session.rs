//! One user session: location, filters, results, and the optional map.

use std::num::NonZeroU32;

use loolocator_client::MapUnavailable;
use loolocator_core::{Coordinate, InvalidParameter, SearchParameters, WashroomId};
use tokio::sync::watch;

use crate::directory::WashroomDirectory;
use crate::filters::SearchParameterStore;
use crate::location::{GeoLocationProvider, LocationError, PositionSource};
use crate::map::{MapMarkerReconciler, MapSurface, MarkerHandle};
use crate::results::ResultSetController;

/// Wires the location provider, filter store, result controller, and map
/// reconciler together.
///
/// Filter changes are picked up by [`pump`](Self::pump). Several changes
/// made between two pumps produce a single refresh.
pub struct Session<D, P, S> {
    location: GeoLocationProvider<P>,
    filters: SearchParameterStore,
    filter_rx: watch::Receiver<SearchParameters>,
    results: ResultSetController<D>,
    map: Option<MapMarkerReconciler<S>>,
    map_error: Option<MapUnavailable>,
    notice: Option<String>,
}

impl<D, P, S> Session<D, P, S>
where
    D: WashroomDirectory,
    P: PositionSource,
    S: MapSurface,
{
    #[must_use]
    pub fn new(directory: D, location: GeoLocationProvider<P>, limit: NonZeroU32) -> Self {
        let filters = SearchParameterStore::default();
        let filter_rx = filters.subscribe();
        Self {
            location,
            filters,
            filter_rx,
            results: ResultSetController::new(directory, limit),
            map: None,
            map_error: None,
            notice: None,
        }
    }

    /// Attaches a map surface and draws the current state onto it.
    pub fn attach_map(&mut self, surface: S) {
        let mut reconciler = MapMarkerReconciler::new(
            surface,
            self.results.subscribe(),
            self.results.subscribe_origin(),
        );
        reconciler.sync();
        self.map = Some(reconciler);
        self.map_error = None;
    }

    /// Records that the map could not be initialised. Results keep working
    /// without it.
    pub fn map_unavailable(&mut self, err: MapUnavailable) {
        tracing::warn!(reason = %err.reason, "map disabled for this session");
        self.map = None;
        self.notice = Some(err.to_string());
        self.map_error = Some(err);
    }

    /// Acquires the device position and searches around it.
    ///
    /// On failure the message is kept as the session notice and no query is
    /// issued.
    ///
    /// # Errors
    ///
    /// Returns the [`LocationError`] reported by the provider.
    pub async fn locate(&mut self) -> Result<Coordinate, LocationError> {
        self.notice = None;
        match self.location.acquire().await {
            Ok(origin) => {
                self.start_at(origin).await;
                Ok(origin)
            }
            Err(e) => {
                tracing::warn!(error = %e, "location unavailable");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Searches around `origin` with the current filters.
    pub async fn start_at(&mut self, origin: Coordinate) -> bool {
        self.results.set_origin(origin);
        let params = *self.filter_rx.borrow_and_update();
        self.run_refresh(origin, params).await
    }

    /// Validates and stores new filters without querying.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`] for a radius outside the offered set; the
    /// message is also kept as the session notice.
    pub fn set_filters(
        &mut self,
        radius_meters: u32,
        accessibility_only: bool,
    ) -> Result<SearchParameters, InvalidParameter> {
        self.filters
            .update(radius_meters, accessibility_only)
            .inspect_err(|e| self.notice = Some(e.to_string()))
    }

    /// Issues one refresh if filters changed since the last search.
    ///
    /// Nothing is issued until an origin is known. Returns whether a
    /// refresh ran.
    pub async fn pump(&mut self) -> bool {
        if !self.filter_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let Some(origin) = self.results.origin() else {
            tracing::debug!("filters changed before an origin is known");
            return false;
        };
        let params = *self.filter_rx.borrow_and_update();
        self.run_refresh(origin, params).await;
        true
    }

    /// [`set_filters`](Self::set_filters) followed by [`pump`](Self::pump).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter`] for an unsupported radius; no query runs.
    pub async fn change_filters(
        &mut self,
        radius_meters: u32,
        accessibility_only: bool,
    ) -> Result<bool, InvalidParameter> {
        self.set_filters(radius_meters, accessibility_only)?;
        Ok(self.pump().await)
    }

    /// Re-runs the last search, e.g. after a failure.
    ///
    /// Pending filter changes are folded into this search, so a later
    /// [`pump`](Self::pump) does not repeat it.
    pub async fn retry(&mut self) -> bool {
        let Some(origin) = self.results.origin() else {
            return false;
        };
        let params = *self.filter_rx.borrow_and_update();
        self.run_refresh(origin, params).await
    }

    async fn run_refresh(&mut self, origin: Coordinate, params: SearchParameters) -> bool {
        self.notice = None;
        self.sync_map();
        let applied = self.results.refresh(origin, params).await;
        self.sync_map();
        if applied {
            self.notice = self
                .results
                .snapshot()
                .error()
                .map(|failure| failure.message.clone());
        }
        applied
    }

    /// Selects a washroom from either the list or a marker. Both paths land
    /// here so list and map always agree.
    pub fn select(&mut self, id: Option<&WashroomId>) -> bool {
        let accepted = self.results.select(id);
        self.sync_map();
        accepted
    }

    /// Selects the washroom behind a clicked map marker.
    ///
    /// Returns `false` when no map is attached or the handle is not a
    /// washroom marker, e.g. the user-location marker.
    pub fn select_marker(&mut self, handle: MarkerHandle) -> bool {
        let Some(id) = self
            .map
            .as_ref()
            .and_then(|map| map.washroom_for(handle))
            .cloned()
        else {
            tracing::debug!(handle = handle.raw(), "marker click on unknown handle");
            return false;
        };
        self.select(Some(&id))
    }

    fn sync_map(&mut self) {
        if let Some(map) = self.map.as_mut() {
            map.sync();
        }
    }

    /// The single user-facing message: a location failure, a rejected
    /// filter, a failed search, or a disabled map. Cleared when a new
    /// location request or search starts.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn results(&self) -> &ResultSetController<D> {
        &self.results
    }

    #[must_use]
    pub fn filters(&self) -> &SearchParameterStore {
        &self.filters
    }

    #[must_use]
    pub fn map(&self) -> Option<&MapMarkerReconciler<S>> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut MapMarkerReconciler<S>> {
        self.map.as_mut()
    }

    #[must_use]
    pub fn map_error(&self) -> Option<&MapUnavailable> {
        self.map_error.as_ref()
    }
}
