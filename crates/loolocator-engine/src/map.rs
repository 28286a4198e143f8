//! Map surface abstraction and marker reconciliation.
//!
//! The reconciler owns the mapping from washroom id to marker handle and
//! issues the smallest set of surface operations that makes the map match
//! the current result set. Markers for ids present before and after a
//! refresh keep their handle.

use std::collections::{HashMap, HashSet};

use loolocator_core::{Coordinate, WashroomId, WashroomRecord};
use tokio::sync::watch;

use crate::results::{ResultStatus, SearchState};

/// Title of the marker placed at the search origin.
pub const USER_LOCATION_TITLE: &str = "Your Location";

/// Opaque handle for a marker created on a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    UserLocation,
    Washroom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpec<'a> {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub title: &'a str,
}

/// Rendering backend for markers, viewport, and the detail popup.
///
/// At most one detail popup is open at a time; opening another replaces it.
pub trait MapSurface {
    fn create_marker(&mut self, spec: MarkerSpec<'_>) -> MarkerHandle;
    fn destroy_marker(&mut self, handle: MarkerHandle);
    fn center_on(&mut self, position: Coordinate);
    fn open_detail(&mut self, handle: MarkerHandle, record: &WashroomRecord);
    fn close_detail(&mut self);
}

/// Operation log entry produced by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Create {
        handle: MarkerHandle,
        kind: MarkerKind,
        title: String,
        position: Coordinate,
    },
    Destroy(MarkerHandle),
    Center(Coordinate),
    OpenDetail {
        handle: MarkerHandle,
        id: WashroomId,
    },
    CloseDetail,
}

/// Headless surface that logs every operation through `tracing` and keeps
/// them for inspection.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_handle: u64,
    ops: Vec<SurfaceOp>,
    live: HashSet<MarkerHandle>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drains the operation log.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of markers created and not yet destroyed.
    #[must_use]
    pub fn live_markers(&self) -> usize {
        self.live.len()
    }
}

impl MapSurface for RecordingSurface {
    fn create_marker(&mut self, spec: MarkerSpec<'_>) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        tracing::debug!(
            handle = handle.raw(),
            kind = ?spec.kind,
            title = spec.title,
            position = %spec.position,
            "map: create marker"
        );
        self.live.insert(handle);
        self.ops.push(SurfaceOp::Create {
            handle,
            kind: spec.kind,
            title: spec.title.to_string(),
            position: spec.position,
        });
        handle
    }

    fn destroy_marker(&mut self, handle: MarkerHandle) {
        tracing::debug!(handle = handle.raw(), "map: destroy marker");
        self.live.remove(&handle);
        self.ops.push(SurfaceOp::Destroy(handle));
    }

    fn center_on(&mut self, position: Coordinate) {
        tracing::debug!(%position, "map: center");
        self.ops.push(SurfaceOp::Center(position));
    }

    fn open_detail(&mut self, handle: MarkerHandle, record: &WashroomRecord) {
        tracing::debug!(handle = handle.raw(), washroom_id = %record.id, "map: open detail");
        self.ops.push(SurfaceOp::OpenDetail {
            handle,
            id: record.id.clone(),
        });
    }

    fn close_detail(&mut self) {
        tracing::debug!("map: close detail");
        self.ops.push(SurfaceOp::CloseDetail);
    }
}

/// Keeps a [`MapSurface`] in step with the search state and origin.
pub struct MapMarkerReconciler<S> {
    surface: S,
    results: watch::Receiver<SearchState>,
    origin: watch::Receiver<Option<Coordinate>>,
    user_marker: Option<(Coordinate, MarkerHandle)>,
    markers: HashMap<WashroomId, MarkerHandle>,
    detail: Option<WashroomId>,
    primed: bool,
}

impl<S: MapSurface> MapMarkerReconciler<S> {
    #[must_use]
    pub fn new(
        surface: S,
        results: watch::Receiver<SearchState>,
        origin: watch::Receiver<Option<Coordinate>>,
    ) -> Self {
        Self {
            surface,
            results,
            origin,
            user_marker: None,
            markers: HashMap::new(),
            detail: None,
            primed: false,
        }
    }

    /// Reconciles if the search state or origin changed since the last call.
    /// The first call always reconciles. Returns whether it did.
    pub fn sync(&mut self) -> bool {
        let results_changed = self.results.has_changed().unwrap_or(false);
        let origin_changed = self.origin.has_changed().unwrap_or(false);
        if self.primed && !results_changed && !origin_changed {
            return false;
        }
        self.primed = true;

        let state = self.results.borrow_and_update().clone();
        let origin = *self.origin.borrow_and_update();
        self.reconcile(origin, &state);
        true
    }

    /// Brings the surface in line with `origin` and `state`.
    ///
    /// Idempotent: a second call with the same inputs issues no operations.
    /// While a refresh is loading, washroom markers and the detail popup are
    /// left as they are so unchanged markers keep their handles.
    pub fn reconcile(&mut self, origin: Option<Coordinate>, state: &SearchState) {
        self.reconcile_user_marker(origin);
        if state.status() == ResultStatus::Loading {
            return;
        }
        self.reconcile_markers(state);
        self.reconcile_selection(state);
    }

    fn reconcile_user_marker(&mut self, origin: Option<Coordinate>) {
        let current = self.user_marker.map(|(position, _)| position);
        if current == origin {
            return;
        }
        if let Some((_, handle)) = self.user_marker.take() {
            self.surface.destroy_marker(handle);
        }
        if let Some(position) = origin {
            let handle = self.surface.create_marker(MarkerSpec {
                kind: MarkerKind::UserLocation,
                position,
                title: USER_LOCATION_TITLE,
            });
            self.surface.center_on(position);
            self.user_marker = Some((position, handle));
        }
    }

    fn reconcile_markers(&mut self, state: &SearchState) {
        let wanted: HashSet<&WashroomId> = state.records().iter().map(|r| &r.id).collect();

        let mut stale: Vec<WashroomId> = self
            .markers
            .keys()
            .filter(|id| !wanted.contains(id))
            .cloned()
            .collect();
        stale.sort();
        for id in stale {
            if self.detail.as_ref() == Some(&id) {
                self.surface.close_detail();
                self.detail = None;
            }
            if let Some(handle) = self.markers.remove(&id) {
                self.surface.destroy_marker(handle);
            }
        }

        for record in state.records() {
            if self.markers.contains_key(&record.id) {
                continue;
            }
            let handle = self.surface.create_marker(MarkerSpec {
                kind: MarkerKind::Washroom,
                position: record.location,
                title: &record.name,
            });
            self.markers.insert(record.id.clone(), handle);
        }
    }

    fn reconcile_selection(&mut self, state: &SearchState) {
        let wanted = state
            .selected_record()
            .filter(|record| self.markers.contains_key(&record.id));
        if wanted.map(|r| &r.id) == self.detail.as_ref() {
            return;
        }

        match wanted {
            Some(record) => {
                if let Some(&handle) = self.markers.get(&record.id) {
                    self.surface.center_on(record.location);
                    self.surface.open_detail(handle, record);
                    self.detail = Some(record.id.clone());
                }
            }
            None => {
                self.surface.close_detail();
                self.detail = None;
            }
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn marker_for(&self, id: &WashroomId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    /// Washroom id behind a marker handle. `None` for the user-location
    /// marker and for handles this reconciler no longer owns.
    #[must_use]
    pub fn washroom_for(&self, handle: MarkerHandle) -> Option<&WashroomId> {
        self.markers
            .iter()
            .find_map(|(id, &h)| (h == handle).then_some(id))
    }

    #[must_use]
    pub fn user_marker(&self) -> Option<MarkerHandle> {
        self.user_marker.map(|(_, handle)| handle)
    }

    /// Number of washroom markers, excluding the user-location marker.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Id whose detail popup is currently open.
    #[must_use]
    pub fn open_detail(&self) -> Option<&WashroomId> {
        self.detail.as_ref()
    }
}
