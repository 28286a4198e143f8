//! Result set state and the last-request-wins refresh controller.

use std::num::NonZeroU32;

use loolocator_client::{QueryError, QueryErrorKind};
use loolocator_core::{Coordinate, SearchParameters, WashroomId, WashroomRecord};
use tokio::sync::watch;

use crate::directory::WashroomDirectory;

/// Message shown to the user for any failed nearest query.
pub const QUERY_FAILED_MESSAGE: &str = "Failed to find nearby washrooms. Please try again.";

/// Monotonic stamp attached to each issued query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Failure attached to a result set in the `Error` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub kind: QueryErrorKind,
    /// User-facing text, always [`QUERY_FAILED_MESSAGE`].
    pub message: String,
    /// Underlying error text, for logs and diagnostics only.
    pub detail: String,
}

impl From<&QueryError> for QueryFailure {
    fn from(err: &QueryError) -> Self {
        Self {
            kind: err.kind(),
            message: QUERY_FAILED_MESSAGE.to_string(),
            detail: err.to_string(),
        }
    }
}

/// Snapshot of what the list view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub status: ResultStatus,
    pub records: Vec<WashroomRecord>,
    pub error: Option<QueryFailure>,
}

/// Result set plus selection and the latest issued generation.
///
/// Pure state machine; [`ResultSetController`] drives it and publishes each
/// transition to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    latest: Generation,
    status: ResultStatus,
    records: Vec<WashroomRecord>,
    error: Option<QueryFailure>,
    selection: Option<WashroomId>,
}

impl SearchState {
    /// Enters `Loading` and issues the next generation.
    ///
    /// Records and error are cleared. The selection is kept until the
    /// response settles it.
    pub fn begin_refresh(&mut self) -> Generation {
        self.latest = self.latest.next();
        self.status = ResultStatus::Loading;
        self.records.clear();
        self.error = None;
        self.latest
    }

    /// Applies a query outcome if it belongs to the latest generation.
    ///
    /// Returns `false` and leaves the state untouched for superseded
    /// responses.
    pub fn apply(
        &mut self,
        generation: Generation,
        outcome: Result<Vec<WashroomRecord>, QueryFailure>,
    ) -> bool {
        if generation != self.latest || self.status != ResultStatus::Loading {
            tracing::debug!(
                %generation,
                latest = %self.latest,
                "discarding superseded query response"
            );
            return false;
        }

        match outcome {
            Ok(records) => {
                if let Some(selected) = &self.selection {
                    if !records.iter().any(|r| &r.id == selected) {
                        self.selection = None;
                    }
                }
                self.status = ResultStatus::Success;
                self.records = records;
                self.error = None;
            }
            Err(failure) => {
                self.status = ResultStatus::Error;
                self.records.clear();
                self.selection = None;
                self.error = Some(failure);
            }
        }
        true
    }

    /// Sets or clears the selection.
    ///
    /// Selecting an id absent from the current records is rejected and
    /// returns `false`. Clearing always succeeds.
    pub fn select(&mut self, id: Option<&WashroomId>) -> bool {
        match id {
            None => {
                self.selection = None;
                true
            }
            Some(id) if self.record(id).is_some() => {
                self.selection = Some(id.clone());
                true
            }
            Some(id) => {
                tracing::debug!(washroom_id = %id, "ignoring selection of unknown washroom");
                false
            }
        }
    }

    #[must_use]
    pub fn latest(&self) -> Generation {
        self.latest
    }

    #[must_use]
    pub fn status(&self) -> ResultStatus {
        self.status
    }

    #[must_use]
    pub fn records(&self) -> &[WashroomRecord] {
        &self.records
    }

    #[must_use]
    pub fn error(&self) -> Option<&QueryFailure> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&WashroomId> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn record(&self, id: &WashroomId) -> Option<&WashroomRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&WashroomRecord> {
        self.selection.as_ref().and_then(|id| self.record(id))
    }

    #[must_use]
    pub fn result_set(&self) -> ResultSet {
        ResultSet {
            status: self.status,
            records: self.records.clone(),
            error: self.error.clone(),
        }
    }
}

/// Issues nearest queries and keeps only the newest response.
///
/// Every [`refresh`](Self::refresh) takes a fresh generation before the
/// request goes out. A response is applied only while its generation is
/// still the latest, so overlapping refreshes can complete in any order.
pub struct ResultSetController<D> {
    directory: D,
    limit: NonZeroU32,
    state: watch::Sender<SearchState>,
    origin: watch::Sender<Option<Coordinate>>,
}

impl<D: WashroomDirectory> ResultSetController<D> {
    #[must_use]
    pub fn new(directory: D, limit: NonZeroU32) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        let (origin, _) = watch::channel(None);
        Self {
            directory,
            limit,
            state,
            origin,
        }
    }

    /// Queries the directory and applies the outcome if still current.
    ///
    /// The `Loading` transition is published before the request is sent.
    /// Returns whether this call's response was applied.
    pub async fn refresh(&self, origin: Coordinate, params: SearchParameters) -> bool {
        let mut generation = Generation::default();
        self.state.send_modify(|s| generation = s.begin_refresh());
        tracing::debug!(
            %generation,
            %origin,
            radius_m = params.radius.meters(),
            accessibility_only = params.accessibility_only,
            "issuing nearest query"
        );

        let outcome = self
            .directory
            .nearest(origin, params, self.limit)
            .await
            .map_err(|e| {
                tracing::warn!(%generation, error = %e, "nearest query failed");
                QueryFailure::from(&e)
            });
        let count = outcome.as_ref().map_or(0, Vec::len);

        let applied = self.state.send_if_modified(|s| s.apply(generation, outcome));
        if applied {
            tracing::info!(%generation, results = count, "result set updated");
        }
        applied
    }

    /// Sets or clears the selection. See [`SearchState::select`].
    pub fn select(&self, id: Option<&WashroomId>) -> bool {
        let mut accepted = false;
        self.state.send_if_modified(|s| {
            let before = s.selection.clone();
            accepted = s.select(id);
            accepted && s.selection != before
        });
        accepted
    }

    /// Records the origin used for the user-location marker.
    pub fn set_origin(&self, origin: Coordinate) {
        self.origin.send_if_modified(|current| {
            if *current == Some(origin) {
                false
            } else {
                *current = Some(origin);
                true
            }
        });
    }

    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        *self.origin.borrow()
    }

    #[must_use]
    pub fn current(&self) -> ResultSet {
        self.state.borrow().result_set()
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.state.borrow().latest()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn subscribe_origin(&self) -> watch::Receiver<Option<Coordinate>> {
        self.origin.subscribe()
    }
}
