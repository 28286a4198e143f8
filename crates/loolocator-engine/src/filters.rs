//! Search filter store with change notification.

use loolocator_core::{InvalidParameter, SearchParameters};
use tokio::sync::watch;

/// Holds the active [`SearchParameters`].
///
/// Updates replace the whole value at once, so observers never see a radius
/// from one update paired with an accessibility flag from another.
/// Subscribers are notified through a `watch` channel, which coalesces
/// several updates made before the observer looks into one notification.
pub struct SearchParameterStore {
    tx: watch::Sender<SearchParameters>,
}

impl SearchParameterStore {
    #[must_use]
    pub fn new(initial: SearchParameters) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    #[must_use]
    pub fn current(&self) -> SearchParameters {
        *self.tx.borrow()
    }

    /// Validates and stores new filter values.
    ///
    /// Subscribers are only notified when the stored value actually changes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter::Radius`] for a radius outside the offered
    /// set. The stored value is left untouched.
    pub fn update(
        &self,
        radius_meters: u32,
        accessibility_only: bool,
    ) -> Result<SearchParameters, InvalidParameter> {
        let next = SearchParameters::new(radius_meters, accessibility_only).inspect_err(|e| {
            tracing::debug!(error = %e, "rejected filter update");
        })?;

        let changed = self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            tracing::debug!(
                radius_m = next.radius.meters(),
                accessibility_only = next.accessibility_only,
                "search filters updated"
            );
        }
        Ok(next)
    }

    /// New receiver that treats the current value as already seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchParameters> {
        self.tx.subscribe()
    }
}

impl Default for SearchParameterStore {
    fn default() -> Self {
        Self::new(SearchParameters::default())
    }
}
