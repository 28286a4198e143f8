//! Seam between the result controller and the remote directory.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;

use loolocator_client::{DirectoryClient, QueryError};
use loolocator_core::{Coordinate, SearchParameters, WashroomRecord};

/// Anything that can answer a nearest-washroom query.
///
/// The HTTP [`DirectoryClient`] is the production implementation; tests
/// substitute scripted directories to control completion order.
pub trait WashroomDirectory {
    fn nearest(
        &self,
        origin: Coordinate,
        params: SearchParameters,
        limit: NonZeroU32,
    ) -> impl Future<Output = Result<Vec<WashroomRecord>, QueryError>> + Send;
}

impl WashroomDirectory for DirectoryClient {
    fn nearest(
        &self,
        origin: Coordinate,
        params: SearchParameters,
        limit: NonZeroU32,
    ) -> impl Future<Output = Result<Vec<WashroomRecord>, QueryError>> + Send {
        DirectoryClient::nearest(self, origin, params, limit)
    }
}

impl<T: WashroomDirectory + Send + Sync> WashroomDirectory for Arc<T> {
    fn nearest(
        &self,
        origin: Coordinate,
        params: SearchParameters,
        limit: NonZeroU32,
    ) -> impl Future<Output = Result<Vec<WashroomRecord>, QueryError>> + Send {
        T::nearest(self, origin, params, limit)
    }
}
