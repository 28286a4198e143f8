//! Location, search, and map-marker state for the washroom finder.
//!
//! Data flows one way: [`GeoLocationProvider`] yields an origin,
//! [`ResultSetController`] turns origin + [`SearchParameterStore`] filters
//! into generation-stamped queries against a [`WashroomDirectory`], and
//! [`MapMarkerReconciler`] mirrors the settled result set onto a
//! [`MapSurface`]. [`Session`] owns all of them.

pub mod directory;
pub mod filters;
pub mod location;
pub mod map;
pub mod results;
pub mod session;

pub use directory::WashroomDirectory;
pub use filters::SearchParameterStore;
pub use location::{
    GeoLocationProvider, LocationError, PlatformError, PositionRequest, PositionSource,
    RawPosition, StaticPosition,
};
pub use map::{
    MapMarkerReconciler, MapSurface, MarkerHandle, MarkerKind, MarkerSpec, RecordingSurface,
    SurfaceOp,
};
pub use results::{
    Generation, QueryFailure, ResultSet, ResultSetController, ResultStatus, SearchState,
    QUERY_FAILED_MESSAGE,
};
pub use session::Session;
