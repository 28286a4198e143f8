use thiserror::Error;

/// Errors returned by the directory service client.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Connectivity, TLS, or timeout failure from the underlying HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The service answered with a non-2xx status.
    #[error("directory service returned HTTP {status} for {url}")]
    Service { status: u16, url: String },

    /// Single-record lookup for an id the service does not know.
    #[error("washroom not found: {id}")]
    NotFound { id: String },

    /// The response body does not match the expected shape.
    #[error("malformed response for {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification shown alongside a failed result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    Network,
    Service,
    Malformed,
}

impl QueryError {
    #[must_use]
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            QueryError::Network(_) | QueryError::InvalidBaseUrl { .. } => QueryErrorKind::Network,
            QueryError::Service { .. } | QueryError::NotFound { .. } => QueryErrorKind::Service,
            QueryError::Malformed { .. } => QueryErrorKind::Malformed,
        }
    }
}

/// The map key could not be provisioned. Only the map region degrades;
/// search results keep working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("map unavailable: {reason}")]
pub struct MapUnavailable {
    pub reason: String,
}

impl MapUnavailable {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
