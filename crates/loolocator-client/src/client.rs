//! HTTP client for the washroom directory service.
//!
//! Wraps `reqwest` with directory-specific URL construction, status
//! classification, and record normalization. Every endpoint lives under
//! `<base>/api/`, so the base URL may carry a path prefix.

use std::num::NonZeroU32;
use std::time::Duration;

use loolocator_core::{AppConfig, Coordinate, SearchParameters, WashroomId, WashroomRecord};
use reqwest::{Client, Url};

use crate::error::QueryError;
use crate::normalize::{normalize_record, normalize_records};
use crate::types::WireWashroom;

/// Result cap sent with every nearest search unless configured otherwise.
pub const DEFAULT_RESULT_LIMIT: NonZeroU32 = NonZeroU32::MIN.saturating_add(19);

const DEFAULT_USER_AGENT: &str = "loolocator/0.1 (washroom-finder)";

/// Client for the directory service REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct DirectoryClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
}

impl DirectoryClient {
    /// Creates a client pointed at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`QueryError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so a path prefix in the base URL survives
        // when endpoint segments are appended.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| QueryError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid("expected an http or https URL".to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`DirectoryClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, QueryError> {
        Self::new(
            &config.backend_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a 30 second timeout and the default user agent.
    ///
    /// # Errors
    ///
    /// Same as [`DirectoryClient::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, QueryError> {
        Self::new(base_url, 30, DEFAULT_USER_AGENT)
    }

    /// Runs a nearest search around `origin`.
    ///
    /// Results keep the service's ordering. Records that fail validation are
    /// dropped and logged; they never fail the whole query. Missing distances
    /// are computed from `origin`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Network`] on connectivity failure or timeout.
    /// - [`QueryError::Service`] on a non-2xx status.
    /// - [`QueryError::Malformed`] if the body is not a JSON array.
    pub async fn nearest(
        &self,
        origin: Coordinate,
        params: SearchParameters,
        limit: NonZeroU32,
    ) -> Result<Vec<WashroomRecord>, QueryError> {
        let url = self.nearest_url(origin, params, limit);
        tracing::debug!(
            %origin,
            radius_m = params.radius.meters(),
            accessibility_only = params.accessibility_only,
            limit = limit.get(),
            "querying nearest washrooms"
        );

        let body = self.request_json(&url).await?;
        let items: Vec<serde_json::Value> =
            serde_json::from_value(body).map_err(|e| QueryError::Malformed {
                context: "nearest".to_string(),
                source: e,
            })?;

        let records = normalize_records(items, Some(&origin));
        tracing::debug!(count = records.len(), "nearest search returned");
        Ok(records)
    }

    /// Fetches a single washroom by id. The returned record has no distance.
    ///
    /// # Errors
    ///
    /// - [`QueryError::NotFound`] if the service answers 404.
    /// - [`QueryError::Network`], [`QueryError::Service`] as for [`Self::nearest`].
    /// - [`QueryError::Malformed`] if the body is not a valid washroom object.
    pub async fn get_washroom(&self, id: &WashroomId) -> Result<WashroomRecord, QueryError> {
        let url = self.endpoint(&["washrooms", id.as_str()]);
        let body = match self.request_json(&url).await {
            Err(QueryError::Service { status: 404, .. }) => {
                return Err(QueryError::NotFound { id: id.to_string() });
            }
            other => other?,
        };

        let context = format!("washroom(id={id})");
        let wire: WireWashroom =
            serde_json::from_value(body).map_err(|e| QueryError::Malformed {
                context: context.clone(),
                source: e,
            })?;
        normalize_record(wire, None).map_err(|rejected| QueryError::Malformed {
            context,
            source: <serde_json::Error as serde::de::Error>::custom(rejected),
        })
    }

    /// Builds the nearest-search URL with percent-encoded query parameters.
    pub(crate) fn nearest_url(
        &self,
        origin: Coordinate,
        params: SearchParameters,
        limit: NonZeroU32,
    ) -> Url {
        let mut url = self.endpoint(&["washrooms", "nearest"]);
        url.query_pairs_mut()
            .append_pair("latitude", &origin.latitude().to_string())
            .append_pair("longitude", &origin.longitude().to_string())
            .append_pair("radius", &params.radius.meters().to_string())
            .append_pair("limit", &limit.get().to_string())
            .append_pair(
                "accessibility_required",
                if params.accessibility_only {
                    "true"
                } else {
                    "false"
                },
            );
        url
    }

    /// Appends `api/<segments...>` to the base URL, encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// Sends a GET request, classifies the HTTP status, and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Network`] on transport failure,
    /// [`QueryError::Service`] on a non-2xx status, and
    /// [`QueryError::Malformed`] if the body is not valid JSON.
    pub(crate) async fn request_json(&self, url: &Url) -> Result<serde_json::Value, QueryError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "directory service error status");
            return Err(QueryError::Service {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| QueryError::Malformed {
            context: url.path().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
