//! Service-level endpoints: health check and map key provisioning.

use crate::client::DirectoryClient;
use crate::error::{MapUnavailable, QueryError};
use crate::types::{HealthStatus, MapKeyResponse};

/// Short-lived credential used to initialise a map surface.
#[derive(Clone, PartialEq, Eq)]
pub struct MapKey(String);

impl MapKey {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MapKey([redacted])")
    }
}

impl DirectoryClient {
    /// Calls `GET /api/health`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Network`] on connectivity failure.
    /// - [`QueryError::Service`] on a non-2xx status.
    /// - [`QueryError::Malformed`] if the body is not `{status, service}`.
    pub async fn health(&self) -> Result<HealthStatus, QueryError> {
        let url = self.endpoint(&["health"]);
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| QueryError::Malformed {
            context: "health".to_string(),
            source: e,
        })
    }

    /// Fetches the map key from `GET /api/maps/api-key`.
    ///
    /// Every failure is folded into [`MapUnavailable`]; callers hide the map
    /// region and keep the result list.
    ///
    /// # Errors
    ///
    /// Returns [`MapUnavailable`] when the endpoint is missing, answers with a
    /// non-2xx status, is unreachable, or returns an empty key.
    pub async fn fetch_map_key(&self) -> Result<MapKey, MapUnavailable> {
        let url = self.endpoint(&["maps", "api-key"]);
        let body = self.request_json(&url).await.map_err(|e| match e {
            QueryError::Service { status, .. } => {
                MapUnavailable::new(format!("map key not configured (HTTP {status})"))
            }
            other => MapUnavailable::new(other.to_string()),
        })?;

        let response: MapKeyResponse = serde_json::from_value(body)
            .map_err(|e| MapUnavailable::new(format!("unexpected map key payload: {e}")))?;

        let key = response.api_key.trim();
        if key.is_empty() {
            return Err(MapUnavailable::new("map key is empty"));
        }
        Ok(MapKey(key.to_string()))
    }
}
