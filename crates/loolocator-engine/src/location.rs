//! Position acquisition with a bounded wait and a staleness-bounded cache.

use std::future::Future;
use std::time::{Duration, Instant};

use loolocator_core::{AppConfig, Coordinate};
use thiserror::Error;

/// Default upper bound on one acquisition.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default age under which a previous fix is reused.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

/// Position as reported by the platform, before range validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Options forwarded to the platform with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

/// Failure codes a platform position API can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
    Other(String),
}

/// Classified location failure. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location access denied. Please enable location services.")]
    PermissionDenied,
    #[error("Location information unavailable.")]
    PositionUnavailable,
    #[error("Location request timed out.")]
    Timeout,
    #[error("Geolocation is not supported on this device.")]
    Unsupported,
    #[error("An unknown error occurred while getting location.")]
    Unknown,
}

impl From<PlatformError> for LocationError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::PermissionDenied => LocationError::PermissionDenied,
            PlatformError::PositionUnavailable => LocationError::PositionUnavailable,
            PlatformError::Timeout => LocationError::Timeout,
            PlatformError::Unsupported => LocationError::Unsupported,
            PlatformError::Other(detail) => {
                tracing::debug!(detail = %detail, "unclassified platform location error");
                LocationError::Unknown
            }
        }
    }
}

/// Platform capability that can report the device position.
///
/// Implementations may prompt the user for permission.
pub trait PositionSource {
    fn current_position(
        &self,
        request: PositionRequest,
    ) -> impl Future<Output = Result<RawPosition, PlatformError>> + Send;
}

/// A source that always reports the same position, e.g. one typed on the
/// command line.
#[derive(Debug, Clone, Copy)]
pub struct StaticPosition(pub RawPosition);

impl PositionSource for StaticPosition {
    async fn current_position(
        &self,
        _request: PositionRequest,
    ) -> Result<RawPosition, PlatformError> {
        Ok(self.0)
    }
}

/// Normalises a [`PositionSource`] into `Coordinate | LocationError`.
///
/// Never retries; callers decide whether to ask again.
pub struct GeoLocationProvider<P> {
    source: Option<P>,
    timeout: Duration,
    max_age: Duration,
    last_fix: Option<(Coordinate, Instant)>,
}

impl<P: PositionSource> GeoLocationProvider<P> {
    #[must_use]
    pub fn new(source: P) -> Self {
        Self::with_limits(Some(source), DEFAULT_TIMEOUT, DEFAULT_MAX_AGE)
    }

    /// Provider for a platform without any position capability. Every
    /// [`acquire`](Self::acquire) reports [`LocationError::Unsupported`].
    #[must_use]
    pub fn unsupported() -> Self {
        Self::with_limits(None, DEFAULT_TIMEOUT, DEFAULT_MAX_AGE)
    }

    #[must_use]
    pub fn with_limits(source: Option<P>, timeout: Duration, max_age: Duration) -> Self {
        Self {
            source,
            timeout,
            max_age,
            last_fix: None,
        }
    }

    #[must_use]
    pub fn from_config(source: Option<P>, config: &AppConfig) -> Self {
        Self::with_limits(
            source,
            Duration::from_secs(config.location_timeout_secs),
            Duration::from_secs(config.location_max_age_secs),
        )
    }

    /// Returns the device position.
    ///
    /// A fix younger than the max age is reused without touching the
    /// platform. Otherwise the platform is asked and given at most the
    /// configured timeout to answer.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] classifying why no position is available.
    /// A platform answer outside valid coordinate ranges is reported as
    /// [`LocationError::PositionUnavailable`].
    pub async fn acquire(&mut self) -> Result<Coordinate, LocationError> {
        if let Some((coordinate, captured_at)) = self.last_fix {
            if captured_at.elapsed() < self.max_age {
                tracing::debug!(%coordinate, "reusing cached position");
                return Ok(coordinate);
            }
        }

        let Some(source) = &self.source else {
            return Err(LocationError::Unsupported);
        };

        let request = PositionRequest {
            high_accuracy: true,
            timeout: self.timeout,
            maximum_age: self.max_age,
        };
        let raw = tokio::time::timeout(self.timeout, source.current_position(request))
            .await
            .map_err(|_| LocationError::Timeout)??;

        let coordinate = Coordinate::new(raw.latitude, raw.longitude).map_err(|e| {
            tracing::warn!(error = %e, "platform reported an invalid position");
            LocationError::PositionUnavailable
        })?;

        self.last_fix = Some((coordinate, Instant::now()));
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct Counting {
        answer: Result<RawPosition, PlatformError>,
        calls: Arc<AtomicUsize>,
    }

    impl PositionSource for Counting {
        async fn current_position(
            &self,
            _request: PositionRequest,
        ) -> Result<RawPosition, PlatformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    struct Never;

    impl PositionSource for Never {
        async fn current_position(
            &self,
            _request: PositionRequest,
        ) -> Result<RawPosition, PlatformError> {
            std::future::pending().await
        }
    }

    fn counting(answer: Result<RawPosition, PlatformError>) -> (Counting, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Counting {
                answer,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    const TIMES_SQUARE: RawPosition = RawPosition {
        latitude: 40.7589,
        longitude: -73.9851,
    };

    #[tokio::test]
    async fn acquire_returns_validated_coordinate() {
        let mut provider = GeoLocationProvider::new(StaticPosition(TIMES_SQUARE));
        let c = provider.acquire().await.unwrap();
        assert!((c.latitude() - 40.7589).abs() < 1e-9);
    }

    #[tokio::test]
    async fn acquire_classifies_platform_errors() {
        let cases = [
            (PlatformError::PermissionDenied, LocationError::PermissionDenied),
            (
                PlatformError::PositionUnavailable,
                LocationError::PositionUnavailable,
            ),
            (PlatformError::Timeout, LocationError::Timeout),
            (PlatformError::Unsupported, LocationError::Unsupported),
            (
                PlatformError::Other("kernel said no".into()),
                LocationError::Unknown,
            ),
        ];
        for (platform, expected) in cases {
            let (source, _) = counting(Err(platform));
            let mut provider = GeoLocationProvider::new(source);
            assert_eq!(provider.acquire().await, Err(expected));
        }
    }

    #[tokio::test]
    async fn permission_denied_message_is_user_facing() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location access denied. Please enable location services."
        );
    }

    #[tokio::test]
    async fn unsupported_platform_never_asks() {
        let mut provider = GeoLocationProvider::<StaticPosition>::unsupported();
        assert_eq!(provider.acquire().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn slow_platform_times_out() {
        let mut provider =
            GeoLocationProvider::with_limits(Some(Never), Duration::from_millis(20), Duration::ZERO);
        assert_eq!(provider.acquire().await, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn out_of_range_fix_is_unavailable() {
        let mut provider = GeoLocationProvider::new(StaticPosition(RawPosition {
            latitude: 95.0,
            longitude: 0.0,
        }));
        assert_eq!(
            provider.acquire().await,
            Err(LocationError::PositionUnavailable)
        );
    }

    #[tokio::test]
    async fn fresh_fix_is_reused() {
        let (source, calls) = counting(Ok(TIMES_SQUARE));
        let mut provider =
            GeoLocationProvider::with_limits(Some(source), DEFAULT_TIMEOUT, DEFAULT_MAX_AGE);
        provider.acquire().await.unwrap();
        provider.acquire().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_max_age_always_asks_platform() {
        let (source, calls) = counting(Ok(TIMES_SQUARE));
        let mut provider =
            GeoLocationProvider::with_limits(Some(source), DEFAULT_TIMEOUT, Duration::ZERO);
        provider.acquire().await.unwrap();
        provider.acquire().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached_or_retried() {
        let (source, calls) = counting(Err(PlatformError::PositionUnavailable));
        let mut provider = GeoLocationProvider::new(source);
        assert!(provider.acquire().await.is_err());
        assert!(provider.acquire().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
