//! Device position lookup for nearby searches.

use async_trait::async_trait;
use metriks_core::{Coordinates, SearchMode};

use crate::error::GeolocationError;

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Returns the current position.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError`] when no position can be obtained.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A provider that always reports the same position, or none at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    position: Option<Coordinates>,
}

impl FixedLocation {
    #[must_use]
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.position
            .ok_or_else(|| GeolocationError::Unavailable("no home location configured".into()))
    }
}

/// Picks the search mode for a request. A nearby search whose position
/// lookup fails degrades to a catalog-wide search.
pub async fn resolve_mode(provider: &dyn GeolocationProvider, nearby: bool) -> SearchMode {
    if !nearby {
        return SearchMode::Catalog;
    }
    match provider.current_position().await {
        Ok(coords) => SearchMode::Nearby(coords),
        Err(e) => {
            tracing::warn!(error = %e, "position unavailable, falling back to catalog search");
            SearchMode::Catalog
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    #[async_trait]
    impl GeolocationProvider for Denied {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn nearby_with_position_uses_coordinates() {
        let coords = Coordinates::new(31.77, 35.21).unwrap();
        let mode = resolve_mode(&FixedLocation::new(Some(coords)), true).await;
        assert_eq!(mode, SearchMode::Nearby(coords));
    }

    #[tokio::test]
    async fn nearby_without_position_falls_back_to_catalog() {
        let mode = resolve_mode(&FixedLocation::default(), true).await;
        assert_eq!(mode, SearchMode::Catalog);
    }

    #[tokio::test]
    async fn denied_permission_falls_back_to_catalog() {
        assert_eq!(resolve_mode(&Denied, true).await, SearchMode::Catalog);
    }

    #[tokio::test]
    async fn catalog_mode_skips_lookup() {
        assert_eq!(resolve_mode(&Denied, false).await, SearchMode::Catalog);
    }
}
