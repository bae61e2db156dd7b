use async_trait::async_trait;
use metriks_core::{ResultPage, SearchQuery};

use crate::error::CatalogError;

/// Source of catalog result pages.
///
/// [`crate::CatalogClient`] is the HTTP implementation; the query controller
/// only depends on this trait so it can be driven by in-memory catalogs.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches the page described by `query`.
    ///
    /// # Errors
    ///
    /// Implementations return [`CatalogError`] for transport, status and
    /// decoding failures.
    async fn fetch_page(&self, query: &SearchQuery) -> Result<ResultPage, CatalogError>;
}
