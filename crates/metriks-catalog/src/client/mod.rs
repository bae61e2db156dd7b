//! HTTP client for the catalog search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use metriks_core::{AppConfig, ResultPage, SearchQuery};
use reqwest::{Client, StatusCode, Url};

use crate::error::CatalogError;
use crate::normalize::normalize_entries;
use crate::service::CatalogService;
use crate::types::{product_entries, ErrorBody};

/// HTTP client for `GET {base}/search/{category}`.
///
/// Non-2xx responses carrying `{ "error": "..." }` surface as
/// [`CatalogError::Server`] with the server's message; any other non-2xx
/// response is [`CatalogError::UnexpectedStatus`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    search_endpoint: Url,
}

impl CatalogClient {
    /// Creates a client for `base_url`, searching within `category`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`CatalogError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        category: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CatalogError> {
        let search_endpoint = search_endpoint(base_url, category)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            search_endpoint,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.catalog_base_url,
            &config.catalog_category,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Builds the full request URL for one page of `query`.
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.search_endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query.text())
                .append_pair("page", &query.page().to_string())
                .append_pair("limit", &query.page_size().to_string())
                .append_pair("searchType", query.mode().as_param());
            if let Some(coords) = query.mode().coordinates() {
                pairs
                    .append_pair("latitude", &coords.lat.to_string())
                    .append_pair("longitude", &coords.lon.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl CatalogService for CatalogClient {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<ResultPage, CatalogError> {
        let url = self.search_url(query);
        tracing::debug!(%url, page = query.page(), "fetching catalog page");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body, &url));
        }

        let context = format!("catalog page {} for \"{}\"", query.page(), query.text());
        let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            CatalogError::Deserialize {
                context: context.clone(),
                source: e,
            }
        })?;
        let entries = product_entries(value)
            .map_err(|reason| CatalogError::UnexpectedShape { context, reason })?;

        let received = entries.len();
        let items = normalize_entries(entries);
        tracing::debug!(
            page = query.page(),
            received,
            kept = items.len(),
            "catalog page received"
        );

        Ok(ResultPage::from_received(
            query.page(),
            items,
            received,
            query.page_size(),
        ))
    }
}

fn search_endpoint(base_url: &str, category: &str) -> Result<Url, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason,
    };

    let mut url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot carry a path".to_owned()))?
        .pop_if_empty()
        .push("search")
        .push(category);
    Ok(url)
}

fn status_error(status: StatusCode, body: &str, url: &Url) -> CatalogError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.trim().is_empty() => CatalogError::Server {
            status: status.as_u16(),
            message: error,
        },
        _ => CatalogError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
