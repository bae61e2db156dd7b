//! The search session state machine.
//!
//! [`SearchSession`] is a plain value. Every change goes through one of its
//! transition methods, which return either the fetch to issue or whether
//! the session changed. The controller owns the I/O; this module owns the
//! rules.

use std::time::Duration;

use metriks_core::{ErrorKind, ProductSummary, ResultPage, SearchMode, SearchQuery};

use crate::accumulator::accumulate;
use crate::error::CatalogError;

/// Minimum number of characters (after trimming) a query must have.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    LoadingMore,
    Ready,
    Exhausted,
    Error,
}

impl SearchStatus {
    /// Returns `true` while a page request is outstanding.
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(self, SearchStatus::Loading | SearchStatus::LoadingMore)
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Loading => "loading",
            SearchStatus::LoadingMore => "loading more",
            SearchStatus::Ready => "ready",
            SearchStatus::Exhausted => "exhausted",
            SearchStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// Failure recorded on the session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::from(&CatalogError::Timeout { after })
    }
}

impl From<&CatalogError> for SessionError {
    fn from(err: &CatalogError) -> Self {
        let message = match err {
            CatalogError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self::new(err.kind(), message)
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A fetch the controller must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub query: SearchQuery,
}

/// The outcome of a [`PageRequest`], tagged with what it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub generation: u64,
    pub page: u32,
    pub outcome: Result<ResultPage, SessionError>,
}

impl PageResponse {
    #[must_use]
    pub fn for_request(request: &PageRequest, outcome: Result<ResultPage, SessionError>) -> Self {
        Self {
            generation: request.generation,
            page: request.query.page(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSession {
    /// Query of the last page accepted (or of page 1 while it loads).
    query: Option<SearchQuery>,
    status: SearchStatus,
    results: Vec<ProductSummary>,
    error: Option<SessionError>,
    generation: u64,
    outstanding: Option<PageRequest>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    #[must_use]
    pub fn results(&self) -> &[ProductSummary] {
        &self.results
    }

    #[must_use]
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The request the session is waiting on, if any.
    #[must_use]
    pub fn outstanding(&self) -> Option<&PageRequest> {
        self.outstanding.as_ref()
    }

    /// Starts a new search. Returns the page-1 request, or `None` when the
    /// text is too short (the session then sits in `Error` with
    /// [`ErrorKind::QueryTooShort`]).
    pub fn submit(&mut self, text: &str, mode: SearchMode, page_size: u32) -> Option<PageRequest> {
        self.generation += 1;
        self.results.clear();
        self.outstanding = None;

        let text = text.trim();
        if text.chars().count() < MIN_QUERY_CHARS {
            self.query = None;
            self.status = SearchStatus::Error;
            self.error = Some(SessionError::new(
                ErrorKind::QueryTooShort,
                format!("search text must be at least {MIN_QUERY_CHARS} characters"),
            ));
            return None;
        }

        let query = SearchQuery::first_page(text, page_size, mode);
        let request = PageRequest {
            generation: self.generation,
            query: query.clone(),
        };
        self.query = Some(query);
        self.status = SearchStatus::Loading;
        self.error = None;
        self.outstanding = Some(request.clone());
        Some(request)
    }

    /// Requests the page after the last accepted one. Only valid in `Ready`;
    /// anywhere else the session is left untouched and `None` is returned.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.status != SearchStatus::Ready {
            return None;
        }
        let next = self.query.as_ref()?.next_page();
        let request = PageRequest {
            generation: self.generation,
            query: next,
        };
        self.status = SearchStatus::LoadingMore;
        self.outstanding = Some(request.clone());
        Some(request)
    }

    /// Abandons the outstanding request. Results are never touched.
    ///
    /// Returns `true` if something was in flight.
    pub fn cancel(&mut self) -> bool {
        if self.outstanding.take().is_none() {
            return false;
        }
        self.generation += 1;
        self.status = match self.status {
            SearchStatus::Loading => SearchStatus::Idle,
            SearchStatus::LoadingMore => SearchStatus::Ready,
            other => other,
        };
        true
    }

    /// Forgets the query, results and error.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Applies a fetch outcome. Stale or unexpected responses are discarded
    /// and leave the session untouched; returns `true` if it changed.
    pub fn apply(&mut self, response: PageResponse) -> bool {
        if response.generation != self.generation {
            tracing::debug!(
                response_generation = response.generation,
                current_generation = self.generation,
                page = response.page,
                "discarding stale catalog response"
            );
            return false;
        }

        let request = match self.outstanding.take() {
            Some(request) if request.query.page() == response.page => request,
            other => {
                self.outstanding = other;
                tracing::debug!(
                    page = response.page,
                    "discarding catalog response with no matching request"
                );
                return false;
            }
        };

        match response.outcome {
            Ok(page) => self.accept_page(request.query, page),
            Err(error) => {
                tracing::debug!(kind = %error.kind, page = response.page, "catalog page failed");
                self.status = SearchStatus::Error;
                self.error = Some(error);
            }
        }
        true
    }

    fn accept_page(&mut self, query: SearchQuery, page: ResultPage) {
        let is_first = query.page() == 1;
        let text = query.text().to_owned();
        self.query = Some(query);

        if is_first && page.items.is_empty() {
            self.results.clear();
            self.status = SearchStatus::Exhausted;
            self.error = Some(SessionError::new(
                ErrorKind::NoResults,
                format!("no products found for \"{text}\""),
            ));
            return;
        }

        self.results = accumulate(std::mem::take(&mut self.results), page.items);
        self.error = None;
        self.status = if page.is_final_page {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Ready
        };
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
