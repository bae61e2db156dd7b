//! Async driver for a [`SearchSession`].
//!
//! The controller publishes the session through a `tokio::sync::watch`
//! channel. Public methods apply a transition synchronously and spawn the
//! resulting fetch; the fetch task applies its outcome when it completes.
//! Every transition runs inside `send_if_modified`, so transitions never
//! interleave.

use std::sync::Arc;
use std::time::Duration;

use metriks_core::{AppConfig, SearchMode};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::service::CatalogService;
use crate::session::{PageRequest, PageResponse, SearchSession, SessionError};

pub struct QueryController<S: CatalogService + ?Sized + 'static> {
    catalog: Arc<S>,
    state: Arc<watch::Sender<SearchSession>>,
    page_size: u32,
    request_timeout: Duration,
}

impl<S: CatalogService + ?Sized + 'static> QueryController<S> {
    /// Creates a controller with an idle session. Each fetch is abandoned
    /// with [`metriks_core::ErrorKind::Timeout`] after `request_timeout`.
    #[must_use]
    pub fn new(catalog: Arc<S>, page_size: u32, request_timeout: Duration) -> Self {
        let (state, _) = watch::channel(SearchSession::new());
        Self {
            catalog,
            state: Arc::new(state),
            page_size: page_size.max(1),
            request_timeout,
        }
    }

    #[must_use]
    pub fn from_config(catalog: Arc<S>, config: &AppConfig) -> Self {
        Self::new(
            catalog,
            config.page_size,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchSession> {
        self.state.subscribe()
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> SearchSession {
        self.state.borrow().clone()
    }

    /// Starts a new search for `text`, abandoning whatever was in flight.
    ///
    /// Returns the fetch task, or `None` when the text was rejected.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn submit(&self, text: &str, mode: SearchMode) -> Option<JoinHandle<()>> {
        let page_size = self.page_size;
        let mut request = None;
        self.state.send_if_modified(|session| {
            request = session.submit(text, mode, page_size);
            true
        });
        match request {
            Some(request) => {
                tracing::info!(
                    text = request.query.text(),
                    mode = request.query.mode().as_param(),
                    generation = request.generation,
                    "search submitted"
                );
                Some(self.dispatch(request))
            }
            None => {
                tracing::debug!("search text rejected as too short");
                None
            }
        }
    }

    /// Fetches the next page when the session is `Ready`; otherwise does
    /// nothing and returns `None`.
    ///
    /// # Panics
    ///
    /// Panics if a fetch is issued outside a Tokio runtime.
    pub fn load_more(&self) -> Option<JoinHandle<()>> {
        let mut request = None;
        self.state.send_if_modified(|session| {
            request = session.load_more();
            request.is_some()
        });
        request.map(|request| {
            tracing::debug!(page = request.query.page(), "loading next page");
            self.dispatch(request)
        })
    }

    /// Abandons the in-flight request, if any. Results are kept.
    pub fn cancel(&self) -> bool {
        let cancelled = self.state.send_if_modified(SearchSession::cancel);
        if cancelled {
            tracing::debug!("in-flight search cancelled");
        }
        cancelled
    }

    /// Returns the session to idle.
    pub fn reset(&self) {
        self.state.send_modify(SearchSession::reset);
    }

    fn dispatch(&self, request: PageRequest) -> JoinHandle<()> {
        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let window = self.request_timeout;

        tokio::spawn(async move {
            let outcome =
                match tokio::time::timeout(window, catalog.fetch_page(&request.query)).await {
                    Ok(Ok(page)) => Ok(page),
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, page = request.query.page(), "catalog fetch failed");
                        Err(SessionError::from(&e))
                    }
                    Err(_) => {
                        tracing::warn!(
                            timeout_secs = window.as_secs(),
                            page = request.query.page(),
                            "catalog fetch timed out"
                        );
                        Err(SessionError::timeout(window))
                    }
                };
            let response = PageResponse::for_request(&request, outcome);
            state.send_if_modified(|session| session.apply(response));
        })
    }
}
