//! "Load more" pagination over the dubbed listing
//!
//! [`LoadMore`] keeps the dramas shown so far and fetches the next page on
//! demand from a [`PageSource`]: either a [`Library`] directly or the local
//! `/api/dramas` endpoint through [`HttpPageSource`].

use crate::http_client::ApiError;
use crate::library::Library;
use crate::model::Drama;
use crate::request_state::RequestState;
use crate::upstream::Catalog;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Classification used when none is given
pub const DEFAULT_CLASSIFY: &str = "terbaru";

/// A page shorter than this is the last one
pub const PAGE_SIZE: usize = 20;

/// Anything that can deliver one page of the dubbed listing.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, classify: &str, page: u32) -> Result<Vec<Drama>, ApiError>;
}

#[async_trait]
impl<C> PageSource for Library<C>
where
    C: Catalog,
{
    async fn fetch_page(&self, classify: &str, page: u32) -> Result<Vec<Drama>, ApiError> {
        Ok(self.dubbed(Some(classify), Some(page)).await)
    }
}

/// Fetches pages from a running server's `/api/dramas` endpoint.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpPageSource {
    /// `server_url` is the server root, e.g. `http://127.0.0.1:3000`. Each
    /// page request is bounded by `timeout`.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/api/dramas", server_url.trim_end_matches('/')),
            timeout,
        })
    }

    fn request_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Network(e)
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, classify: &str, page: u32) -> Result<Vec<Drama>, ApiError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("classify", classify.to_string()), ("page", page.to_string())])
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// State of one "load more" list.
#[derive(Debug, Clone)]
pub struct LoadMore {
    dramas: Vec<Drama>,
    page: u32,
    classify: String,
    has_more: bool,
    state: RequestState<usize>,
}

impl LoadMore {
    /// Starts from an already loaded first page.
    pub fn new(initial: Vec<Drama>, initial_page: u32, classify: Option<&str>) -> Self {
        Self {
            dramas: initial,
            page: initial_page,
            classify: classify.unwrap_or(DEFAULT_CLASSIFY).to_string(),
            has_more: true,
            state: RequestState::Idle,
        }
    }

    pub fn dramas(&self) -> &[Drama] {
        &self.dramas
    }

    /// Last page that was loaded.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn classify(&self) -> &str {
        &self.classify
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Outcome of the last request; `Ready(n)` holds the number of dramas
    /// appended.
    pub fn state(&self) -> &RequestState<usize> {
        &self.state
    }

    /// Marks a request as in flight and returns the page to fetch.
    ///
    /// Returns `None` while another request is in flight or when the list is
    /// exhausted.
    pub fn begin(&mut self) -> Option<u32> {
        if self.state.is_loading() || !self.has_more {
            return None;
        }

        self.state = RequestState::Loading;
        Some(self.page + 1)
    }

    /// Applies the outcome of the request started by [`LoadMore::begin`];
    /// returns how many dramas were appended.
    pub fn finish(&mut self, outcome: RequestState<Vec<Drama>>) -> usize {
        if let Some(message) = outcome.error() {
            warn!(error = %message, page = self.page + 1, "failed to load more dramas");
            self.has_more = false;
        }

        if let Some(batch) = outcome.data() {
            // an empty page is short too
            if batch.len() < PAGE_SIZE {
                self.has_more = false;
            }
            if !batch.is_empty() {
                self.page += 1;
            }
        }

        let dramas = &mut self.dramas;
        self.state = outcome.map(|batch| {
            let added = batch.len();
            dramas.extend(batch);
            added
        });

        self.state.data().copied().unwrap_or(0)
    }

    /// Fetches and appends the next page; returns how many dramas were added.
    pub async fn load_more<S>(&mut self, source: &S) -> usize
    where
        S: PageSource + ?Sized,
    {
        let Some(page) = self.begin() else {
            return 0;
        };

        debug!(classify = %self.classify, page, "loading more dramas");
        let outcome = RequestState::resolve(source.fetch_page(&self.classify, page)).await;
        self.finish(outcome)
    }
}
