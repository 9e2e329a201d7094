//! HTTP client for the museum's current-exhibitions feed.

use exhibit_core::catalog::{FeedError, ListingsSource};
use exhibit_core::listing::RawListing;
use serde::Deserialize;
use tracing::debug;

/// Body of the listings endpoint. Only `results` is read.
#[derive(Debug, Deserialize)]
struct ListingsResponse {
    results: Vec<RawListing>,
}

/// Fetches raw listings with a single GET; no retry, no pagination.
#[derive(Debug, Clone)]
pub struct MetFeed {
    url: String,
    http: reqwest::Client,
}

impl MetFeed {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            http: reqwest::Client::new(),
        }
    }
}

impl ListingsSource for MetFeed {
    async fn fetch(&self) -> Result<Vec<RawListing>, FeedError> {
        debug!(url = %self.url, "fetching exhibit listings");

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| FeedError::Request(e.to_string()))?;

        let body: ListingsResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))?;

        Ok(body.results)
    }
}
