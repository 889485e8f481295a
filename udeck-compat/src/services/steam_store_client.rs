//! Steam storefront search client
//!
//! Resolves free-text game titles to Steam AppIDs via the store search
//! endpoint. Matching prefers an exact case-insensitive title hit and
//! otherwise falls back to the first candidate, accepting lower-confidence
//! matches rather than failing the pipeline.

use crate::types::normalize_title;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const STEAM_STORE_BASE_URL: &str = "https://store.steampowered.com";
/// Store search is constrained to a fixed market region.
const STORE_REGION: &str = "US";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Browser-style UA; the store endpoints reject unadorned clients.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
/// Idle connections kept per host, a small multiple of the default
/// prefetch batch size.
const POOL_MAX_IDLE: usize = 20;

/// Steam store client errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store search timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Store search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSearchResponse {
    #[serde(default)]
    pub items: Vec<StoreSearchItem>,
}

/// One store search candidate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSearchItem {
    pub id: u32,
    pub name: String,
}

/// A resolved title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMatch {
    pub app_id: u32,
    /// Canonical name as listed by the store
    pub name: String,
}

/// Steam storefront search client
pub struct SteamStoreClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SteamStoreClient {
    pub fn new() -> Result<Self, StoreError> {
        Self::with_base_url(STEAM_STORE_BASE_URL.to_string())
    }

    /// Client against an alternate endpoint root (tests)
    pub fn with_base_url(base_url: String) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(SEARCH_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE)
            .build()
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, base_url })
    }

    /// Search the store for a title.
    ///
    /// `Ok(None)` means the search returned no candidates; the caller
    /// treats that the same way as any search failure.
    pub async fn search_app(&self, title: &str) -> Result<Option<AppMatch>, StoreError> {
        let url = format!("{}/api/storesearch/", self.base_url);

        tracing::debug!(title = %title, "Searching Steam store");

        let response = self
            .http_client
            .get(&url)
            .query(&[("term", title), ("cc", STORE_REGION)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiError(status.as_u16(), body));
        }

        let search: StoreSearchResponse = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))?;

        Ok(select_candidate(&search.items, title).map(|item| AppMatch {
            app_id: item.id,
            name: item.name.clone(),
        }))
    }
}

fn map_transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::NetworkError(e.to_string())
    }
}

/// Pick the best candidate: the first exact case-insensitive title match,
/// otherwise the first result.
fn select_candidate<'a>(items: &'a [StoreSearchItem], title: &str) -> Option<&'a StoreSearchItem> {
    let normalized = normalize_title(title);
    items
        .iter()
        .find(|item| normalize_title(&item.name) == normalized)
        .or_else(|| items.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, name: &str) -> StoreSearchItem {
        StoreSearchItem { id, name: name.to_string() }
    }

    #[test]
    fn client_creation() {
        assert!(SteamStoreClient::new().is_ok());
    }

    #[test]
    fn exact_match_preferred_over_first_result() {
        let items = vec![item(1, "Among Us 3D"), item(945360, "Among Us")];
        let selected = select_candidate(&items, "among us").unwrap();
        assert_eq!(selected.id, 945360);
    }

    #[test]
    fn exact_match_is_case_insensitive_and_trimmed() {
        let items = vec![item(1, "Other"), item(2, "  DREDGE ")];
        let selected = select_candidate(&items, "dredge").unwrap();
        assert_eq!(selected.id, 2);
    }

    #[test]
    fn falls_back_to_first_result() {
        let items = vec![item(7, "Among Us 3D"), item(8, "Among Them")];
        let selected = select_candidate(&items, "among us").unwrap();
        assert_eq!(selected.id, 7);
    }

    #[test]
    fn no_candidates_yields_none() {
        assert!(select_candidate(&[], "among us").is_none());
    }
}
