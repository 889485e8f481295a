//! Steam Deck compatibility report client
//!
//! Fetches the vendor's deck compatibility category for a Steam AppID.
//! The category arrives as a numeric code under `results.resolved_category`
//! and maps through a fixed table; anything unexpected means `Unknown`.

use crate::types::DeckSupport;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DECK_REPORT_BASE_URL: &str = "https://store.steampowered.com";
const REPORT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const POOL_MAX_IDLE: usize = 20;

/// Deck compatibility client errors
#[derive(Debug, Error)]
pub enum DeckVerifiedError {
    #[error("Deck report timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, Deserialize)]
struct DeckReport {
    #[serde(default)]
    results: Option<DeckReportResults>,
}

#[derive(Debug, Clone, Deserialize)]
struct DeckReportResults {
    #[serde(default)]
    resolved_category: Option<i64>,
}

/// Deck compatibility report client
pub struct DeckVerifiedClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DeckVerifiedClient {
    pub fn new() -> Result<Self, DeckVerifiedError> {
        Self::with_base_url(DECK_REPORT_BASE_URL.to_string())
    }

    /// Client against an alternate endpoint root (tests)
    pub fn with_base_url(base_url: String) -> Result<Self, DeckVerifiedError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REPORT_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE)
            .build()
            .map_err(|e| DeckVerifiedError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, base_url })
    }

    /// Fetch the deck compatibility category for an app.
    ///
    /// A missing or unmapped category resolves to `Unknown`; the caller
    /// additionally degrades every `Err` to `Unknown`, so this lookup
    /// never removes a title from the pipeline.
    pub async fn fetch_support(&self, app_id: u32) -> Result<DeckSupport, DeckVerifiedError> {
        let url = format!("{}/saleaction/ajaxgetdeckappcompatibilityreport", self.base_url);

        tracing::debug!(app_id, "Querying deck compatibility report");

        let response = self
            .http_client
            .get(&url)
            .query(&[("nAppID", app_id)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeckVerifiedError::ApiError(status.as_u16(), body));
        }

        let report: DeckReport = response
            .json()
            .await
            .map_err(|e| DeckVerifiedError::ParseError(e.to_string()))?;

        let category = report
            .results
            .and_then(|results| results.resolved_category)
            .unwrap_or(1);

        Ok(DeckSupport::from_category(category))
    }
}

fn map_transport_error(e: reqwest::Error) -> DeckVerifiedError {
    if e.is_timeout() {
        DeckVerifiedError::Timeout
    } else {
        DeckVerifiedError::NetworkError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        assert!(DeckVerifiedClient::new().is_ok());
    }

    #[test]
    fn report_parses_nested_category() {
        let report: DeckReport = serde_json::from_str(
            r#"{"success":1,"results":{"appid":945360,"resolved_category":4,"resolved_items":[]}}"#,
        )
        .unwrap();
        assert_eq!(report.results.unwrap().resolved_category, Some(4));
    }

    #[test]
    fn report_tolerates_missing_results() {
        let report: DeckReport = serde_json::from_str(r#"{"success":1}"#).unwrap();
        let category = report
            .results
            .and_then(|results| results.resolved_category)
            .unwrap_or(1);
        assert_eq!(DeckSupport::from_category(category), DeckSupport::Unknown);
    }
}
