//! ProtonDB tier lookup client
//!
//! Fetches the community-aggregated compatibility tier for a Steam AppID.
//! A missing report is the normal outcome for unrated titles, not an
//! error.

use crate::types::Tier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const PROTONDB_BASE_URL: &str = "https://www.protondb.com/api/v1";
/// ProtonDB can be slow to answer; the tier lookup gets the long timeout.
const TIER_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const POOL_MAX_IDLE: usize = 20;

/// ProtonDB client errors
#[derive(Debug, Error)]
pub enum ProtonDbError {
    #[error("Tier lookup timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Tier summary response body (relevant fields only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TierSummary {
    pub tier: Option<String>,
}

/// ProtonDB API client
pub struct ProtonDbClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProtonDbClient {
    pub fn new() -> Result<Self, ProtonDbError> {
        Self::with_base_url(PROTONDB_BASE_URL.to_string())
    }

    /// Client against an alternate endpoint root (tests)
    pub fn with_base_url(base_url: String) -> Result<Self, ProtonDbError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIER_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE)
            .build()
            .map_err(|e| ProtonDbError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, base_url })
    }

    /// Fetch the tier for an app.
    ///
    /// `Ok(None)` covers both "not rated" (HTTP 404) and a reported tier
    /// value outside the recognized set.
    pub async fn fetch_tier(&self, app_id: u32) -> Result<Option<Tier>, ProtonDbError> {
        let url = format!("{}/reports/summaries/{}.json", self.base_url, app_id);

        tracing::debug!(app_id, url = %url, "Querying ProtonDB");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            // Normal: title not in ProtonDB.
            tracing::debug!(app_id, "No ProtonDB report");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProtonDbError::ApiError(status.as_u16(), body));
        }

        let summary: TierSummary = response
            .json()
            .await
            .map_err(|e| ProtonDbError::ParseError(e.to_string()))?;

        match summary.tier.as_deref() {
            Some(raw) => match Tier::parse(raw) {
                Some(tier) => Ok(Some(tier)),
                None => {
                    tracing::debug!(app_id, tier = %raw, "Unrecognized tier value");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> ProtonDbError {
    if e.is_timeout() {
        ProtonDbError::Timeout
    } else {
        ProtonDbError::NetworkError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        assert!(ProtonDbClient::new().is_ok());
    }

    #[test]
    fn summary_parses_with_extra_fields() {
        let summary: TierSummary = serde_json::from_str(
            r#"{"bestReportedTier":"platinum","confidence":"strong","score":0.88,"tier":"gold","total":4123,"trendingTier":"gold"}"#,
        )
        .unwrap();
        assert_eq!(summary.tier.as_deref(), Some("gold"));
    }

    #[test]
    fn summary_tolerates_missing_tier() {
        let summary: TierSummary = serde_json::from_str(r#"{"total":0}"#).unwrap();
        assert_eq!(summary.tier, None);
    }
}
