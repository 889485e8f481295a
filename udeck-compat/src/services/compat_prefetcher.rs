//! Compatibility prefetch orchestrator
//!
//! Fans a title list out through the three lookup services in fixed-size
//! concurrent batches, merging results into the on-disk cache after every
//! batch so partial progress survives a crash or interruption. Individual
//! lookup failures degrade to absent/unknown fields; one title's failure
//! never aborts the batch or the run.

use crate::cache::{CacheStore, CompatStore};
use crate::services::deck_verified_client::{DeckVerifiedClient, DeckVerifiedError};
use crate::services::protondb_client::{ProtonDbClient, ProtonDbError};
use crate::services::steam_store_client::SteamStoreClient;
use crate::types::{normalize_title, CompatCache, CompatRecord, DeckSupport};
use chrono::Utc;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const CACHE_FILE_NAME: &str = "compat_cache.json";
const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_millis(50);

/// Orchestrator configuration.
///
/// Paths are explicit so test runs stay isolated from the real user data
/// directory.
#[derive(Debug, Clone)]
pub struct PrefetchConfig {
    /// Directory holding the cache file (and the process log file)
    pub data_dir: PathBuf,
    /// Titles fetched concurrently per batch
    pub batch_size: usize,
    /// Fixed pause between batches
    pub inter_batch_delay: Duration,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            data_dir: udeck_common::config::resolve_data_dir(None),
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
        }
    }
}

impl PrefetchConfig {
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE_NAME)
    }
}

/// Batched compatibility prefetcher
pub struct CompatPrefetcher {
    store: Arc<dyn CompatStore>,
    steam_store: Arc<SteamStoreClient>,
    protondb: Arc<ProtonDbClient>,
    deck_verified: Arc<DeckVerifiedClient>,
    batch_size: usize,
    inter_batch_delay: Duration,
}

impl CompatPrefetcher {
    /// Prefetcher against the real endpoints and the file-backed cache
    pub fn new(config: &PrefetchConfig) -> udeck_common::Result<Self> {
        let steam_store = SteamStoreClient::new().map_err(internal)?;
        let protondb = ProtonDbClient::new().map_err(internal)?;
        let deck_verified = DeckVerifiedClient::new().map_err(internal)?;

        Ok(Self::with_parts(
            Arc::new(CacheStore::new(config.cache_path())),
            steam_store,
            protondb,
            deck_verified,
            config,
        ))
    }

    /// Wire arbitrary parts; tests point the clients at local endpoints
    /// and substitute in-memory stores.
    pub fn with_parts(
        store: Arc<dyn CompatStore>,
        steam_store: SteamStoreClient,
        protondb: ProtonDbClient,
        deck_verified: DeckVerifiedClient,
        config: &PrefetchConfig,
    ) -> Self {
        Self {
            store,
            steam_store: Arc::new(steam_store),
            protondb: Arc::new(protondb),
            deck_verified: Arc::new(deck_verified),
            batch_size: config.batch_size.max(1),
            inter_batch_delay: config.inter_batch_delay,
        }
    }

    /// Prefetch compatibility metadata for every title not already cached.
    ///
    /// Returns the merged cache. Titles whose pipeline fails outright are
    /// left out of the cache and picked up again on a future run.
    pub async fn prefetch(&self, titles: &[String]) -> CompatCache {
        info!(titles = titles.len(), "Prefetching compatibility metadata");

        let mut cache = self.store.load();

        let pending: Vec<String> = titles
            .iter()
            .filter(|title| !cache.contains_key(&normalize_title(title)))
            .cloned()
            .collect();

        info!(cached = cache.len(), to_fetch = pending.len(), "Cache filter applied");

        if pending.is_empty() {
            return cache;
        }

        let total = pending.len();
        let mut processed = 0usize;
        let mut rated = 0usize;

        let batches: Vec<&[String]> = pending.chunks(self.batch_size).collect();
        let batch_count = batches.len();

        for (batch_index, batch) in batches.into_iter().enumerate() {
            // One task per title; the whole batch is started together and
            // completes only when its slowest member does.
            let handles: Vec<_> = batch
                .iter()
                .map(|title| {
                    let steam_store = Arc::clone(&self.steam_store);
                    let protondb = Arc::clone(&self.protondb);
                    let deck_verified = Arc::clone(&self.deck_verified);
                    let title = title.clone();
                    tokio::spawn(async move {
                        fetch_title(&steam_store, &protondb, &deck_verified, &title).await
                    })
                })
                .collect();

            for result in join_all(handles).await {
                match result {
                    Ok((key, record)) => {
                        if record.has_rating() {
                            rated += 1;
                        }
                        processed += 1;
                        cache.insert(key, record);

                        if processed % 50 == 0 || processed == total {
                            info!(
                                progress = format!("{}/{}", processed, total),
                                rated,
                                "Prefetch progress"
                            );
                        }
                    }
                    Err(e) => {
                        // Title left uncached; a later run retries it.
                        error!(error = %e, "Title pipeline failed, skipping");
                    }
                }
            }

            self.store.save(&cache);

            if batch_index + 1 < batch_count {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
        }

        info!(fetched = total, rated, "Prefetch complete");
        cache
    }
}

fn internal<E: std::fmt::Display>(e: E) -> udeck_common::Error {
    udeck_common::Error::Internal(e.to_string())
}

/// Full pipeline for one title: store search, then the two rating lookups
/// in parallel. Always produces a record; each lookup degrades on its own.
async fn fetch_title(
    steam_store: &SteamStoreClient,
    protondb: &ProtonDbClient,
    deck_verified: &DeckVerifiedClient,
    title: &str,
) -> (String, CompatRecord) {
    let normalized = normalize_title(title);

    let resolved = match steam_store.search_app(title).await {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(title = %title, error = %e, "Steam store search failed");
            None
        }
    };

    let Some(app) = resolved else {
        // Normal terminal outcome: no identifier, no downstream lookups.
        return (normalized, CompatRecord::unresolved(Utc::now().timestamp()));
    };

    let (tier, deck) = tokio::join!(
        protondb.fetch_tier(app.app_id),
        deck_verified.fetch_support(app.app_id)
    );

    let tier = match tier {
        Ok(tier) => tier,
        Err(ProtonDbError::Timeout) => {
            warn!(app_id = app.app_id, "ProtonDB timeout");
            None
        }
        Err(e) => {
            debug!(app_id = app.app_id, error = %e, "ProtonDB lookup failed");
            None
        }
    };

    let deck = match deck {
        Ok(deck) => deck,
        Err(DeckVerifiedError::Timeout) => {
            warn!(app_id = app.app_id, "Deck report timeout");
            DeckSupport::Unknown
        }
        Err(e) => {
            debug!(app_id = app.app_id, error = %e, "Deck report lookup failed");
            DeckSupport::Unknown
        }
    };

    info!(
        title = %title,
        app_id = app.app_id,
        tier = tier.map(|t| t.as_str()).unwrap_or("none"),
        deck = deck.as_str(),
        "Compatibility resolved"
    );

    (
        normalized,
        CompatRecord {
            tier,
            deck_verified: deck,
            steam_app_id: Some(app.app_id),
            timestamp: Utc::now().timestamp(),
        },
    )
}
