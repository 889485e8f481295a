//! udeck-compat - game compatibility metadata prefetcher
//!
//! Running the binary with no arguments fetches compatibility metadata for
//! a fixed demonstration list of titles and logs a tier / deck-support
//! distribution summary.

use anyhow::Result;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;
use udeck_compat::{CompatPrefetcher, PrefetchConfig};

const LOG_FILE_NAME: &str = "compat_fetch.log";

/// Mixed list of well-known titles exercising every pipeline outcome.
const DEMO_TITLES: [&str; 20] = [
    "Marvel's Midnight Suns",
    "Trek to Yomi",
    "Tomb Raider I-III Remastered Starring Lara Croft",
    "Splinter Cell Chaos Theory",
    "DREDGE",
    "Baldur's Gate II: Enhanced Edition",
    "Surf World Series",
    "Sine Mora EX",
    "Amnesia: The Dark Descent",
    "The Academy: The First Riddle",
    "Alex Kidd in Miracle World DX",
    "Amnesia: Rebirth",
    "20 Minutes Till Dawn",
    "Aerial_Knight's Never Yield",
    "Arcade Paradise",
    "A Plague Tale: Innocence",
    "AK-xolotl: Together",
    "Among Us",
    "Astrea Six Sided Oracles",
    "Behind the Frame: The Finest Scenery",
];

#[tokio::main]
async fn main() -> Result<()> {
    let config = PrefetchConfig::default();
    std::fs::create_dir_all(&config.data_dir)?;
    udeck_common::logging::init(Some(&config.data_dir.join(LOG_FILE_NAME)))?;

    info!("Starting udeck-compat prefetch");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Cache file: {}", config.cache_path().display());

    let titles: Vec<String> = DEMO_TITLES.iter().map(|title| title.to_string()).collect();

    let start = Instant::now();
    let prefetcher = CompatPrefetcher::new(&config)?;
    let cache = prefetcher.prefetch(&titles).await;
    let elapsed = start.elapsed();

    info!("Total time: {:.1}s", elapsed.as_secs_f64());
    info!("Total cached: {} games", cache.len());

    let mut tier_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut deck_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in cache.values() {
        let tier = record.tier.map(|t| t.as_str()).unwrap_or("none");
        *tier_counts.entry(tier).or_default() += 1;
        *deck_counts.entry(record.deck_verified.as_str()).or_default() += 1;
    }

    info!("ProtonDB tiers:");
    for (tier, count) in &tier_counts {
        info!("  {}: {}", tier, count);
    }

    info!("Steam Deck status:");
    for (status, count) in &deck_counts {
        info!("  {}: {}", status, count);
    }

    Ok(())
}
