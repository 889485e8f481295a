//! udeck-compat library interface
//!
//! Exposes the compatibility pipeline for integration testing and for
//! embedding in the surrounding application.

pub mod cache;
pub mod services;
pub mod types;

pub use cache::{CacheStore, CompatStore};
pub use services::compat_prefetcher::{CompatPrefetcher, PrefetchConfig};
pub use types::{normalize_title, CompatCache, CompatRecord, DeckSupport, Tier};
