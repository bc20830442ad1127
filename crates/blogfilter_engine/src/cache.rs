use std::sync::Arc;

use filter_logging::{filter_debug, filter_warn};
use serde::{Deserialize, Serialize};

use crate::types::first_seen_tags;
use crate::{Article, StorageBackend, StorageError};

pub const MS_PER_DAY: i64 = 86_400_000;

/// How aggressively the index is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Rebuild on every run.
    Disabled,
    /// One atomic write after the full index completes.
    #[default]
    TimeBoxed,
    /// Additionally write the accumulated snapshot after each successful
    /// fetch. Redundant writes are idempotent.
    IncrementalWrite,
}

/// Persisted payload. `written_at_ms` drives the expiry window.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    written_at_ms: i64,
    articles: Vec<Article>,
}

/// Versioned, time-boxed cache of the aggregated article index plus a flat
/// tag list. Bumping the version suffix orphans old entries, which is how a
/// markup or schema change forces a global rebuild.
pub struct TagCache {
    storage: Arc<dyn StorageBackend>,
    articles_key: String,
    tags_key: String,
    max_age_days: i64,
}

impl TagCache {
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        key_base: &str,
        version: &str,
        max_age_days: i64,
    ) -> Self {
        Self {
            storage,
            articles_key: format!("{key_base}.{version}"),
            tags_key: format!("{key_base}_tags.{version}"),
            max_age_days,
        }
    }

    /// Entry age in whole days must not exceed the expiry window; anything
    /// older, missing, or corrupt reads as absent.
    pub fn load(&self, now_ms: i64) -> Option<Vec<Article>> {
        let raw = self.storage.get(&self.articles_key)?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                filter_warn!("Corrupt cache entry under {}: {err}", self.articles_key);
                return None;
            }
        };

        let age_ms = now_ms.saturating_sub(entry.written_at_ms);
        if age_ms > self.max_age_days.saturating_mul(MS_PER_DAY) {
            filter_debug!(
                "Cache entry under {} expired ({} days max)",
                self.articles_key,
                self.max_age_days
            );
            return None;
        }
        Some(entry.articles)
    }

    /// Whole-sale overwrite of both keys. Safe to call repeatedly with the
    /// same data.
    pub fn save(&self, articles: &[Article], now_ms: i64) -> Result<(), StorageError> {
        let entry = CacheEntry {
            written_at_ms: now_ms,
            articles: articles.to_vec(),
        };
        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(err) => {
                filter_warn!("Failed to serialize cache entry: {err}");
                return Ok(());
            }
        };
        self.storage.set(&self.articles_key, &payload)?;

        let tags = first_seen_tags(articles);
        let tags_payload = match serde_json::to_string(&tags) {
            Ok(payload) => payload,
            Err(err) => {
                filter_warn!("Failed to serialize tag list: {err}");
                return Ok(());
            }
        };
        self.storage.set(&self.tags_key, &tags_payload)?;
        Ok(())
    }

    /// The flat tag list, readable without the expiry check so a filter bar
    /// can render while a rebuild runs. Corrupt or missing reads as empty.
    pub fn load_tags(&self) -> Vec<String> {
        let Some(raw) = self.storage.get(&self.tags_key) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            filter_warn!("Corrupt tag list under {}: {err}", self.tags_key);
            Vec::new()
        })
    }
}
