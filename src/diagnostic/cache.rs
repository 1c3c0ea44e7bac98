//! Memoized site self-checks.
//!
//! Results are keyed by a blake3 hash of the serialized configuration, so any
//! configuration change misses the cache. Entries expire after a fixed TTL.
//! The cache is an ordinary value owned by the host; nothing here is global.

use super::{HealthCheck, site_health};
use crate::{config::SiteConfig, source::Sources};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    stored_at: Instant,
    checks: Vec<HealthCheck>,
}

/// TTL cache of [`site_health`] results.
#[derive(Debug)]
pub struct DiagnosticsCache {
    ttl: Duration,
    entries: RwLock<FxHashMap<String, Entry>>,
}

impl DiagnosticsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Hex blake3 digest of the configuration, `None` if it cannot be serialized.
    pub fn key(config: &SiteConfig) -> Option<String> {
        let bytes = serde_json::to_vec(config).ok()?;
        Some(hex::encode(blake3::hash(&bytes).as_bytes()))
    }

    /// Cached checks for `config` while fresh, otherwise recompute and store.
    pub fn site_health(&self, config: &SiteConfig, sources: Sources<'_>) -> Vec<HealthCheck> {
        self.get_or_insert_with(config, || site_health(config, sources))
    }

    /// Cached value for `config`, computing it with `compute` on a miss.
    pub fn get_or_insert_with(
        &self,
        config: &SiteConfig,
        compute: impl FnOnce() -> Vec<HealthCheck>,
    ) -> Vec<HealthCheck> {
        let Some(key) = Self::key(config) else {
            return compute();
        };

        // Fast path: read lock only
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(&key)
                && entry.stored_at.elapsed() < self.ttl
            {
                return entry.checks.clone();
            }
        }

        let checks = compute();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                checks: checks.clone(),
            },
        );
        checks
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for DiagnosticsCache {
    /// Five minutes.
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}
