use crate::client::{CatalogClient, CatalogError, PriceRecord};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Time source for staleness checks, injectable so expiry is testable
/// without real sleeps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_millis(300_000),
        }
    }
}

#[derive(Clone)]
struct CacheEntry {
    record: PriceRecord,
    fetched_at: Instant,
}

/// TTL-bounded price cache in front of the catalog.
///
/// Entries are keyed by the trimmed sku. Lookups for different keys never
/// block each other; concurrent misses on the same key may each fetch
/// upstream (no single-flight), which is harmless because the catalog is
/// read-only from our side. A failed fetch never touches the stored entry.
pub struct PriceCache {
    entries: DashMap<String, CacheEntry>,
    config: CacheConfig,
    client: Arc<dyn CatalogClient>,
    clock: Arc<dyn Clock>,
}

impl PriceCache {
    pub fn new(client: Arc<dyn CatalogClient>, config: CacheConfig) -> Self {
        Self::with_clock(client, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        client: Arc<dyn CatalogClient>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            client,
            clock,
        }
    }

    /// Resolve a sku to its authoritative price record, hitting the catalog
    /// only on miss or expiry.
    pub async fn resolve(&self, sku: &str) -> Result<PriceRecord, CatalogError> {
        if !self.config.enabled {
            return self.client.fetch(sku).await;
        }

        let key = sku.trim().to_string();
        let now = self.clock.now();

        // The map guard must be released before awaiting the upstream call.
        let fresh = self.entries.get(&key).and_then(|entry| {
            if now.duration_since(entry.fetched_at) <= self.config.ttl {
                Some(entry.record.clone())
            } else {
                None
            }
        });
        if let Some(record) = fresh {
            tracing::debug!(sku = %key, "price cache hit");
            return Ok(record);
        }

        let record = self.client.fetch(&key).await?;
        tracing::debug!(sku = %key, price = record.price, "price cache refreshed");
        self.entries.insert(
            key,
            CacheEntry {
                record: record.clone(),
                fetched_at: self.clock.now(),
            },
        );
        Ok(record)
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.clear();
        tracing::info!("price cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
