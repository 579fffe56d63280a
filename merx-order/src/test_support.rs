//! Shared test doubles for the service and workflow tests.

use crate::models::{Order, OrderStatus};
use crate::repository::{OrderStore, StoreError};
use async_trait::async_trait;
use merx_catalog::{CacheConfig, CatalogClient, CatalogError, PriceCache, PriceRecord, PriceResolver};
use merx_core::{SettlementClient, SettlementError, SettlementRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Order store backed by a plain mutexed map.
#[derive(Default)]
pub struct MemoryStore {
    orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, order: &Order) -> Result<(), StoreError> {
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.orders.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .values()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect())
    }
}

/// Catalog stub serving a fixed product table.
pub struct StaticCatalog {
    products: HashMap<String, PriceRecord>,
}

impl StaticCatalog {
    pub fn new(products: Vec<(&str, f64, f64)>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|(sku, price, discount)| {
                    (
                        sku.to_string(),
                        PriceRecord {
                            sku: sku.to_string(),
                            title: format!("product-{sku}"),
                            price,
                            discount_percentage: discount,
                        },
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn fetch(&self, sku: &str) -> Result<PriceRecord, CatalogError> {
        self.products
            .get(sku.trim())
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(sku.to_string()))
    }
}

pub fn resolver_for(products: Vec<(&str, f64, f64)>) -> Arc<PriceResolver> {
    let cache = PriceCache::new(
        Arc::new(StaticCatalog::new(products)),
        CacheConfig {
            enabled: true,
            ttl: Duration::from_secs(300),
        },
    );
    Arc::new(PriceResolver::new(Arc::new(cache)))
}

/// Settlement double that fails a configurable number of leading attempts
/// and records every URL it was invoked with.
pub struct MockSettlement {
    fail_first: usize,
    calls: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
}

impl MockSettlement {
    pub fn succeeding() -> Self {
        Self::failing_first(0)
    }

    pub fn always_failing() -> Self {
        Self::failing_first(usize::MAX)
    }

    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettlementClient for MockSettlement {
    async fn settle(&self, url: &str, _request: &SettlementRequest) -> Result<(), SettlementError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if call < self.fail_first {
            Err(SettlementError::Status(500))
        } else {
            Ok(())
        }
    }
}
