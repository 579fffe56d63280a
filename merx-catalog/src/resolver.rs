use crate::cache::PriceCache;
use crate::client::PriceRecord;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid skus found: {}", .0.join(", "))]
    InvalidSkus(Vec<String>),
}

/// Resolves a batch of skus against the price cache, all-or-nothing.
///
/// Every sku is attempted even after a failure so the caller gets the
/// complete list of offenders in one pass, in request order.
pub struct PriceResolver {
    cache: Arc<PriceCache>,
}

impl PriceResolver {
    pub fn new(cache: Arc<PriceCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub async fn resolve_all(
        &self,
        skus: &[String],
    ) -> Result<HashMap<String, PriceRecord>, ResolveError> {
        let mut resolved = HashMap::new();
        let mut invalid = Vec::new();

        for sku in skus {
            match self.cache.resolve(sku).await {
                Ok(record) => {
                    tracing::debug!(sku = %sku, title = %record.title, "sku resolved");
                    resolved.insert(sku.clone(), record);
                }
                Err(e) => {
                    tracing::warn!(sku = %sku, error = %e, "sku failed validation");
                    invalid.push(sku.clone());
                }
            }
        }

        if !invalid.is_empty() {
            return Err(ResolveError::InvalidSkus(invalid));
        }
        Ok(resolved)
    }
}
