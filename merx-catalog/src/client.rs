use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authoritative price data for one product, as reported by the catalog.
///
/// The final price is always derived from base price and discount, never
/// stored, so the two can never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub sku: String,
    pub title: String,
    pub price: f64,
    pub discount_percentage: f64,
}

impl PriceRecord {
    /// Base price with the catalog discount applied.
    pub fn final_price(&self) -> f64 {
        self.price * (1.0 - self.discount_percentage / 100.0)
    }
}

/// Catalog lookup errors.
///
/// `NotFound` and `Invalid` are permanent for a given sku; `Transient`
/// covers network, timeout and 5xx-class failures and is the only variant
/// a retry policy may act on.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("product with sku '{0}' not found in catalog")]
    NotFound(String),

    #[error("catalog rejected sku '{sku}': HTTP {status}")]
    Invalid { sku: String, status: u16 },

    #[error("catalog request failed: {0}")]
    Transient(String),
}

/// Seam for fetching authoritative product data by sku.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch(&self, sku: &str) -> Result<PriceRecord, CatalogError>;
}

/// Wire format of the catalog's product endpoint.
#[derive(Debug, Deserialize)]
struct CatalogProduct {
    title: String,
    price: f64,
    #[serde(rename = "discountPercentage", default)]
    discount_percentage: f64,
}

/// HTTP client for a DummyJSON-style product catalog.
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch(&self, sku: &str) -> Result<PriceRecord, CatalogError> {
        let sku = sku.trim();
        let url = format!("{}/products/{}", self.base_url, sku);

        let response = self.http.get(&url).send().await.map_err(|e| {
            tracing::warn!(sku, error = %e, "catalog request failed");
            CatalogError::Transient(e.to_string())
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(sku.to_string()));
        }
        if status.is_server_error() {
            return Err(CatalogError::Transient(format!(
                "catalog returned HTTP {} for sku '{}'",
                status.as_u16(),
                sku
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::Invalid {
                sku: sku.to_string(),
                status: status.as_u16(),
            });
        }

        let product: CatalogProduct = response.json().await.map_err(|_| CatalogError::Invalid {
            sku: sku.to_string(),
            status: status.as_u16(),
        })?;

        Ok(PriceRecord {
            sku: sku.to_string(),
            title: product.title,
            price: product.price,
            discount_percentage: product.discount_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_price_applies_discount() {
        let record = PriceRecord {
            sku: "1".to_string(),
            title: "Widget".to_string(),
            price: 100.0,
            discount_percentage: 50.0,
        };
        assert_eq!(record.final_price(), 50.0);
    }

    #[test]
    fn zero_discount_keeps_base_price() {
        let record = PriceRecord {
            sku: "1".to_string(),
            title: "Widget".to_string(),
            price: 42.5,
            discount_percentage: 0.0,
        };
        assert_eq!(record.final_price(), 42.5);
    }

    #[test]
    fn final_price_keeps_double_precision() {
        let record = PriceRecord {
            sku: "1".to_string(),
            title: "Phone".to_string(),
            price: 999.99,
            discount_percentage: 10.0,
        };
        assert!((record.final_price() - 899.991).abs() < 1e-9);
    }

    #[test]
    fn deserializes_catalog_wire_format() {
        let json = r#"{
            "id": 1,
            "title": "Essence Mascara",
            "price": 9.99,
            "discountPercentage": 7.17,
            "stock": 5
        }"#;
        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.title, "Essence Mascara");
        assert_eq!(product.price, 9.99);
        assert_eq!(product.discount_percentage, 7.17);
    }

    #[test]
    fn discount_defaults_to_zero_when_absent() {
        let json = r#"{"title": "Plain", "price": 5.0}"#;
        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.discount_percentage, 0.0);
    }
}
