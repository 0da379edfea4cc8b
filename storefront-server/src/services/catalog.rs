//! Catalog client - remote product lookup
//!
//! The storefront does not own product data; prices and names are fetched
//! from the catalog service at add-to-cart time and snapshotted into the
//! cart line. Behind [`CatalogApi`] there are two implementations:
//! [`HttpCatalog`] for production and [`InMemoryCatalog`] for tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Types
// =============================================================================

/// Product as served by the catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
}

/// Catalog lookup errors
///
/// "Product does not exist" is not an error; lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog returned a malformed response: {0}")]
    Malformed(String),
}

/// Product lookup abstraction
#[async_trait]
pub trait CatalogApi: Send + Sync + std::fmt::Debug {
    /// Fetch a product by id; `Ok(None)` when the catalog does not know it
    async fn get_product(&self, product_id: &str) -> Result<Option<CatalogProduct>, CatalogError>;
}

// =============================================================================
// HttpCatalog
// =============================================================================

/// HTTP client for the catalog service
///
/// Looks up `GET {base_url}/api/products/{id}` with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn product_url(&self, product_id: &str) -> String {
        format!("{}/api/products/{}", self.base_url, product_id)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn get_product(&self, product_id: &str) -> Result<Option<CatalogProduct>, CatalogError> {
        let url = self.product_url(product_id);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("Request to catalog failed: {}", e)))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            tracing::warn!(
                product_id = %product_id,
                status = %status,
                "Catalog lookup returned non-success status"
            );
            return Err(CatalogError::Unavailable(format!(
                "Catalog returned HTTP {}",
                status
            )));
        }

        let product: CatalogProduct = resp
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        Ok(Some(product))
    }
}

// =============================================================================
// InMemoryCatalog
// =============================================================================

/// In-process catalog for tests
///
/// Products are seeded with [`insert`]; [`set_unavailable`] makes every
/// lookup fail the way a dead upstream would.
///
/// [`insert`]: InMemoryCatalog::insert
/// [`set_unavailable`]: InMemoryCatalog::set_unavailable
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<String, CatalogProduct>>,
    unavailable: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: CatalogProduct) {
        self.products.write().insert(product.id.clone(), product);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn get_product(&self, product_id: &str) -> Result<Option<CatalogProduct>, CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "Catalog is marked unavailable".to_string(),
            ));
        }
        Ok(self.products.read().get(product_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> CatalogProduct {
        CatalogProduct {
            id: "P100".to_string(),
            name: "Linen Shirt".to_string(),
            image: "/images/p100.jpg".to_string(),
            price: 49.9,
        }
    }

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(sample_product());

        let found = catalog.get_product("P100").await.unwrap();
        assert_eq!(found.unwrap().name, "Linen Shirt");

        let missing = catalog.get_product("P999").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_in_memory_unavailable() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(sample_product());
        catalog.set_unavailable(true);

        match catalog.get_product("P100").await {
            Err(CatalogError::Unavailable(_)) => {}
            other => panic!("Expected Unavailable, got {:?}", other),
        }

        catalog.set_unavailable(false);
        assert!(catalog.get_product("P100").await.unwrap().is_some());
    }

    #[test]
    fn test_product_url_formatting() {
        let catalog = HttpCatalog::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            catalog.product_url("P100"),
            "http://localhost:9000/api/products/P100"
        );
    }

    #[test]
    fn test_missing_image_defaults_empty() {
        let product: CatalogProduct =
            serde_json::from_str(r#"{"id":"P1","name":"Socks","price":5.0}"#).unwrap();
        assert_eq!(product.image, "");
    }
}
