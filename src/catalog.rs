//! Product catalog: optional Postgres store in front of the embedded dataset.
//!
//! Store calls go through a circuit breaker. A store error or an open circuit
//! answers from the embedded dataset, so readers always get the same product
//! shape whichever source served them. A store that answers but has no row
//! for an id is a genuine not-found.

use crate::circuit_breaker::{create_store_circuit_breaker, StoreCircuitBreaker};
use crate::errors::AppError;
use crate::models::{Product, ProductFilters};
use crate::product_store::ProductStore;
use failsafe::futures::CircuitBreaker;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Where the catalog reads products from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Store,
    Embedded,
}

#[derive(Clone)]
pub struct ProductCatalog {
    store: Option<Arc<dyn ProductStore>>,
    embedded: Arc<Vec<Product>>,
    breaker: StoreCircuitBreaker,
}

impl ProductCatalog {
    /// Catalog that only serves the embedded dataset.
    pub fn embedded(products: Vec<Product>) -> Self {
        Self::new(None, products)
    }

    pub fn new(store: Option<Arc<dyn ProductStore>>, embedded: Vec<Product>) -> Self {
        Self {
            store,
            embedded: Arc::new(sort_by_apr(embedded)),
            breaker: create_store_circuit_breaker(),
        }
    }

    pub fn source(&self) -> CatalogSource {
        if self.store.is_some() {
            CatalogSource::Store
        } else {
            CatalogSource::Embedded
        }
    }

    /// Looks up one product by id.
    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        if let Some(store) = &self.store {
            match self.breaker.call(store.fetch_product(id)).await {
                Ok(found) => return Ok(found),
                Err(failsafe::Error::Inner(e)) => {
                    tracing::warn!(
                        "Product store lookup for {} failed, using embedded catalog: {}",
                        id,
                        e
                    );
                }
                Err(failsafe::Error::Rejected) => {
                    tracing::warn!(
                        "Product store circuit open, using embedded catalog for {}",
                        id
                    );
                }
            }
        }

        Ok(self.embedded.iter().find(|p| p.id == id).cloned())
    }

    /// Lists products matching `filters`, ascending by APR.
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, AppError> {
        let products = self.all_products().await;
        Ok(products
            .into_iter()
            .filter(|product| filters.matches(product))
            .collect())
    }

    async fn all_products(&self) -> Vec<Product> {
        if let Some(store) = &self.store {
            match self.breaker.call(store.fetch_products()).await {
                Ok(products) => return sort_by_apr(products),
                Err(failsafe::Error::Inner(e)) => {
                    tracing::warn!(
                        "Product store listing failed, using embedded catalog: {}",
                        e
                    );
                }
                Err(failsafe::Error::Rejected) => {
                    tracing::warn!("Product store circuit open, using embedded catalog");
                }
            }
        }

        self.embedded.as_ref().clone()
    }
}

fn sort_by_apr(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| {
        a.rate_apr
            .partial_cmp(&b.rate_apr)
            .unwrap_or(Ordering::Equal)
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::load_seed_products;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct FailingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProductStore for FailingStore {
        async fn fetch_product(&self, _id: Uuid) -> Result<Option<Product>, AppError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Err(AppError::InternalError("connection refused".to_string()))
        }

        async fn fetch_products(&self) -> Result<Vec<Product>, AppError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Err(AppError::InternalError("connection refused".to_string()))
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl ProductStore for EmptyStore {
        async fn fetch_product(&self, _id: Uuid) -> Result<Option<Product>, AppError> {
            Ok(None)
        }

        async fn fetch_products(&self) -> Result<Vec<Product>, AppError> {
            Ok(vec![])
        }
    }

    fn hdfc_id() -> Uuid {
        Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap()
    }

    #[tokio::test]
    async fn test_embedded_listing_is_sorted_by_apr() {
        let catalog = ProductCatalog::embedded(load_seed_products().unwrap());
        assert_eq!(catalog.source(), CatalogSource::Embedded);

        let products = catalog
            .list_products(&ProductFilters::default())
            .await
            .unwrap();
        assert_eq!(products.len(), 15);
        assert!(products
            .windows(2)
            .all(|pair| pair[0].rate_apr <= pair[1].rate_apr));
    }

    #[tokio::test]
    async fn test_filters_are_applied() {
        let catalog = ProductCatalog::embedded(load_seed_products().unwrap());
        let filters = ProductFilters {
            loan_type: Some("home".to_string()),
            max_apr: Some(8.5),
            ..Default::default()
        };

        let products = catalog.list_products(&filters).await.unwrap();
        assert!(!products.is_empty());
        assert!(products
            .iter()
            .all(|p| p.loan_type.as_str() == "home" && p.rate_apr <= 8.5));
    }

    #[tokio::test]
    async fn test_store_failure_falls_back_to_embedded() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
        });
        let catalog = ProductCatalog::new(
            Some(store.clone() as Arc<dyn ProductStore>),
            load_seed_products().unwrap(),
        );

        let product = catalog.get_product(hdfc_id()).await.unwrap().unwrap();
        assert_eq!(product.name, "HDFC Personal Loan Express");

        let listed = catalog
            .list_products(&ProductFilters::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 15);
    }

    #[tokio::test]
    async fn test_open_circuit_skips_the_store() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
        });
        let catalog = ProductCatalog::new(
            Some(store.clone() as Arc<dyn ProductStore>),
            load_seed_products().unwrap(),
        );

        for _ in 0..8 {
            assert!(catalog.get_product(hdfc_id()).await.unwrap().is_some());
        }
        assert_eq!(store.calls.load(AtomicOrdering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_reachable_store_without_row_is_not_found() {
        let catalog = ProductCatalog::new(
            Some(Arc::new(EmptyStore) as Arc<dyn ProductStore>),
            load_seed_products().unwrap(),
        );
        assert_eq!(catalog.source(), CatalogSource::Store);
        assert!(catalog.get_product(hdfc_id()).await.unwrap().is_none());
    }
}
