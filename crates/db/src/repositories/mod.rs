use async_trait::async_trait;
use thiserror::Error;

use atelier_core::domain::product::Product;
use atelier_core::filter::CatalogPredicate;

pub mod catalog;
pub mod memory;

pub use catalog::SqlCatalogStore;
pub use memory::InMemoryCatalogStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("catalog unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
    #[error("catalog row decode failed: {0}")]
    Decode(String),
}

/// Read side of the product catalog.
///
/// Implementations return at most `limit` products and must be stable:
/// identical predicate and catalog state yield identical results in identical
/// order.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn find(
        &self,
        predicate: &CatalogPredicate,
        limit: u32,
    ) -> Result<Vec<Product>, StorageError>;
}
