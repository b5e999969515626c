use async_trait::async_trait;
use tokio::sync::RwLock;

use atelier_core::domain::product::Product;
use atelier_core::filter::CatalogPredicate;

use super::{CatalogGateway, StorageError};

/// Catalog double for tests and local development: evaluates the predicate
/// in-process with [`CatalogPredicate::matches`] and mirrors the SQL store's
/// `(name, id)` ordering.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalogStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }

    pub async fn insert(&self, product: Product) {
        let mut products = self.products.write().await;
        products.push(product);
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalogStore {
    async fn find(
        &self,
        predicate: &CatalogPredicate,
        limit: u32,
    ) -> Result<Vec<Product>, StorageError> {
        let products = self.products.read().await;
        let mut matched: Vec<Product> =
            products.iter().filter(|product| predicate.matches(product)).cloned().collect();
        matched.sort_by(|a, b| (&a.name, &a.id.0).cmp(&(&b.name, &b.id.0)));
        matched.truncate(limit as usize);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use atelier_core::filter::{CatalogPredicate, PriceBound};

    use crate::fixtures::sample_products;
    use crate::repositories::{CatalogGateway, InMemoryCatalogStore};

    #[tokio::test]
    async fn in_memory_store_mirrors_sql_semantics() {
        let store = InMemoryCatalogStore::with_products(sample_products());

        let predicate = CatalogPredicate {
            category: Some("lampada".to_string()),
            colors: vec!["giallo".to_string()],
            materials: Vec::new(),
            price: PriceBound::UpperBound(200.0),
        };

        let found = store.find(&predicate, 10).await.expect("find");
        let names: Vec<&str> = found.iter().map(|product| product.name.as_str()).collect();
        assert_eq!(names, vec!["Lampada Solair"]);
    }

    #[tokio::test]
    async fn limit_and_ordering_are_stable() {
        let store = InMemoryCatalogStore::with_products(sample_products());

        let all = store.find(&CatalogPredicate::unconstrained(), 10).await.expect("find");
        let capped = store.find(&CatalogPredicate::unconstrained(), 2).await.expect("find");

        assert_eq!(capped.as_slice(), &all[..2]);
    }
}
