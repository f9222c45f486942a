//! A product repository that keeps everything in process memory.

use super::{
    product_model::{Product, ProductId},
    product_repository::{ProductRepository, SaveProduct},
};
use crate::infra::error::{ApiResult, ClientError};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::instrument;

#[derive(Debug, Default)]
struct Products {
    last_id: ProductId,
    rows: BTreeMap<ProductId, Product>,
}

/// An in-memory product repository.
///
/// Clones share the same products. Ids start at 1 and are never reused.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProductRepository {
    products: Arc<Mutex<Products>>,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored products.
    pub async fn len(&self) -> usize {
        self.products.lock().await.rows.len()
    }

    /// Whether there are no stored products.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self))]
    async fn find_all(&mut self) -> ApiResult<Vec<Product>> {
        let products = self.products.lock().await;
        Ok(products.rows.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&mut self, id: ProductId) -> ApiResult<Option<Product>> {
        let products = self.products.lock().await;
        Ok(products.rows.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn save(&mut self, product: SaveProduct) -> ApiResult<Product> {
        let mut products = self.products.lock().await;
        let product = match product {
            SaveProduct::Insert(new_product) => {
                products.last_id += 1;
                Product::new(products.last_id, new_product)
            }
            SaveProduct::Update(product) => {
                // Same outcome as an UPDATE matching no rows.
                if !products.rows.contains_key(&product.id) {
                    return Err(ClientError::NotFound.into());
                }
                product
            }
        };
        products.rows.insert(product.id, product.clone());
        tracing::debug!("Saved product {}", product.id);
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&mut self, id: ProductId) -> ApiResult<()> {
        let mut products = self.products.lock().await;
        products.rows.remove(&id);
        Ok(())
    }
}
