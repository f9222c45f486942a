//! Picks the backend that stores products and hands out one unit of work per request.

use super::{
    memory_repository::InMemoryProductRepository,
    product_model::{Product, ProductId},
    product_repository::{PgProductRepository, ProductRepository, SaveProduct},
};
use crate::infra::{
    config::{Config, StorageKind},
    database::{self, DbPool, Tx},
    error::ApiResult,
};

/// Where products live.
#[derive(Clone, Debug)]
pub enum ProductStore {
    /// A Postgres database.
    Postgres(DbPool),
    /// Process memory.
    Memory(InMemoryProductRepository),
}

impl ProductStore {
    /// An empty in-memory store.
    pub fn memory() -> Self {
        ProductStore::Memory(InMemoryProductRepository::new())
    }

    /// Sets up the store selected in the configuration.
    ///
    /// For Postgres this also runs pending migrations.
    pub async fn connect(config: &Config) -> color_eyre::Result<Self> {
        match config.storage {
            StorageKind::Postgres => {
                let db = database::init_db(&config.database);
                database::migrate(&db).await?;
                Ok(ProductStore::Postgres(db))
            }
            StorageKind::Memory => {
                tracing::warn!("Using in-memory storage, products are lost on shutdown");
                Ok(ProductStore::memory())
            }
        }
    }

    /// Starts a unit of work.
    pub async fn begin(&self) -> ApiResult<ProductTx> {
        match self {
            ProductStore::Postgres(db) => {
                let tx = db.begin().await?;
                Ok(ProductTx::Postgres(PgProductRepository::new(tx)))
            }
            ProductStore::Memory(repo) => Ok(ProductTx::Memory(repo.clone())),
        }
    }
}

/// A repository handle for a single request.
///
/// Changes only become durable after [`ProductTx::commit`]; a Postgres
/// transaction that is dropped uncommitted is rolled back. The in-memory
/// backend applies writes immediately.
pub enum ProductTx {
    /// An open Postgres transaction.
    Postgres(PgProductRepository<Tx>),
    /// A handle on the in-memory products.
    Memory(InMemoryProductRepository),
}

impl ProductTx {
    /// Makes the changes durable.
    pub async fn commit(self) -> ApiResult<()> {
        match self {
            ProductTx::Postgres(repo) => repo.into_inner().commit().await?,
            ProductTx::Memory(_) => {}
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductRepository for ProductTx {
    async fn find_all(&mut self) -> ApiResult<Vec<Product>> {
        match self {
            ProductTx::Postgres(repo) => repo.find_all().await,
            ProductTx::Memory(repo) => repo.find_all().await,
        }
    }

    async fn find_by_id(&mut self, id: ProductId) -> ApiResult<Option<Product>> {
        match self {
            ProductTx::Postgres(repo) => repo.find_by_id(id).await,
            ProductTx::Memory(repo) => repo.find_by_id(id).await,
        }
    }

    async fn save(&mut self, product: SaveProduct) -> ApiResult<Product> {
        match self {
            ProductTx::Postgres(repo) => repo.save(product).await,
            ProductTx::Memory(repo) => repo.save(product).await,
        }
    }

    async fn delete_by_id(&mut self, id: ProductId) -> ApiResult<()> {
        match self {
            ProductTx::Postgres(repo) => repo.delete_by_id(id).await,
            ProductTx::Memory(repo) => repo.delete_by_id(id).await,
        }
    }
}
